//! Chunked payload transfer
//!
//! Bounded copy loops between local sources/sinks and the connection. The
//! chunk size only bounds memory use; it never shows up on the wire.

use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, SafekeepError};
use crate::protocol::PayloadReader;

/// Stream exactly `size` bytes from `source` to `dest`, `chunk_size` at a time.
///
/// Fails if the source runs dry before `size` bytes, since the request
/// header has already promised that many.
pub fn send_payload<R: Read, W: Write>(
    source: &mut R,
    dest: &mut W,
    size: u32,
    chunk_size: usize,
) -> Result<u64> {
    let total = u64::from(size);
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut sent: u64 = 0;

    while sent < total {
        let want = chunk.len().min((total - sent) as usize);
        let n = match source.read(&mut chunk[..want]) {
            Ok(0) => {
                return Err(SafekeepError::Io(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("payload source ended after {} of {} bytes", sent, total),
                )))
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SafekeepError::Io(e)),
        };

        dest.write_all(&chunk[..n])
            .map_err(|e| SafekeepError::connection("write", e))?;
        sent += n as u64;
        tracing::trace!("Sent payload chunk of {} bytes ({}/{})", n, sent, total);
    }

    Ok(sent)
}

/// Drain a payload reader into `sink`, `chunk_size` at a time.
///
/// Stops at the declared size or when the peer closes, whichever comes
/// first. Returns the number of bytes written to the sink.
pub fn receive_payload<R: Read, W: Write>(
    payload: &mut PayloadReader<'_, R>,
    sink: &mut W,
    chunk_size: usize,
) -> Result<u64> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut written: u64 = 0;

    loop {
        let n = match payload.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SafekeepError::connection("read", e)),
        };

        sink.write_all(&chunk[..n])?;
        written += n as u64;
        tracing::trace!(
            "Received payload chunk of {} bytes ({}/{})",
            n,
            written,
            payload.declared()
        );
    }

    sink.flush()?;
    Ok(written)
}
