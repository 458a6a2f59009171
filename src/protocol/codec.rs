//! Protocol codec
//!
//! Encoding of requests and decoding of responses.
//!
//! ## Wire Format
//!
//! ### Request prefix
//! ```text
//! ┌──────────────┬─────────────┬────────────┐
//! │ Identity (4) │ Version (1) │ OpCode (1) │
//! └──────────────┴─────────────┴────────────┘
//! ```
//!
//! ### Filename field
//! ```text
//! ┌──────────────┬───────────────────────┐
//! │ NameLen (2)  │  UTF-8 name bytes     │
//! └──────────────┴───────────────────────┘
//! ```
//!
//! ### Payload body (responses 210 / 211)
//! ```text
//! ┌────────────────┬──────────────┬────────────────────┐
//! │ Filename field │ PayloadLen(4)│  Payload bytes     │
//! └────────────────┴──────────────┴────────────────────┘
//! ```

use std::io::Read;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, SafekeepError};
use super::{OpCode, PayloadReader, Request, ResponseHeader, MAX_FILENAME_LEN};

/// Request prefix size: identity (4) + version (1) + op code (1)
pub const REQUEST_PREFIX_SIZE: usize = 6;

// =============================================================================
// Request Encoding
// =============================================================================

/// Append the `u16`-prefixed filename field
///
/// Fails if the UTF-8 encoding of `name` is longer than 65535 bytes.
pub fn encode_filename_field(dst: &mut BytesMut, name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_FILENAME_LEN {
        return Err(SafekeepError::Encoding(format!(
            "Filename too long: {} bytes (max {})",
            bytes.len(),
            MAX_FILENAME_LEN
        )));
    }

    dst.reserve(2 + bytes.len());
    dst.put_u16_le(bytes.len() as u16);
    dst.extend_from_slice(bytes);
    Ok(())
}

fn encode_prefix(dst: &mut BytesMut, identity: u32, version: u8, op: OpCode) {
    dst.put_u32_le(identity);
    dst.put_u8(version);
    dst.put_u8(op as u8);
}

fn encode_named_request(identity: u32, version: u8, op: OpCode, filename: &str) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(REQUEST_PREFIX_SIZE + 2 + filename.len());
    encode_prefix(&mut buf, identity, version, op);
    encode_filename_field(&mut buf, filename)?;
    Ok(buf.freeze())
}

/// Encode a LIST_ALL request
///
/// Format: identity (4) + version (1) + op (1)
pub fn encode_list_request(identity: u32, version: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(REQUEST_PREFIX_SIZE);
    encode_prefix(&mut buf, identity, version, OpCode::ListAll);
    buf.freeze()
}

/// Encode a RETRIEVE request
pub fn encode_retrieve_request(identity: u32, version: u8, filename: &str) -> Result<Bytes> {
    encode_named_request(identity, version, OpCode::Retrieve, filename)
}

/// Encode a DELETE request
pub fn encode_delete_request(identity: u32, version: u8, filename: &str) -> Result<Bytes> {
    encode_named_request(identity, version, OpCode::Delete, filename)
}

/// Encode the header of a BACKUP request
///
/// Format: prefix + name field + payload_size (4). The payload follows on
/// the wire but is streamed separately by the caller.
pub fn encode_backup_request_header(
    identity: u32,
    version: u8,
    filename: &str,
    payload_size: u32,
) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(REQUEST_PREFIX_SIZE + 2 + filename.len() + 4);
    encode_prefix(&mut buf, identity, version, OpCode::Backup);
    encode_filename_field(&mut buf, filename)?;
    buf.put_u32_le(payload_size);
    Ok(buf.freeze())
}

/// Encode any request descriptor (header only for BACKUP)
pub fn encode_request(identity: u32, version: u8, request: &Request) -> Result<Bytes> {
    match request {
        Request::ListAll => Ok(encode_list_request(identity, version)),
        Request::Retrieve { filename } => encode_retrieve_request(identity, version, filename),
        Request::Delete { filename } => encode_delete_request(identity, version, filename),
        Request::Backup { filename, payload_size } => {
            encode_backup_request_header(identity, version, filename, *payload_size)
        }
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &'static str) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|e| SafekeepError::from_field_read(field, e))
}

/// Read the 3-byte response header
pub fn decode_response_header<R: Read>(reader: &mut R) -> Result<ResponseHeader> {
    let mut header = [0u8; ResponseHeader::SIZE];
    read_field(reader, &mut header, "response header")?;

    Ok(ResponseHeader {
        version: header[0],
        status_code: u16::from_le_bytes([header[1], header[2]]),
    })
}

/// Read a filename field
pub fn decode_filename_body<R: Read>(reader: &mut R) -> Result<String> {
    let mut len_buf = [0u8; 2];
    read_field(reader, &mut len_buf, "filename length")?;
    let name_len = u16::from_le_bytes(len_buf) as usize;

    let mut name = vec![0u8; name_len];
    read_field(reader, &mut name, "filename")?;

    String::from_utf8(name)
        .map_err(|e| SafekeepError::Encoding(format!("Filename is not valid UTF-8: {}", e)))
}

/// Read a payload body up to the start of the payload bytes
///
/// Returns the filename, the declared payload size and a reader bounded to
/// that size. The payload itself is left on the stream for the caller.
pub fn decode_payload_body<R: Read>(reader: &mut R) -> Result<(String, u32, PayloadReader<'_, R>)> {
    let filename = decode_filename_body(reader)?;

    let mut size_buf = [0u8; 4];
    read_field(reader, &mut size_buf, "payload size")?;
    let payload_size = u32::from_le_bytes(size_buf);

    Ok((filename, payload_size, PayloadReader::new(reader, payload_size)))
}
