//! Bounded payload reader
//!
//! Wraps the response stream so that at most the declared payload size can
//! be read from it. The peer closing early is reported as end-of-stream, not
//! an error; compare [`PayloadReader::received`] with
//! [`PayloadReader::declared`] to detect a short payload.

use std::io::{self, Read};

/// Reader over the payload bytes of a response body
pub struct PayloadReader<'a, R: Read> {
    inner: &'a mut R,
    declared: u32,
    received: u64,
}

impl<'a, R: Read> PayloadReader<'a, R> {
    pub fn new(inner: &'a mut R, declared: u32) -> Self {
        Self {
            inner,
            declared,
            received: 0,
        }
    }

    /// Payload size announced by the server
    pub fn declared(&self) -> u32 {
        self.declared
    }

    /// Bytes handed out so far
    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn remaining(&self) -> u64 {
        u64::from(self.declared) - self.received
    }

    /// True once the full declared size has been read
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }
}

impl<R: Read> Read for PayloadReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let max = buf.len().min(remaining.min(usize::MAX as u64) as usize);
        let n = self.inner.read(&mut buf[..max])?;
        self.received += n as u64;
        Ok(n)
    }
}
