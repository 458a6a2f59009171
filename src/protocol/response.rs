//! Response definitions
//!
//! Status codes and the fixed response header.

use crate::error::{Result, SafekeepError};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    FileRetrieved = 210,
    AllFilesRetrieved = 211,
    FileModified = 212,
    FileNotFound = 1001,
    UserHasNoFiles = 1002,
    GeneralError = 1003,
}

impl Status {
    /// Map a raw status code, rejecting anything outside the known set
    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            210 => Ok(Status::FileRetrieved),
            211 => Ok(Status::AllFilesRetrieved),
            212 => Ok(Status::FileModified),
            1001 => Ok(Status::FileNotFound),
            1002 => Ok(Status::UserHasNoFiles),
            1003 => Ok(Status::GeneralError),
            _ => Err(SafekeepError::ProtocolViolation(format!(
                "Unknown response status: {}",
                code
            ))),
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether the status reports a completed operation
    pub fn is_success(self) -> bool {
        matches!(
            self,
            Status::FileRetrieved | Status::AllFilesRetrieved | Status::FileModified
        )
    }
}

/// The fixed 3-byte prefix of every response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Version echoed by the server
    pub version: u8,

    /// Raw status code, validated lazily by [`ResponseHeader::status`]
    pub status_code: u16,
}

impl ResponseHeader {
    /// Size of the header on the wire
    pub const SIZE: usize = 3;

    pub fn status(&self) -> Result<Status> {
        Status::from_code(self.status_code)
    }
}
