//! Request definitions
//!
//! Describes the operations a client can ask the server to perform.

/// Operation codes carried in the request prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Backup = 100,
    Retrieve = 200,
    Delete = 201,
    ListAll = 202,
}

impl OpCode {
    /// Human readable operation name for logs
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Backup => "backup",
            OpCode::Retrieve => "retrieve",
            OpCode::Delete => "delete",
            OpCode::ListAll => "list_all",
        }
    }
}

/// A request descriptor, minus the identity/version prefix.
///
/// Backup carries only the declared payload size; the payload itself is
/// streamed after the encoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Store a file on the server
    Backup { filename: String, payload_size: u32 },

    /// Fetch one stored file
    Retrieve { filename: String },

    /// Remove one stored file
    Delete { filename: String },

    /// List every file stored under this identity
    ListAll,
}

impl Request {
    /// Get the operation code
    pub fn op_code(&self) -> OpCode {
        match self {
            Request::Backup { .. } => OpCode::Backup,
            Request::Retrieve { .. } => OpCode::Retrieve,
            Request::Delete { .. } => OpCode::Delete,
            Request::ListAll => OpCode::ListAll,
        }
    }

    /// Filename targeted by the request, if any
    pub fn filename(&self) -> Option<&str> {
        match self {
            Request::Backup { filename, .. }
            | Request::Retrieve { filename }
            | Request::Delete { filename } => Some(filename),
            Request::ListAll => None,
        }
    }
}
