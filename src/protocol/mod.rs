//! Protocol Module
//!
//! Defines the wire protocol spoken with the backup server. All multi-byte
//! integers are little-endian. A connection carries exactly one request and
//! one response.
//!
//! ## Request Format
//! ```text
//! ┌──────────────┬─────────────┬────────────┬──────────────────────────┐
//! │ Identity (4) │ Version (1) │ OpCode (1) │  Operation fields        │
//! └──────────────┴─────────────┴────────────┴──────────────────────────┘
//! ```
//!
//! ### Operation Codes
//! - 100: BACKUP    - name_len (2) + name + payload_size (4) + payload
//! - 200: RETRIEVE  - name_len (2) + name
//! - 201: DELETE    - name_len (2) + name
//! - 202: LIST_ALL  - empty
//!
//! ## Response Format
//! ```text
//! ┌─────────────┬────────────┬──────────────────────────┐
//! │ Version (1) │ Status (2) │  Status body             │
//! └─────────────┴────────────┴──────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 210: FILE_RETRIEVED       - name_len (2) + name + payload_size (4) + payload
//! - 211: ALL_FILES_RETRIEVED  - name_len (2) + name + payload_size (4) + payload
//! - 212: FILE_MODIFIED        - name_len (2) + name
//! - 1001: FILE_NOT_FOUND      - name_len (2) + name
//! - 1002: USER_HAS_NO_FILES   - empty
//! - 1003: GENERAL_ERROR       - empty

mod request;
mod response;
mod codec;
mod payload;

pub use request::{OpCode, Request};
pub use response::{ResponseHeader, Status};
pub use codec::{
    encode_backup_request_header, encode_delete_request, encode_filename_field,
    encode_list_request, encode_request, encode_retrieve_request,
    decode_filename_body, decode_payload_body, decode_response_header,
};
pub use payload::PayloadReader;

/// Protocol version spoken by this client
pub const PROTOCOL_VERSION: u8 = 1;

/// Largest filename, in bytes, that fits the `u16` length prefix
pub const MAX_FILENAME_LEN: usize = u16::MAX as usize;

/// Largest payload, in bytes, that fits the `u32` length prefix
pub const MAX_PAYLOAD_LEN: u64 = u32::MAX as u64;
