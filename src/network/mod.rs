//! Network Module
//!
//! TCP transport for the client.
//!
//! ## Architecture
//! - One short-lived connection per operation, closed on drop
//! - Chunked payload streaming in both directions

mod connection;
mod transfer;

pub use connection::Connection;
pub use transfer::{receive_payload, send_payload};
