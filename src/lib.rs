//! # safekeep
//!
//! Client for a compact binary file-backup protocol over TCP:
//! - Backup, retrieve, delete and list files stored under a numeric identity
//! - One connection per operation, closed on every exit path
//! - Chunked payload streaming in both directions
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Client                              │
//! │            (one Exchange per operation call)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Protocol   │          │   Network   │
//!   │   (Codec)   │          │ (TCP + I/O) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │Backup Server│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SafekeepError, Result};
pub use config::{ClientConfig, Identity};
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of safekeep
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
