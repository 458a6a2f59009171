//! Configuration for the safekeep client
//!
//! Immutable client configuration with sensible defaults. Built once at
//! startup and handed to every operation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, SafekeepError};
use crate::protocol::PROTOCOL_VERSION;

/// Session-scoped numeric identity sent as the first field of every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(pub u32);

impl Identity {
    /// Draw a fresh identity uniformly over the full `u32` range
    pub fn random() -> Self {
        Identity(rand::random::<u32>())
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Identity {
    fn from(value: u32) -> Self {
        Identity(value)
    }
}

/// Main configuration for a safekeep client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------
    /// Identity sent with every request
    pub identity: Identity,

    /// Protocol version byte sent with every request
    pub version: u8,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Backup server address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Per-read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Per-write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// How long to wait for stray bytes after a payload ends (milliseconds)
    pub trailing_probe_ms: u64,

    // -------------------------------------------------------------------------
    // Transfer Configuration
    // -------------------------------------------------------------------------
    /// Chunk size for payload streaming in both directions (bytes)
    pub chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            identity: Identity::random(),
            version: PROTOCOL_VERSION,
            server_addr: "127.0.0.1:65432".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            trailing_probe_ms: 100,
            chunk_size: 4096,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address (host:port)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Use a fixed identity instead of a random one
    pub fn identity(mut self, identity: impl Into<Identity>) -> Self {
        self.config.identity = identity.into();
        self
    }

    /// Override the protocol version byte
    pub fn version(mut self, version: u8) -> Self {
        self.config.version = version;
        self
    }

    /// Set the payload chunk size (in bytes)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the trailing-byte probe timeout (in milliseconds)
    pub fn trailing_probe_ms(mut self, ms: u64) -> Self {
        self.config.trailing_probe_ms = ms;
        self
    }

    /// Validate and produce the config
    pub fn build(self) -> Result<ClientConfig> {
        let config = self.config;

        if config.chunk_size == 0 {
            return Err(SafekeepError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if config.server_addr.trim().is_empty() {
            return Err(SafekeepError::Config(
                "server address must not be empty".to_string(),
            ));
        }
        if config.trailing_probe_ms == 0 {
            return Err(SafekeepError::Config(
                "trailing probe timeout must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Read a list of local files to back up, one path per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn load_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = std::fs::read_to_string(path)?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}
