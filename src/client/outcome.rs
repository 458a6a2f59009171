//! Operation outcomes
//!
//! One sum type per operation. Known server-side failures are ordinary
//! outcomes; protocol violations surface as errors instead.

/// A payload received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Name the server attached to the payload
    pub filename: String,

    /// Size announced in the response body
    pub declared_size: u32,

    /// Bytes actually received before the stream ended
    pub received: u64,
}

impl Transfer {
    /// True when every declared byte arrived
    pub fn is_complete(&self) -> bool {
        self.received == u64::from(self.declared_size)
    }
}

/// Listing text returned by LIST_ALL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub transfer: Transfer,

    /// The listing as sent by the server
    pub text: String,
}

impl Listing {
    /// Stored file names, one per non-empty line of the listing
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// Status 211
    Listed(Listing),

    /// Status 1002
    NoFiles,

    /// Status 1003
    ServerError,
}

impl ListOutcome {
    /// Both a listing and "no files" count as success
    pub fn is_success(&self) -> bool {
        !matches!(self, ListOutcome::ServerError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveOutcome {
    /// Status 210; the payload went to the caller's sink
    Retrieved(Transfer),

    /// Status 1001
    NotFound { filename: String },

    /// Status 1003
    ServerError,
}

impl RetrieveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RetrieveOutcome::Retrieved(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Status 212
    Stored { filename: String },

    /// Status 1003
    ServerError,
}

impl BackupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BackupOutcome::Stored { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Status 212
    Deleted { filename: String },

    /// Status 1001
    NotFound { filename: String },

    /// Status 1003
    ServerError,
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }
}
