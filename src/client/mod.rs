//! Operation Driver
//!
//! [`Client`] runs each backup operation as one self-contained exchange on a
//! fresh connection. The client itself is immutable, so independent
//! operations may be issued from several threads at once.
//!
//! ## Status Dispatch
//! ```text
//! LIST_ALL   211 → payload body   1002 / 1003 → no body
//! RETRIEVE   210 → payload body   1001 → name body   1003 → no body
//! BACKUP     212 → name body      1003 → no body
//! DELETE     212 / 1001 → name    1003 → no body
//! ```
//! Any other status is a protocol violation.

mod dispatch;
mod exchange;
mod outcome;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bytes::Bytes;
use tempfile::NamedTempFile;

use crate::config::{ClientConfig, Identity};
use crate::error::{Result, SafekeepError};
use crate::network::send_payload;
use crate::protocol::{encode_request, Request, MAX_PAYLOAD_LEN};

use exchange::Exchange;

pub use dispatch::{read_backup_response, read_delete_response, read_list_response, read_retrieve_response};
pub use exchange::ExchangeState;
pub use outcome::{BackupOutcome, DeleteOutcome, ListOutcome, Listing, RetrieveOutcome, Transfer};

/// Client for the backup service
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        tracing::debug!(
            "Client identity {} targeting {}",
            config.identity,
            config.server_addr
        );
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn identity(&self) -> Identity {
        self.config.identity
    }

    /// Encode `request` and open the connection that will carry it.
    ///
    /// Encoding comes first so an oversized name never costs a connect.
    fn begin(&self, request: &Request) -> Result<(Exchange<'_>, Bytes)> {
        let frame = encode_request(self.config.identity.value(), self.config.version, request)?;
        tracing::debug!(
            "{} {}",
            request.op_code().name(),
            request.filename().unwrap_or("(all files)")
        );

        let exchange = Exchange::open(&self.config, request.op_code())?;
        Ok((exchange, frame))
    }

    /// List every file stored under this client's identity
    pub fn list_all(&self) -> Result<ListOutcome> {
        let (mut exchange, request) = self.begin(&Request::ListAll)?;
        exchange.send_request(|w| write_frame(w, &request))?;
        let header = exchange.read_header()?;

        let chunk_size = self.config.chunk_size;
        let outcome = exchange.read_body(|r| read_list_response(r, &header, chunk_size))?;
        if let ListOutcome::Listed(listing) = &outcome {
            if listing.transfer.is_complete() {
                exchange.ensure_no_overrun(listing.transfer.declared_size)?;
            }
        }

        tracing::debug!("list_all -> {}", outcome_label(&outcome));
        Ok(outcome)
    }

    /// Retrieve `filename`, streaming its contents into `sink`
    ///
    /// Bytes already written to the sink stay there if the exchange fails.
    pub fn retrieve<W: Write>(&self, filename: &str, sink: &mut W) -> Result<RetrieveOutcome> {
        let (mut exchange, request) = self.begin(&Request::Retrieve {
            filename: filename.to_string(),
        })?;
        exchange.send_request(|w| write_frame(w, &request))?;
        let header = exchange.read_header()?;

        let chunk_size = self.config.chunk_size;
        let outcome =
            exchange.read_body(|r| read_retrieve_response(r, &header, sink, chunk_size))?;
        if let RetrieveOutcome::Retrieved(transfer) = &outcome {
            if transfer.is_complete() {
                exchange.ensure_no_overrun(transfer.declared_size)?;
            }
        }

        tracing::debug!("retrieve {} -> {:?}", filename, outcome);
        Ok(outcome)
    }

    /// Retrieve `filename` into the local file at `dest`
    ///
    /// The payload is staged in a temporary file next to `dest` and only
    /// moved into place once the server has delivered it. Any other outcome,
    /// or an error, leaves `dest` untouched.
    pub fn retrieve_to_file(&self, filename: &str, dest: &Path) -> Result<RetrieveOutcome> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut sink = BufWriter::new(NamedTempFile::new_in(dir)?);
        let outcome = self.retrieve(filename, &mut sink)?;
        if !outcome.is_success() {
            return Ok(outcome);
        }

        let staged = sink.into_inner().map_err(|e| e.into_error())?;
        staged.persist(dest).map_err(|e| e.error)?;
        Ok(outcome)
    }

    /// Delete `filename` from the server
    pub fn delete(&self, filename: &str) -> Result<DeleteOutcome> {
        let (mut exchange, request) = self.begin(&Request::Delete {
            filename: filename.to_string(),
        })?;
        exchange.send_request(|w| write_frame(w, &request))?;
        let header = exchange.read_header()?;
        let outcome = exchange.read_body(|r| read_delete_response(r, &header))?;

        tracing::debug!("delete {} -> {:?}", filename, outcome);
        Ok(outcome)
    }

    /// Back up `size` bytes read from `source` under `filename`
    pub fn backup<R: Read>(&self, filename: &str, source: &mut R, size: u64) -> Result<BackupOutcome> {
        if size > MAX_PAYLOAD_LEN {
            return Err(SafekeepError::Encoding(format!(
                "Payload too large: {} bytes (max {})",
                size, MAX_PAYLOAD_LEN
            )));
        }
        let payload_size = size as u32;

        let chunk_size = self.config.chunk_size;
        let (mut exchange, request) = self.begin(&Request::Backup {
            filename: filename.to_string(),
            payload_size,
        })?;
        exchange.send_request(|w| {
            write_frame(w, &request)?;
            send_payload(source, w, payload_size, chunk_size)?;
            Ok(())
        })?;
        let header = exchange.read_header()?;
        let outcome = exchange.read_body(|r| read_backup_response(r, &header))?;

        tracing::debug!("backup {} ({} bytes) -> {:?}", filename, size, outcome);
        Ok(outcome)
    }

    /// Back up a local file under its file name component
    pub fn backup_file(&self, path: &Path) -> Result<BackupOutcome> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SafekeepError::Encoding(format!(
                    "Path has no UTF-8 file name: {}",
                    path.display()
                ))
            })?;

        let mut file = File::open(path)?;
        let size = file.metadata()?.len();
        self.backup(filename, &mut file, size)
    }
}

fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer
        .write_all(frame)
        .map_err(|e| SafekeepError::connection("write", e))
}

fn outcome_label(outcome: &ListOutcome) -> &'static str {
    match outcome {
        ListOutcome::Listed(_) => "listed",
        ListOutcome::NoFiles => "no files",
        ListOutcome::ServerError => "server error",
    }
}
