//! Status dispatch
//!
//! Given a decoded response header, select and run the body parser for one
//! operation. Statuses without a body read nothing past the header.

use std::io::{Read, Write};

use crate::error::{Result, SafekeepError};
use crate::network::receive_payload;
use crate::protocol::{decode_filename_body, decode_payload_body, OpCode, ResponseHeader, Status};

use super::outcome::{BackupOutcome, DeleteOutcome, ListOutcome, Listing, RetrieveOutcome, Transfer};

fn unexpected(op: OpCode, status: Status) -> SafekeepError {
    SafekeepError::ProtocolViolation(format!(
        "Status {} ({:?}) is not a valid reply to {}",
        status.code(),
        status,
        op.name()
    ))
}

fn warn_if_short(transfer: &Transfer) {
    if !transfer.is_complete() {
        tracing::warn!(
            "Short payload for {}: received {} of {} declared bytes",
            transfer.filename,
            transfer.received,
            transfer.declared_size
        );
    }
}

/// Parse the body of a LIST_ALL response
pub fn read_list_response<R: Read>(
    reader: &mut R,
    header: &ResponseHeader,
    chunk_size: usize,
) -> Result<ListOutcome> {
    match header.status()? {
        Status::AllFilesRetrieved => {
            let (filename, declared_size, mut payload) = decode_payload_body(reader)?;
            let mut text = Vec::with_capacity(declared_size.min(1 << 20) as usize);
            let received = receive_payload(&mut payload, &mut text, chunk_size)?;

            let text = String::from_utf8(text).map_err(|e| {
                SafekeepError::Encoding(format!("Listing is not valid UTF-8: {}", e))
            })?;
            let transfer = Transfer {
                filename,
                declared_size,
                received,
            };
            warn_if_short(&transfer);
            Ok(ListOutcome::Listed(Listing { transfer, text }))
        }
        Status::UserHasNoFiles => Ok(ListOutcome::NoFiles),
        Status::GeneralError => Ok(ListOutcome::ServerError),
        other => Err(unexpected(OpCode::ListAll, other)),
    }
}

/// Parse the body of a RETRIEVE response, streaming the payload into `sink`
pub fn read_retrieve_response<R: Read, W: Write>(
    reader: &mut R,
    header: &ResponseHeader,
    sink: &mut W,
    chunk_size: usize,
) -> Result<RetrieveOutcome> {
    match header.status()? {
        Status::FileRetrieved => {
            let (filename, declared_size, mut payload) = decode_payload_body(reader)?;
            let received = receive_payload(&mut payload, sink, chunk_size)?;

            let transfer = Transfer {
                filename,
                declared_size,
                received,
            };
            warn_if_short(&transfer);
            Ok(RetrieveOutcome::Retrieved(transfer))
        }
        Status::FileNotFound => Ok(RetrieveOutcome::NotFound {
            filename: decode_filename_body(reader)?,
        }),
        Status::GeneralError => Ok(RetrieveOutcome::ServerError),
        other => Err(unexpected(OpCode::Retrieve, other)),
    }
}

/// Parse the body of a BACKUP response
pub fn read_backup_response<R: Read>(reader: &mut R, header: &ResponseHeader) -> Result<BackupOutcome> {
    match header.status()? {
        Status::FileModified => Ok(BackupOutcome::Stored {
            filename: decode_filename_body(reader)?,
        }),
        Status::GeneralError => Ok(BackupOutcome::ServerError),
        other => Err(unexpected(OpCode::Backup, other)),
    }
}

/// Parse the body of a DELETE response
pub fn read_delete_response<R: Read>(reader: &mut R, header: &ResponseHeader) -> Result<DeleteOutcome> {
    match header.status()? {
        Status::FileModified => Ok(DeleteOutcome::Deleted {
            filename: decode_filename_body(reader)?,
        }),
        Status::FileNotFound => Ok(DeleteOutcome::NotFound {
            filename: decode_filename_body(reader)?,
        }),
        Status::GeneralError => Ok(DeleteOutcome::ServerError),
        other => Err(unexpected(OpCode::Delete, other)),
    }
}
