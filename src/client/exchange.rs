//! Single request/response exchange
//!
//! Drives one connection through
//! `Idle → Connected → RequestSent → HeaderReceived → {BodyReceived | Failed} → Closed`.
//! The connection is owned by the exchange and closed when it is dropped.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::{Result, SafekeepError};
use crate::network::Connection;
use crate::protocol::{decode_response_header, OpCode, ResponseHeader};

/// Where an exchange currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Connected,
    RequestSent,
    HeaderReceived,
    BodyReceived,
    Failed,
    Closed,
}

pub(crate) struct Exchange<'c> {
    conn: Connection,
    config: &'c ClientConfig,
    op: OpCode,
    state: ExchangeState,
}

impl<'c> Exchange<'c> {
    /// Open a fresh connection for `op`
    pub fn open(config: &'c ClientConfig, op: OpCode) -> Result<Self> {
        tracing::trace!("{}: {:?}", op.name(), ExchangeState::Idle);
        let conn = Connection::open(config)?;

        let mut exchange = Self {
            conn,
            config,
            op,
            state: ExchangeState::Idle,
        };
        exchange.transition(ExchangeState::Connected);
        Ok(exchange)
    }

    fn transition(&mut self, next: ExchangeState) {
        tracing::trace!("{}: {:?} -> {:?}", self.op.name(), self.state, next);
        self.state = next;
    }

    fn expect(&self, state: ExchangeState) -> Result<()> {
        if self.state != state {
            return Err(SafekeepError::ProtocolViolation(format!(
                "{} exchange is {:?}, expected {:?}",
                self.op.name(),
                self.state,
                state
            )));
        }
        Ok(())
    }

    /// Write the whole request and flush it before anything is read
    pub fn send_request<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BufWriter<TcpStream>) -> Result<()>,
    {
        self.expect(ExchangeState::Connected)?;

        let sent = write(self.conn.writer()).and_then(|()| self.conn.flush());
        if let Err(e) = sent {
            self.transition(ExchangeState::Failed);
            return Err(e);
        }

        self.transition(ExchangeState::RequestSent);
        Ok(())
    }

    /// Read the fixed response header
    pub fn read_header(&mut self) -> Result<ResponseHeader> {
        self.expect(ExchangeState::RequestSent)?;

        let header = match decode_response_header(self.conn.reader()) {
            Ok(header) => header,
            Err(e) => {
                self.transition(ExchangeState::Failed);
                return Err(e);
            }
        };

        if header.version != self.config.version {
            tracing::warn!(
                "Server answered {} with version {} (sent {})",
                self.op.name(),
                header.version,
                self.config.version
            );
        }

        tracing::debug!(
            "{} answered with status {} (success: {})",
            self.op.name(),
            header.status_code,
            header.status().map(|status| status.is_success()).unwrap_or(false)
        );

        self.transition(ExchangeState::HeaderReceived);
        Ok(header)
    }

    /// Parse the response body with `parse`
    pub fn read_body<T, F>(&mut self, parse: F) -> Result<T>
    where
        F: FnOnce(&mut BufReader<TcpStream>) -> Result<T>,
    {
        self.expect(ExchangeState::HeaderReceived)?;

        match parse(self.conn.reader()) {
            Ok(value) => {
                self.transition(ExchangeState::BodyReceived);
                Ok(value)
            }
            Err(e) => {
                self.transition(ExchangeState::Failed);
                Err(e)
            }
        }
    }

    /// Reject any bytes the server sent past a fully received payload
    pub fn ensure_no_overrun(&mut self, declared: u32) -> Result<()> {
        if self.conn.has_trailing_bytes(self.config.trailing_probe_ms)? {
            self.transition(ExchangeState::Failed);
            return Err(SafekeepError::ProtocolViolation(format!(
                "{} payload overran its declared size of {} bytes",
                self.op.name(),
                declared
            )));
        }
        Ok(())
    }
}

impl Drop for Exchange<'_> {
    fn drop(&mut self) {
        let last = self.state;
        self.transition(ExchangeState::Closed);
        tracing::trace!(
            "{} exchange with {} closed after {:?}",
            self.op.name(),
            self.conn.peer_addr(),
            last
        );
    }
}
