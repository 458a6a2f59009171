//! Client Connection
//!
//! A single TCP connection to the backup server. The socket is shut down
//! when the connection is dropped, so every exit path releases it.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{Result, SafekeepError};

/// An open connection to the server
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the configured server address
    ///
    /// Tries every resolved address in turn and applies the configured
    /// timeouts to the resulting stream.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let addrs: Vec<SocketAddr> = config
            .server_addr
            .to_socket_addrs()
            .map_err(|e| SafekeepError::connection("resolve", e))?
            .collect();

        let mut last_err = None;
        for addr in &addrs {
            match connect_one(addr, config.connect_timeout_ms) {
                Ok(stream) => return Self::from_stream(stream, config),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        let err = last_err.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                format!("{} resolved to no addresses", config.server_addr),
            )
        });
        Err(SafekeepError::connection("connect", err))
    }

    /// Wrap an already connected stream
    fn from_stream(stream: TcpStream, config: &ClientConfig) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let setup = |stream: &TcpStream| -> std::io::Result<()> {
            // Requests are written in one burst; Nagle only adds latency here
            stream.set_nodelay(true)?;
            stream.set_read_timeout(timeout(config.read_timeout_ms))?;
            stream.set_write_timeout(timeout(config.write_timeout_ms))?;
            Ok(())
        };
        setup(&stream).map_err(|e| SafekeepError::connection("configure", e))?;

        let read_stream = stream
            .try_clone()
            .map_err(|e| SafekeepError::connection("configure", e))?;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            peer_addr,
        })
    }

    pub fn reader(&mut self) -> &mut BufReader<TcpStream> {
        &mut self.reader
    }

    pub fn writer(&mut self) -> &mut BufWriter<TcpStream> {
        &mut self.writer
    }

    /// Push any buffered request bytes onto the socket
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| SafekeepError::connection("write", e))
    }

    /// Check whether the peer sent anything past the end of the response.
    ///
    /// Waits at most `wait_ms` for a byte. A clean close, a reset or a
    /// timeout all count as "nothing more".
    pub fn has_trailing_bytes(&mut self, wait_ms: u64) -> Result<bool> {
        if !self.reader.buffer().is_empty() {
            return Ok(true);
        }

        self.reader
            .get_ref()
            .set_read_timeout(timeout(wait_ms))
            .map_err(|e| SafekeepError::connection("configure", e))?;

        let mut probe = [0u8; 1];
        loop {
            match self.reader.read(&mut probe) {
                Ok(0) => return Ok(false),
                Ok(_) => return Ok(true),
                Err(e) => match e.kind() {
                    std::io::ErrorKind::Interrupted => continue,
                    std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted => return Ok(false),
                    _ => return Err(SafekeepError::connection("read", e)),
                },
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::trace!("Discarding unsent bytes to {}: {}", self.peer_addr, e);
        }
        // Both handles share one socket, so a single shutdown closes it
        let _ = self.writer.get_ref().shutdown(Shutdown::Both);
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }
}

fn connect_one(addr: &SocketAddr, timeout_ms: u64) -> std::io::Result<TcpStream> {
    match timeout(timeout_ms) {
        Some(limit) => TcpStream::connect_timeout(addr, limit),
        None => TcpStream::connect(addr),
    }
}

fn timeout(ms: u64) -> Option<Duration> {
    if ms > 0 {
        Some(Duration::from_millis(ms))
    } else {
        None
    }
}
