//! Transport
//!
//! The byte-stream duplex the client speaks the protocol over.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{RedisError, Result};

/// A connected, blocking byte stream
///
/// Reads and writes block until complete or until the transport's own
/// timeout fires (surfaced as an `Io` error).
pub trait Transport: Send {
    /// Buffered read half
    fn reader(&mut self) -> &mut dyn BufRead;

    /// Buffered write half; callers flush once per batch
    fn writer(&mut self) -> &mut dyn Write;

    /// Remote address, if the transport has one
    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }

    /// Best-effort close; never fails
    fn close(&mut self) {}
}

/// TCP transport with buffered I/O
#[derive(Debug)]
pub struct TcpTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Address actually connected to
    peer_addr: SocketAddr,
}

impl TcpTransport {
    /// Connect to `addr`, trying every resolved address in order
    ///
    /// Applies the connect timeout, read/write timeouts and nodelay from
    /// `config`.
    pub fn connect(addr: &str, config: &Config) -> Result<Self> {
        let candidates: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|e| RedisError::Connection(format!("failed to resolve {}: {}", addr, e)))?
            .collect();

        if candidates.is_empty() {
            return Err(RedisError::Connection(format!("{} resolved to no addresses", addr)));
        }

        let mut last_error = None;
        for candidate in candidates {
            let attempt = match config.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&candidate, timeout),
                None => TcpStream::connect(candidate),
            };

            match attempt {
                Ok(stream) => return Self::from_stream(stream, config),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }

        Err(RedisError::Connection(format!(
            "failed to connect to {}: {}",
            addr,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Wrap an already connected stream
    ///
    /// Failing to configure the socket counts as a failed connect.
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let setup = |what: &str, e: std::io::Error| RedisError::Connection(format!("{}: {}", what, e));

        let peer_addr = stream.peer_addr().map_err(|e| setup("peer address unavailable", e))?;

        stream
            .set_nodelay(config.nodelay)
            .map_err(|e| setup("failed to set nodelay", e))?;
        Self::apply_timeouts(&stream, config.read_timeout, config.write_timeout)
            .map_err(|e| setup("failed to set timeouts", e))?;

        // Clone stream for separate read/write handles
        let read_stream = stream
            .try_clone()
            .map_err(|e| setup("failed to clone stream", e))?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Change the socket timeouts (None = block indefinitely)
    pub fn set_timeouts(&mut self, read: Option<Duration>, write: Option<Duration>) -> Result<()> {
        Self::apply_timeouts(self.reader.get_ref(), read, write)?;
        Ok(())
    }

    fn apply_timeouts(stream: &TcpStream, read: Option<Duration>, write: Option<Duration>) -> std::io::Result<()> {
        // A zero duration is rejected by the OS layer; treat it as "no timeout"
        stream.set_read_timeout(read.filter(|d| !d.is_zero()))?;
        stream.set_write_timeout(write.filter(|d| !d.is_zero()))
    }
}

impl Transport for TcpTransport {
    fn reader(&mut self) -> &mut dyn BufRead {
        &mut self.reader
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.writer
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(self.peer_addr)
    }

    fn close(&mut self) {
        let _ = self.writer.flush();
        let _ = self.writer.get_ref().shutdown(Shutdown::Both);
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}
