//! Client Module
//!
//! The façade that ties the codec, the transport and the pipeline tracker
//! together over a single server connection.
//!
//! ## Connection States
//! ```text
//!   Unconnected ──connect──▶ Connected ──fatal error──▶ Failed
//!        ▲                       │                        │
//!        └──────disconnect───────┴───────disconnect───────┘
//! ```
//! Commands may only be sent while `Connected`. A protocol or transport
//! failure moves the connection to `Failed`, after which only
//! `disconnect`/`reconnect` are accepted: the byte stream can no longer be
//! trusted to be aligned on a reply boundary.
//!
//! ## Reply Ordering
//! Replies come back in the order commands were written. The client keeps
//! a count of written-but-unread commands; the combined operations
//! (`send_command`, `send_commands`, `execute`) refuse to run while replies
//! from earlier `write_only` calls are still outstanding, so a reply can
//! never be handed to the wrong caller.

use std::fmt;
use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;

use crate::config::Config;
use crate::error::{RedisError, Result};
use crate::network::{PipelineTracker, TcpTransport, Transport};
use crate::protocol::{encode_command_into, read_reply, Command, FromReply, Reply};

/// Connection-level state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport attached
    Unconnected,

    /// Ready to send commands
    Connected,

    /// A fatal error occurred; reconnect required
    Failed,
}

/// A blocking client for one server connection
///
/// ## Concurrency
/// Not internally synchronized. Use [`crate::SharedClient`] (or any other
/// mutual exclusion) to call one client from several threads.
pub struct Client {
    /// Client configuration (timeouts, limits)
    config: Config,

    /// Address of the current or last connection, as given by the caller
    address: Option<String>,

    /// Active transport, if any
    transport: Option<Box<dyn Transport>>,

    /// Connection state machine
    state: ConnectionState,

    /// Commands written whose replies are still unread
    tracker: PipelineTracker,
}

impl Client {
    /// Create an unconnected client; call `connect` later
    pub fn new(config: Config) -> Self {
        Self {
            config,
            address: None,
            transport: None,
            state: ConnectionState::Unconnected,
            tracker: PipelineTracker::new(),
        }
    }

    /// Create a client connected to `addr` ("host:port") with default config
    pub fn open(addr: &str) -> Result<Self> {
        Self::open_with_config(addr, Config::default())
    }

    /// Create a client connected to `addr` ("host:port")
    pub fn open_with_config(addr: &str, config: Config) -> Result<Self> {
        let mut client = Self::new(config);
        client.connect(addr)?;
        Ok(client)
    }

    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Connect to `addr` ("host:port") using the configured connect timeout
    ///
    /// A no-op if already connected to the same address. Any other existing
    /// connection is closed first.
    pub fn connect(&mut self, addr: &str) -> Result<()> {
        self.connect_inner(addr, self.config.connect_timeout)
    }

    /// Connect to `host` on `port`
    ///
    /// `timeout` overrides the configured connect timeout when given.
    pub fn connect_host_port(&mut self, host: &str, port: u16, timeout: Option<Duration>) -> Result<()> {
        // Bare IPv6 literals need brackets to be parsed together with a port
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };
        self.connect_inner(&addr, timeout.or(self.config.connect_timeout))
    }

    /// Connect to `addr` with an explicit connect timeout
    pub fn connect_with_timeout(&mut self, addr: &str, timeout: Duration) -> Result<()> {
        self.connect_inner(addr, Some(timeout))
    }

    /// Drop the current connection (if any) and connect to the last address
    pub fn reconnect(&mut self) -> Result<()> {
        let addr = self.address.clone().ok_or(RedisError::NotConnected)?;
        self.disconnect();
        self.connect(&addr)
    }

    fn connect_inner(&mut self, addr: &str, timeout: Option<Duration>) -> Result<()> {
        if addr.trim().is_empty() {
            return Err(RedisError::Config("empty server address".to_string()));
        }
        if self.state == ConnectionState::Connected && self.address.as_deref() == Some(addr) {
            tracing::trace!("Already connected to {}", addr);
            return Ok(());
        }

        self.disconnect();
        self.address = Some(addr.to_string());

        let config = Config {
            connect_timeout: timeout,
            ..self.config.clone()
        };
        let transport = TcpTransport::connect(addr, &config)?;

        tracing::debug!("Connected to {} ({:?})", addr, transport.peer_addr());
        self.transport = Some(Box::new(transport));
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Use an already established transport
    ///
    /// Closes any current connection first. The remembered address becomes
    /// the transport's peer address, or none if it has no peer.
    pub fn attach<T: Transport + 'static>(&mut self, transport: T) {
        self.disconnect();
        self.address = transport.peer_addr().map(|peer| peer.to_string());
        self.transport = Some(Box::new(transport));
        self.state = ConnectionState::Connected;
    }

    /// Release the transport and forget outstanding replies
    ///
    /// Always succeeds; calling it while unconnected is a no-op apart from
    /// resetting the tracker.
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            tracing::debug!(
                "Disconnected from {} ({} replies unread)",
                self.address.as_deref().unwrap_or("<attached transport>"),
                self.tracker.outstanding()
            );
        }
        self.tracker.reset();
        self.state = ConnectionState::Unconnected;
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Send a command and return its raw reply
    ///
    /// Error replies are returned as `Reply::Error`, not as `Err`.
    pub fn send_command(&mut self, command: &Command) -> Result<Reply> {
        self.require_idle()?;
        self.write_only(command)?;
        self.read_reply()
    }

    /// Pipeline a batch: write every command, then read one reply per command
    ///
    /// `replies[i]` answers `commands[i]`. Error replies stay in the result.
    pub fn send_commands(&mut self, commands: &[Command]) -> Result<Vec<Reply>> {
        self.require_idle()?;
        if commands.is_empty() {
            return Ok(Vec::new());
        }

        let mut buf = BytesMut::new();
        for command in commands {
            encode_command_into(command, &mut buf, self.config.max_command_size)?;
        }

        self.write_bytes(&buf)?;
        for _ in commands {
            self.tracker.on_write();
        }
        tracing::trace!("Pipelined {} commands ({} bytes)", commands.len(), buf.len());

        let mut replies = Vec::with_capacity(commands.len());
        for _ in commands {
            replies.push(self.read_reply()?);
        }
        Ok(replies)
    }

    /// Send a command and coerce its reply into `T`
    ///
    /// Fails with `Server` on an error reply and with `TypeMismatch` when the
    /// reply has a different type. In both cases the reply was consumed and
    /// the connection remains usable.
    pub fn execute<T: FromReply>(&mut self, command: &Command) -> Result<T> {
        self.send_command(command)?.into_typed()
    }

    /// Write a command without reading its reply
    ///
    /// The reply stays on the stream; the caller must collect it later with
    /// `read_reply`, `read_reply_as` or `drain`.
    pub fn write_only(&mut self, command: &Command) -> Result<()> {
        let mut buf = BytesMut::new();
        encode_command_into(command, &mut buf, self.config.max_command_size)?;

        self.write_bytes(&buf)?;
        self.tracker.on_write();
        tracing::trace!("-> {}", command);
        Ok(())
    }

    /// Read the oldest outstanding reply
    pub fn read_reply(&mut self) -> Result<Reply> {
        self.check_state()?;
        self.tracker.expect_read()?;

        let max_bulk_len = self.config.max_bulk_len;
        let reply = self.with_transport(|t| read_reply(t.reader(), max_bulk_len))?;

        self.tracker.on_read()?;
        tracing::trace!("<- {}", reply.kind());
        Ok(reply)
    }

    /// Read the oldest outstanding reply and coerce it into `T`
    pub fn read_reply_as<T: FromReply>(&mut self) -> Result<T> {
        self.read_reply()?.into_typed()
    }

    /// Read every outstanding reply, oldest first
    pub fn drain(&mut self) -> Result<Vec<Reply>> {
        let mut replies = Vec::with_capacity(self.tracker.outstanding());
        while !self.tracker.is_idle() {
            replies.push(self.read_reply()?);
        }
        Ok(replies)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_state(&self) -> Result<()> {
        match self.state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Unconnected => Err(RedisError::NotConnected),
            ConnectionState::Failed => Err(RedisError::Broken),
        }
    }

    fn require_idle(&self) -> Result<()> {
        self.check_state()?;
        match self.tracker.outstanding() {
            0 => Ok(()),
            n => Err(RedisError::Pending(n)),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.with_transport(|t| {
            let writer = t.writer();
            writer.write_all(bytes)?;
            writer.flush()?;
            Ok(())
        })
    }

    /// Run an I/O step, moving to `Failed` if it breaks the stream
    fn with_transport<T>(&mut self, f: impl FnOnce(&mut dyn Transport) -> Result<T>) -> Result<T> {
        self.check_state()?;
        let transport = self.transport.as_mut().ok_or(RedisError::NotConnected)?;

        let result = f(&mut **transport);
        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!(
                    "Connection to {} failed: {}",
                    self.address.as_deref().unwrap_or("<attached transport>"),
                    e
                );
                self.state = ConnectionState::Failed;
            }
        }
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Address of the current or last connection
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Resolved remote address of the live transport
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.transport.as_ref().and_then(|t| t.peer_addr())
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Number of written commands whose replies are unread
    pub fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("address", &self.address)
            .field("state", &self.state)
            .field("outstanding", &self.tracker.outstanding())
            .finish()
    }
}
