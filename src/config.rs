//! Configuration for rediswire
//!
//! Centralized client configuration with sensible defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default upper bound for encoded commands and bulk replies (512 MB,
/// the server's own proto-max-bulk-len default)
pub const DEFAULT_MAX_SIZE: usize = 512 * 1024 * 1024;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Timeouts (None = block indefinitely)
    // -------------------------------------------------------------------------
    /// Maximum time to wait for the TCP handshake
    pub connect_timeout: Option<Duration>,

    /// Socket read timeout
    pub read_timeout: Option<Duration>,

    /// Socket write timeout
    pub write_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Socket Options
    // -------------------------------------------------------------------------
    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Protocol Limits
    // -------------------------------------------------------------------------
    /// Largest encoded command accepted by the encoder (in bytes)
    pub max_command_size: usize,

    /// Largest bulk string the decoder will allocate for (in bytes)
    pub max_bulk_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            nodelay: true,
            max_command_size: DEFAULT_MAX_SIZE,
            max_bulk_len: DEFAULT_MAX_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// Set the write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.config.write_timeout = Some(timeout);
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Set the maximum encoded command size (in bytes)
    pub fn max_command_size(mut self, size: usize) -> Self {
        self.config.max_command_size = size;
        self
    }

    /// Set the maximum bulk reply length (in bytes)
    pub fn max_bulk_len(mut self, size: usize) -> Self {
        self.config.max_bulk_len = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
