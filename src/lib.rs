//! # rediswire
//!
//! A blocking Redis wire-protocol client with:
//! - Multi-bulk command encoding
//! - A decoder for the full reply grammar, nested arrays included
//! - Pipelining with strict FIFO reply ordering
//! - Typed reply coercion with distinct server and type errors
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Client                              │
//! │        execute<T> / send_command / send_commands             │
//! └───────────┬──────────────────┬───────────────────┬──────────┘
//!             │                  │                   │
//!             ▼                  ▼                   ▼
//!    ┌────────────────┐  ┌───────────────┐  ┌─────────────────┐
//!    │ Command codec  │  │ Reply decoder │  │ PipelineTracker │
//!    │   (encode)     │  │  (read_reply) │  │ (unread count)  │
//!    └───────┬────────┘  └───────▲───────┘  └─────────────────┘
//!            │                   │
//!            ▼                   │
//!    ┌──────────────────────────────────────┐
//!    │      Transport (TCP, buffered)       │
//!    └──────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rediswire::{BulkString, Client, Command};
//!
//! fn example() -> rediswire::Result<()> {
//!     let mut client = Client::open("127.0.0.1:6379")?;
//!
//!     client.execute::<String>(&Command::set("greeting", "hello"))?;
//!     let value: BulkString = client.execute(&Command::get("greeting"))?;
//!     assert_eq!(value.as_deref(), Some(&b"hello"[..]));
//!
//!     let replies = client.send_commands(&[Command::incr("n"), Command::incr("n")])?;
//!     assert_eq!(replies.len(), 2);
//!     Ok(())
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RedisError, Result};
pub use config::Config;
pub use client::{Client, ConnectionState};
pub use shared::SharedClient;
pub use protocol::{Array, BulkString, Command, FromReply, Reply};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rediswire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
