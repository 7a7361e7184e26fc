//! Protocol Module
//!
//! Defines the request/reply wire protocol spoken with the server.
//!
//! ## Request Format
//! Every command is sent as an array of bulk strings:
//! ```text
//! *2\r\n$3\r\nGET\r\n$3\r\nkey\r\n
//! ```
//!
//! ## Reply Format
//! The first byte of each reply selects one of five types:
//! - `+` simple string
//! - `-` error
//! - `:` integer
//! - `$` bulk string (may be null)
//! - `*` array of replies (may be null, may nest)

mod command;
mod reply;
mod codec;

pub use command::Command;
pub use reply::{Array, BulkString, FromReply, Reply};
pub use codec::{
    decode_reply, encode_command, encode_command_into, encode_reply, encoded_len, read_reply,
    write_command, write_reply, CRLF,
};
