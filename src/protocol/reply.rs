//! Reply definitions
//!
//! The decoded form of a server reply, and the typed coercions used by
//! `Client::execute`.

use std::fmt;

use bytes::Bytes;

use crate::error::{RedisError, Result};

/// A bulk string reply; `None` is the null bulk string (`$-1`)
pub type BulkString = Option<Bytes>;

/// An array reply; `None` is the null array (`*-1`)
pub type Array = Option<Vec<Reply>>;

/// A decoded server reply
///
/// Null bulk strings and null arrays are distinct from empty ones: a missing
/// key is `BulkString(None)`, an empty value is `BulkString(Some(""))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `:<integer>`
    Integer(i64),

    /// `+<text>`, never contains CR or LF
    SimpleString(String),

    /// `$<len>` followed by `len` bytes, or `$-1`
    BulkString(BulkString),

    /// `*<count>` followed by `count` replies, or `*-1`
    Array(Array),

    /// `-<message>`
    Error(String),
}

impl Reply {
    /// Short name of the active variant, used in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Integer(_) => "integer",
            Reply::SimpleString(_) => "simple string",
            Reply::BulkString(_) => "bulk string",
            Reply::Array(_) => "array",
            Reply::Error(_) => "error",
        }
    }

    /// Whether this is a null bulk string or null array
    pub fn is_null(&self) -> bool {
        matches!(self, Reply::BulkString(None) | Reply::Array(None))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Turn an error reply into `RedisError::Server`, pass anything else through
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(message) => Err(RedisError::Server(message)),
            other => Ok(other),
        }
    }

    /// Coerce into a typed value
    ///
    /// Error replies become `RedisError::Server`; a variant that does not
    /// match `T` becomes `RedisError::TypeMismatch`.
    pub fn into_typed<T: FromReply>(self) -> Result<T> {
        T::from_reply(self.into_result()?)
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn ok() -> Self {
        Reply::SimpleString("OK".to_string())
    }

    pub fn bulk(data: impl AsRef<[u8]>) -> Self {
        Reply::BulkString(Some(Bytes::copy_from_slice(data.as_ref())))
    }

    pub fn null_bulk() -> Self {
        Reply::BulkString(None)
    }

    pub fn array(items: Vec<Reply>) -> Self {
        Reply::Array(Some(items))
    }

    pub fn null_array() -> Self {
        Reply::Array(None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(i) => write!(f, "(integer) {}", i),
            Reply::SimpleString(s) => write!(f, "{}", s),
            Reply::BulkString(Some(b)) => write!(f, "\"{}\"", String::from_utf8_lossy(b)),
            Reply::BulkString(None) => write!(f, "(nil)"),
            Reply::Array(None) => write!(f, "(nil array)"),
            Reply::Array(Some(items)) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(Some(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {}", i + 1, item)?;
                }
                Ok(())
            }
            Reply::Error(message) => write!(f, "(error) {}", message),
        }
    }
}

// =============================================================================
// Typed Coercion
// =============================================================================

/// Conversion from a non-error reply into a concrete Rust type
pub trait FromReply: Sized {
    /// Name reported as `expected` on mismatch
    const EXPECTED: &'static str;

    fn from_reply(reply: Reply) -> Result<Self>;
}

fn mismatch<T: FromReply>(reply: &Reply) -> RedisError {
    RedisError::TypeMismatch {
        expected: T::EXPECTED,
        actual: reply.kind(),
    }
}

impl FromReply for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Integer(i) => Ok(i),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromReply for String {
    const EXPECTED: &'static str = "simple string";

    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::SimpleString(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromReply for BulkString {
    const EXPECTED: &'static str = "bulk string";

    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::BulkString(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromReply for Array {
    const EXPECTED: &'static str = "array";

    fn from_reply(reply: Reply) -> Result<Self> {
        match reply {
            Reply::Array(items) => Ok(items),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromReply for Reply {
    const EXPECTED: &'static str = "any";

    fn from_reply(reply: Reply) -> Result<Self> {
        Ok(reply)
    }
}
