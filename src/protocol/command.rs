//! Command definitions
//!
//! A command is an ordered list of binary-safe arguments, the first of which
//! is the verb (`GET`, `SET`, ...).

use std::fmt;

use bytes::Bytes;

use crate::error::{RedisError, Result};

/// A request to send to the server
///
/// Always holds at least the verb; building an empty command through
/// [`Command::from_args`] fails with an encoding error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<Bytes>,
}

impl Command {
    /// Start a command with the given verb
    pub fn new(verb: impl AsRef<[u8]>) -> Self {
        Self {
            args: vec![Bytes::copy_from_slice(verb.as_ref())],
        }
    }

    /// Build a command from an argument list (verb first)
    pub fn from_args<I, A>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        let args: Vec<Bytes> = args
            .into_iter()
            .map(|a| Bytes::copy_from_slice(a.as_ref()))
            .collect();

        if args.is_empty() {
            return Err(RedisError::Encoding("command has no verb".to_string()));
        }

        Ok(Self { args })
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(Bytes::copy_from_slice(arg.as_ref()));
        self
    }

    /// Append several arguments
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        self.args
            .extend(args.into_iter().map(|a| Bytes::copy_from_slice(a.as_ref())));
        self
    }

    /// The verb (first argument)
    pub fn name(&self) -> &[u8] {
        &self.args[0]
    }

    /// All arguments, verb included
    pub fn as_slice(&self) -> &[Bytes] {
        &self.args
    }

    /// Number of arguments, verb included
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Never true; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    // =========================================================================
    // Common Commands
    // =========================================================================

    pub fn ping() -> Self {
        Self::new("PING")
    }

    pub fn echo(message: impl AsRef<[u8]>) -> Self {
        Self::new("ECHO").arg(message)
    }

    pub fn get(key: impl AsRef<[u8]>) -> Self {
        Self::new("GET").arg(key)
    }

    pub fn set(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self::new("SET").arg(key).arg(value)
    }

    pub fn del<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        Self::new("DEL").args(keys)
    }

    pub fn exists<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        Self::new("EXISTS").args(keys)
    }

    pub fn incr(key: impl AsRef<[u8]>) -> Self {
        Self::new("INCR").arg(key)
    }

    pub fn incr_by(key: impl AsRef<[u8]>, delta: i64) -> Self {
        Self::new("INCRBY").arg(key).arg(delta.to_string())
    }

    pub fn append(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self::new("APPEND").arg(key).arg(value)
    }

    pub fn mget<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        Self::new("MGET").args(keys)
    }

    /// `MSET k1 v1 k2 v2 ...`
    pub fn mset<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        pairs
            .into_iter()
            .fold(Self::new("MSET"), |cmd, (k, v)| cmd.arg(k).arg(v))
    }

    pub fn expire(key: impl AsRef<[u8]>, seconds: u64) -> Self {
        Self::new("EXPIRE").arg(key).arg(seconds.to_string())
    }

    pub fn lpush<I, V>(key: impl AsRef<[u8]>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        Self::new("LPUSH").arg(key).args(values)
    }

    pub fn rpush<I, V>(key: impl AsRef<[u8]>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        Self::new("RPUSH").arg(key).args(values)
    }

    pub fn lrange(key: impl AsRef<[u8]>, start: i64, stop: i64) -> Self {
        Self::new("LRANGE")
            .arg(key)
            .arg(start.to_string())
            .arg(stop.to_string())
    }

    pub fn flushdb() -> Self {
        Self::new("FLUSHDB")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", String::from_utf8_lossy(arg))?;
        }
        Ok(())
    }
}
