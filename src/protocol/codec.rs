//! Protocol codec
//!
//! Encoding of commands and decoding of replies for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Command (multi-bulk)
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg bytes>\r\n      (argc times)
//! ```
//!
//! ### Reply (first byte selects the type)
//! ```text
//! +<text>\r\n                     simple string
//! -<text>\r\n                     error
//! :<integer>\r\n                  integer
//! $<len>\r\n<len bytes>\r\n       bulk string ($-1\r\n = null)
//! *<count>\r\n<count replies>     array       (*-1\r\n = null)
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{RedisError, Result};
use super::{Command, Reply};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Reply type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// Upper bound on capacity reserved up front for an announced array count
const ARRAY_PREALLOC_LIMIT: usize = 1024;

// =============================================================================
// Command Encoding
// =============================================================================

fn decimal_len(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Exact number of bytes `command` occupies on the wire
pub fn encoded_len(command: &Command) -> usize {
    let header = 1 + decimal_len(command.len()) + CRLF.len();
    command.as_slice().iter().fold(header, |total, arg| {
        total + 1 + decimal_len(arg.len()) + CRLF.len() + arg.len() + CRLF.len()
    })
}

/// Append the multi-bulk form of `command` to `buf`
///
/// Fails with `Encoding` if the command would exceed `max_size` bytes.
pub fn encode_command_into(command: &Command, buf: &mut BytesMut, max_size: usize) -> Result<()> {
    if command.is_empty() {
        return Err(RedisError::Encoding("command has no verb".to_string()));
    }

    let size = encoded_len(command);
    if size > max_size {
        return Err(RedisError::Encoding(format!(
            "command too large: {} bytes (max {})",
            size, max_size
        )));
    }

    buf.reserve(size);
    buf.put_u8(prefix::ARRAY);
    buf.put_slice(command.len().to_string().as_bytes());
    buf.put_slice(CRLF);

    for arg in command.as_slice() {
        buf.put_u8(prefix::BULK_STRING);
        buf.put_slice(arg.len().to_string().as_bytes());
        buf.put_slice(CRLF);
        buf.put_slice(arg);
        buf.put_slice(CRLF);
    }

    Ok(())
}

/// Encode a command to bytes
pub fn encode_command(command: &Command, max_size: usize) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_command_into(command, &mut buf, max_size)?;
    Ok(buf.freeze())
}

/// Write a command to a stream and flush it
pub fn write_command<W: Write + ?Sized>(writer: &mut W, command: &Command, max_size: usize) -> Result<()> {
    let bytes = encode_command(command, max_size)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Result of reading one type line
enum Header {
    /// A complete scalar (or null/empty container) reply
    Value(Reply),

    /// An array header announcing this many elements
    Array(usize),
}

fn eof() -> RedisError {
    RedisError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "connection closed by server",
    ))
}

/// Read one CRLF-terminated line into `line`, without the terminator
fn read_line<R: BufRead + ?Sized>(reader: &mut R, line: &mut Vec<u8>, limit: usize) -> Result<()> {
    line.clear();
    let max = (limit as u64).saturating_add(CRLF.len() as u64);
    let n = (&mut *reader).take(max).read_until(b'\n', line)?;

    if n == 0 {
        return Err(eof());
    }
    if !line.ends_with(b"\n") {
        if (n as u64) < max {
            return Err(eof());
        }
        return Err(RedisError::Protocol(format!("line exceeds {} bytes", limit)));
    }
    if !line.ends_with(CRLF) {
        return Err(RedisError::Protocol("line not terminated by CRLF".to_string()));
    }

    line.truncate(line.len() - CRLF.len());
    Ok(())
}

fn parse_integer(digits: &[u8]) -> Result<i64> {
    // Only an optional '-' sign is valid on the wire; `str::parse` also takes '+'
    std::str::from_utf8(digits)
        .ok()
        .filter(|s| !s.starts_with('+'))
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            RedisError::Protocol(format!(
                "invalid integer: {:?}",
                String::from_utf8_lossy(digits)
            ))
        })
}

fn parse_text(text: &[u8]) -> Result<String> {
    String::from_utf8(text.to_vec())
        .map_err(|_| RedisError::Protocol("reply line is not valid UTF-8".to_string()))
}

/// Parse a `$`/`*` length; `None` means the null form (`-1`)
fn parse_length(digits: &[u8], what: &str) -> Result<Option<usize>> {
    match parse_integer(digits)? {
        -1 => Ok(None),
        n if n < 0 => Err(RedisError::Protocol(format!("invalid {} length: {}", what, n))),
        n => usize::try_from(n)
            .map(Some)
            .map_err(|_| RedisError::Protocol(format!("{} length out of range: {}", what, n))),
    }
}

fn read_bulk<R: BufRead + ?Sized>(reader: &mut R, len: usize) -> Result<Bytes> {
    let mut data = vec![0u8; len + CRLF.len()];
    reader.read_exact(&mut data).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            eof()
        } else {
            RedisError::Io(e)
        }
    })?;

    if !data.ends_with(CRLF) {
        return Err(RedisError::Protocol(
            "bulk string not terminated by CRLF".to_string(),
        ));
    }

    data.truncate(len);
    Ok(Bytes::from(data))
}

fn read_header<R: BufRead + ?Sized>(reader: &mut R, line: &mut Vec<u8>, max_bulk_len: usize) -> Result<Header> {
    read_line(reader, line, max_bulk_len)?;

    let (&type_byte, rest) = line
        .split_first()
        .ok_or_else(|| RedisError::Protocol("empty reply line".to_string()))?;

    match type_byte {
        prefix::SIMPLE_STRING => Ok(Header::Value(Reply::SimpleString(parse_text(rest)?))),
        prefix::ERROR => Ok(Header::Value(Reply::Error(parse_text(rest)?))),
        prefix::INTEGER => Ok(Header::Value(Reply::Integer(parse_integer(rest)?))),
        prefix::BULK_STRING => match parse_length(rest, "bulk string")? {
            None => Ok(Header::Value(Reply::BulkString(None))),
            Some(len) if len > max_bulk_len => Err(RedisError::Protocol(format!(
                "bulk string too large: {} bytes (max {})",
                len, max_bulk_len
            ))),
            Some(len) => Ok(Header::Value(Reply::BulkString(Some(read_bulk(reader, len)?)))),
        },
        prefix::ARRAY => match parse_length(rest, "array")? {
            None => Ok(Header::Value(Reply::Array(None))),
            Some(0) => Ok(Header::Value(Reply::Array(Some(Vec::new())))),
            Some(count) => Ok(Header::Array(count)),
        },
        other => Err(RedisError::Protocol(format!(
            "unknown reply type byte: 0x{:02x}",
            other
        ))),
    }
}

/// Read one complete reply from a stream
///
/// Blocks until the whole value, nested elements included, has arrived.
/// Arrays are assembled on an explicit stack, so nesting depth is limited
/// only by memory.
pub fn read_reply<R: BufRead + ?Sized>(reader: &mut R, max_bulk_len: usize) -> Result<Reply> {
    // Arrays still being filled: (announced count, elements so far)
    let mut open: Vec<(usize, Vec<Reply>)> = Vec::new();
    let mut line = Vec::new();

    loop {
        let mut value = match read_header(reader, &mut line, max_bulk_len)? {
            Header::Value(value) => value,
            Header::Array(count) => {
                open.push((count, Vec::with_capacity(count.min(ARRAY_PREALLOC_LIMIT))));
                continue;
            }
        };

        // Push the finished value into its parent, closing every array it completes
        loop {
            match open.pop() {
                None => return Ok(value),
                Some((count, mut items)) => {
                    items.push(value);
                    if items.len() < count {
                        open.push((count, items));
                        break;
                    }
                    value = Reply::Array(Some(items));
                }
            }
        }
    }
}

/// Decode one reply from a byte slice
///
/// Returns the reply and the number of bytes consumed. A truncated buffer
/// yields an `Io` error of kind `UnexpectedEof`.
pub fn decode_reply(bytes: &[u8], max_bulk_len: usize) -> Result<(Reply, usize)> {
    let mut cursor = io::Cursor::new(bytes);
    let reply = read_reply(&mut cursor, max_bulk_len)?;
    Ok((reply, cursor.position() as usize))
}

// =============================================================================
// Reply Encoding
// =============================================================================

fn encode_reply_into(reply: &Reply, buf: &mut BytesMut) {
    match reply {
        Reply::Integer(i) => {
            buf.put_u8(prefix::INTEGER);
            buf.put_slice(i.to_string().as_bytes());
            buf.put_slice(CRLF);
        }
        Reply::SimpleString(s) => {
            buf.put_u8(prefix::SIMPLE_STRING);
            buf.put_slice(s.as_bytes());
            buf.put_slice(CRLF);
        }
        Reply::Error(message) => {
            buf.put_u8(prefix::ERROR);
            buf.put_slice(message.as_bytes());
            buf.put_slice(CRLF);
        }
        Reply::BulkString(None) => buf.put_slice(b"$-1\r\n"),
        Reply::BulkString(Some(data)) => {
            buf.put_u8(prefix::BULK_STRING);
            buf.put_slice(data.len().to_string().as_bytes());
            buf.put_slice(CRLF);
            buf.put_slice(data);
            buf.put_slice(CRLF);
        }
        Reply::Array(None) => buf.put_slice(b"*-1\r\n"),
        Reply::Array(Some(items)) => {
            buf.put_u8(prefix::ARRAY);
            buf.put_slice(items.len().to_string().as_bytes());
            buf.put_slice(CRLF);
            for item in items {
                encode_reply_into(item, buf);
            }
        }
    }
}

/// Encode a reply to its wire form
pub fn encode_reply(reply: &Reply) -> Bytes {
    let mut buf = BytesMut::new();
    encode_reply_into(reply, &mut buf);
    buf.freeze()
}

/// Write a reply to a stream and flush it
pub fn write_reply<W: Write + ?Sized>(writer: &mut W, reply: &Reply) -> Result<()> {
    writer.write_all(&encode_reply(reply))?;
    writer.flush()?;
    Ok(())
}
