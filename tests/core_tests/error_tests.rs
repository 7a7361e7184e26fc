//! Error Tests
//!
//! Tests for error classification and messages.

use std::io;

use rediswire::RedisError;

#[test]
fn test_fatal_classification() {
    let io = RedisError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
    assert!(io.is_fatal());
    assert!(RedisError::Protocol("bad prefix".into()).is_fatal());
    assert!(RedisError::Connection("refused".into()).is_fatal());

    assert!(!RedisError::Server("ERR".into()).is_fatal());
    assert!(!RedisError::UnexpectedRead.is_fatal());
    assert!(!RedisError::Pending(2).is_fatal());
    assert!(!RedisError::TypeMismatch { expected: "integer", actual: "bulk string" }.is_fatal());
}

#[test]
fn test_server_error_classification() {
    assert!(RedisError::Server("ERR".into()).is_server_error());
    assert!(!RedisError::Protocol("x".into()).is_server_error());
}

#[test]
fn test_display() {
    let err = RedisError::TypeMismatch { expected: "integer", actual: "bulk string" };
    assert_eq!(err.to_string(), "Type mismatch: expected integer, got bulk string");
    assert_eq!(RedisError::Server("ERR bad arg".into()).to_string(), "Server error: ERR bad arg");
}
