//! Tests for TcpTransport
//!
//! These tests verify:
//! - Wrapping a connected stream
//! - Changing socket timeouts after connect
//! - Socket setup failures reported as connection errors

use std::io::{BufRead, ErrorKind, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use rediswire::network::{TcpTransport, Transport};
use rediswire::{Config, RedisError};

// =============================================================================
// Helper Functions
// =============================================================================

/// A connected client stream plus the server's end of it
fn socket_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let (server, _) = listener.accept().unwrap();
    (client, server)
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_from_stream_reports_peer() {
    let (client, server) = socket_pair();
    let expected = client.peer_addr().unwrap();

    let transport = TcpTransport::from_stream(client, &Config::default()).unwrap();
    assert_eq!(transport.peer_addr(), Some(expected));
    drop(server);
}

#[test]
fn test_set_timeouts_applies_to_reads() {
    let (client, _server) = socket_pair();
    let mut transport = TcpTransport::from_stream(client, &Config::default()).unwrap();

    transport
        .set_timeouts(Some(Duration::from_millis(50)), None)
        .unwrap();

    let started = Instant::now();
    let err = transport.reader().fill_buf().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_zero_timeouts_mean_blocking() {
    let (client, _server) = socket_pair();
    let mut transport = TcpTransport::from_stream(client, &Config::default()).unwrap();

    transport
        .set_timeouts(Some(Duration::ZERO), Some(Duration::ZERO))
        .unwrap();
}

#[test]
fn test_setup_failure_is_connection_error() {
    let (mut client, server) = socket_pair();

    // Closing with unread data makes the server reset the connection
    client.write_all(b"unread").unwrap();
    thread::sleep(Duration::from_millis(50));
    drop(server);

    let deadline = Instant::now() + Duration::from_secs(5);
    while client.peer_addr().is_ok() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    let err = TcpTransport::from_stream(client, &Config::default()).unwrap_err();
    assert!(matches!(err, RedisError::Connection(_)));
}
