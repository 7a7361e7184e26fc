//! TCP Client Tests
//!
//! End-to-end tests against an in-process fake server over real sockets:
//! - Connecting, reconnecting and idempotent connect
//! - Pipelined batches
//! - Timeouts and server-side disconnects

mod support;

use std::net::TcpListener;
use std::time::{Duration, Instant};

use rediswire::{BulkString, Client, Command, Config, ConnectionState, RedisError, Reply};
use support::{spawn_kv_server, ScriptedTransport};

// =============================================================================
// Connection Tests
// =============================================================================

#[test]
fn test_set_then_get() {
    let addr = spawn_kv_server();
    let mut client = Client::open(&addr.to_string()).unwrap();

    assert_eq!(client.execute::<String>(&Command::set("name", "rediswire")).unwrap(), "OK");
    let value: BulkString = client.execute(&Command::get("name")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"rediswire"[..]));

    let missing: BulkString = client.execute(&Command::get("nope")).unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_connect_same_address_is_noop() {
    let addr = spawn_kv_server().to_string();
    let mut client = Client::default();

    client.connect(&addr).unwrap();
    let first: i64 = client.execute(&Command::new("CLIENT").arg("ID")).unwrap();

    client.connect(&addr).unwrap();
    let second: i64 = client.execute(&Command::new("CLIENT").arg("ID")).unwrap();
    assert_eq!(first, second);

    client.reconnect().unwrap();
    let third: i64 = client.execute(&Command::new("CLIENT").arg("ID")).unwrap();
    assert_ne!(first, third);
    assert_eq!(client.address(), Some(addr.as_str()));
}

#[test]
fn test_connect_host_port() {
    let addr = spawn_kv_server();
    let mut client = Client::default();

    client.connect_host_port("127.0.0.1", addr.port(), None).unwrap();

    assert_eq!(client.peer_addr(), Some(addr));
    assert_eq!(client.execute::<String>(&Command::ping()).unwrap(), "PONG");
}

#[test]
fn test_connect_host_port_with_timeout() {
    let addr = spawn_kv_server();
    let mut client = Client::default();

    client
        .connect_host_port("127.0.0.1", addr.port(), Some(Duration::from_secs(2)))
        .unwrap();

    assert_eq!(client.address(), Some(addr.to_string().as_str()));
    assert_eq!(client.execute::<String>(&Command::ping()).unwrap(), "PONG");
}

#[test]
fn test_connect_after_attach_dials_again() {
    let addr = spawn_kv_server().to_string();
    let mut client = Client::open(&addr).unwrap();

    let (transport, _handle) = ScriptedTransport::new(b"+FROM-MEMORY\r\n");
    client.attach(transport);
    assert_eq!(client.address(), None);

    // Same address string as before the attach: must reconnect, not reuse
    client.connect(&addr).unwrap();
    assert_eq!(client.execute::<String>(&Command::ping()).unwrap(), "PONG");
    assert_eq!(client.address(), Some(addr.as_str()));
}

#[test]
fn test_reconnect_after_attach_without_peer() {
    let addr = spawn_kv_server().to_string();
    let mut client = Client::open(&addr).unwrap();

    let (transport, _handle) = ScriptedTransport::new(b"+PONG\r\n");
    client.attach(transport);

    // No peer to dial back to; the attached transport stays in use
    assert!(matches!(client.reconnect(), Err(RedisError::NotConnected)));
    assert!(client.is_connected());
    assert_eq!(client.execute::<String>(&Command::ping()).unwrap(), "PONG");
}

#[test]
fn test_connect_refused() {
    // Grab a free port, then close the listener so nothing accepts on it
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut client = Client::default();
    let err = client
        .connect_with_timeout(&format!("127.0.0.1:{}", port), Duration::from_secs(2))
        .unwrap_err();

    assert!(matches!(err, RedisError::Connection(_)));
    assert_eq!(client.state(), ConnectionState::Unconnected);
}

#[test]
fn test_connect_empty_address() {
    let mut client = Client::default();
    assert!(matches!(client.connect(""), Err(RedisError::Config(_))));
}

// =============================================================================
// Pipelining Tests
// =============================================================================

#[test]
fn test_pipeline_many_commands() {
    let addr = spawn_kv_server();
    let mut client = Client::open(&addr.to_string()).unwrap();

    let commands: Vec<Command> = (0..100).map(|_| Command::incr("counter")).collect();
    let replies = client.send_commands(&commands).unwrap();

    let expected: Vec<Reply> = (1..=100).map(Reply::Integer).collect();
    assert_eq!(replies, expected);
    assert_eq!(client.outstanding(), 0);
}

#[test]
fn test_write_only_pipeline_over_tcp() {
    let addr = spawn_kv_server();
    let mut client = Client::open(&addr.to_string()).unwrap();

    for i in 0..10 {
        client.write_only(&Command::set(format!("k{}", i), i.to_string())).unwrap();
    }
    assert_eq!(client.outstanding(), 10);

    let replies = client.drain().unwrap();
    assert_eq!(replies.len(), 10);
    assert!(replies.iter().all(|r| *r == Reply::ok()));

    let value: BulkString = client.execute(&Command::get("k7")).unwrap();
    assert_eq!(value.as_deref(), Some(&b"7"[..]));
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_read_timeout_breaks_connection() {
    let addr = spawn_kv_server();
    let config = Config::builder()
        .read_timeout(Duration::from_millis(100))
        .build();
    let mut client = Client::open_with_config(&addr.to_string(), config).unwrap();

    let started = Instant::now();
    let err = client.send_command(&Command::new("BLACKHOLE")).unwrap_err();

    assert!(matches!(err, RedisError::Io(_)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(client.state(), ConnectionState::Failed);

    client.reconnect().unwrap();
    assert_eq!(client.execute::<String>(&Command::ping()).unwrap(), "PONG");
}

#[test]
fn test_unknown_command_keeps_connection() {
    let addr = spawn_kv_server();
    let mut client = Client::open(&addr.to_string()).unwrap();

    let err = client.execute::<String>(&Command::new("FROBNICATE")).unwrap_err();
    assert!(err.is_server_error());
    assert!(client.is_connected());
    assert_eq!(client.execute::<i64>(&Command::del(["missing"])).unwrap(), 0);
}
