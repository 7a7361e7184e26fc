//! Config Tests
//!
//! Tests for defaults and the builder.

use std::time::Duration;

use rediswire::config::DEFAULT_MAX_SIZE;
use rediswire::Config;

#[test]
fn test_defaults_block_indefinitely() {
    let config = Config::default();
    assert!(config.connect_timeout.is_none());
    assert!(config.read_timeout.is_none());
    assert!(config.write_timeout.is_none());
    assert!(config.nodelay);
    assert_eq!(config.max_command_size, DEFAULT_MAX_SIZE);
    assert_eq!(config.max_bulk_len, DEFAULT_MAX_SIZE);
}

#[test]
fn test_builder_overrides() {
    let config = Config::builder()
        .connect_timeout(Duration::from_millis(250))
        .read_timeout(Duration::from_secs(2))
        .nodelay(false)
        .max_command_size(1024)
        .build();

    assert_eq!(config.connect_timeout, Some(Duration::from_millis(250)));
    assert_eq!(config.read_timeout, Some(Duration::from_secs(2)));
    assert!(config.write_timeout.is_none());
    assert!(!config.nodelay);
    assert_eq!(config.max_command_size, 1024);
}
