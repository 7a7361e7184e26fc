//! Shared client handle
//!
//! A [`Client`] has no internal locking. `SharedClient` wraps one in a
//! mutex so clones of the handle can be used from several threads; each
//! call holds the lock for the full write/read exchange.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::client::Client;
use crate::error::Result;
use crate::protocol::{Command, FromReply, Reply};

/// Cloneable, thread-safe handle to one client connection
#[derive(Clone)]
pub struct SharedClient {
    inner: Arc<Mutex<Client>>,
}

impl SharedClient {
    pub fn new(client: Client) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Exclusive access for multi-step sequences (e.g. `write_only` then
    /// `read_reply`)
    pub fn lock(&self) -> MutexGuard<'_, Client> {
        self.inner.lock()
    }

    pub fn send_command(&self, command: &Command) -> Result<Reply> {
        self.inner.lock().send_command(command)
    }

    pub fn send_commands(&self, commands: &[Command]) -> Result<Vec<Reply>> {
        self.inner.lock().send_commands(commands)
    }

    pub fn execute<T: FromReply>(&self, command: &Command) -> Result<T> {
        self.inner.lock().execute(command)
    }
}

impl From<Client> for SharedClient {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}
