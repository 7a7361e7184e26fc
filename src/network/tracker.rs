//! Pipeline bookkeeping
//!
//! Counts commands written whose replies have not been read yet.

use crate::error::{RedisError, Result};

/// Outstanding-reply counter
///
/// Replies arrive strictly in write order, so a count is all the state a
/// pipelined connection needs. Reading with nothing outstanding means the
/// caller's own bookkeeping has drifted from the stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTracker {
    outstanding: usize,
}

impl PipelineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one command written
    pub fn on_write(&mut self) {
        self.outstanding += 1;
    }

    /// Claim one reply; fails with `UnexpectedRead` when none is outstanding
    pub fn on_read(&mut self) -> Result<()> {
        if self.outstanding == 0 {
            return Err(RedisError::UnexpectedRead);
        }
        self.outstanding -= 1;
        Ok(())
    }

    /// Check that a reply may be read, without claiming it
    pub fn expect_read(&self) -> Result<()> {
        if self.outstanding == 0 {
            Err(RedisError::UnexpectedRead)
        } else {
            Ok(())
        }
    }

    /// Forget all outstanding replies (on disconnect)
    pub fn reset(&mut self) {
        self.outstanding = 0;
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }
}
