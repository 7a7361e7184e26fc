//! Network Module
//!
//! Transport and pipeline bookkeeping for a single server connection.
//!
//! ## Architecture
//! - One blocking transport per client, no internal threads
//! - Replies are read back strictly in the order commands were written

mod transport;
mod tracker;

pub use transport::{TcpTransport, Transport};
pub use tracker::PipelineTracker;
