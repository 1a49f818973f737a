//! Queue abstraction traits
//!
//! The broker is an external collaborator: the pipeline only assumes a
//! durable, at-least-once delivery channel. These traits are the seam every
//! queue backend must implement.

use crate::domain::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Append side of a queue topic
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Append one serialized message to the topic
    ///
    /// Durability is only guaranteed after [`flush`](Self::flush) returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be appended. Callers treat
    /// this as a row-level failure and continue with the next row.
    async fn publish(&mut self, payload: &[u8]) -> Result<()>;

    /// Flush all appended messages to durable storage
    ///
    /// The produce stage is not complete until this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails; appended-but-unflushed messages
    /// must be considered lost.
    async fn flush(&mut self) -> Result<()>;
}

/// Drain side of a queue topic
///
/// A consumer reads from the earliest offset not yet committed by its
/// consumer group. Offsets are committed automatically as messages are
/// returned, so a message handed to the caller will not be redelivered to
/// the same group by a later drain.
#[async_trait]
pub trait QueueConsumer: Send + Sync {
    /// Read the next message, waiting up to `idle_timeout` for one to arrive
    ///
    /// Returns `Ok(None)` when no new message arrived within the idle
    /// window, which terminates a drain.
    ///
    /// # Errors
    ///
    /// Returns an error if the topic cannot be read or the offset cannot be
    /// committed.
    async fn poll(&mut self, idle_timeout: Duration) -> Result<Option<Vec<u8>>>;
}
