//! Queue adapters
//!
//! The durable, at-least-once delivery channel between the producer and
//! consumer stages. [`FileQueue`] is the durable backend; [`MemoryQueue`]
//! backs tests and dry runs.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::{FileQueue, FileQueueConsumer, FileQueuePublisher};
pub use memory::{MemoryQueue, MemoryQueueConsumer, MemoryQueuePublisher};
pub use traits::{QueueConsumer, QueuePublisher};
