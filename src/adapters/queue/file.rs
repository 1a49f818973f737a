//! File-backed durable queue topic
//!
//! A topic is an append-only log file under the queue data directory, one
//! JSON message per line. Durability comes from `sync_all` on flush. Each
//! consumer group tracks its position in a sidecar offset file, giving
//! at-least-once delivery: a message is redelivered if the process dies
//! between reading it and committing the offset, never the other way around.

use crate::adapters::queue::traits::{QueueConsumer, QueuePublisher};
use crate::domain::{QueueError, Result};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How often the consumer re-checks the log while waiting for a message
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a named file-backed topic
#[derive(Debug, Clone)]
pub struct FileQueue {
    topic: String,
    log_path: PathBuf,
    data_dir: PathBuf,
}

impl FileQueue {
    /// Open (or create) a topic under the given data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(data_dir: impl AsRef<Path>, topic: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|e| QueueError::OpenFailed {
            topic: topic.to_string(),
            message: format!("cannot create data directory {}: {e}", data_dir.display()),
        })?;

        Ok(Self {
            topic: topic.to_string(),
            log_path: data_dir.join(format!("{topic}.log")),
            data_dir,
        })
    }

    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Open the append side of the topic
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened for appending.
    pub fn publisher(&self) -> Result<FileQueuePublisher> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| QueueError::OpenFailed {
                topic: self.topic.clone(),
                message: e.to_string(),
            })?;

        Ok(FileQueuePublisher {
            topic: self.topic.clone(),
            file,
        })
    }

    /// Open the drain side of the topic for a consumer group
    ///
    /// Reading starts from the group's committed offset, or from the
    /// earliest retained message if the group has never committed.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing offset file cannot be read.
    pub fn consumer(&self, group: &str) -> Result<FileQueueConsumer> {
        let offset_path = self.data_dir.join(format!("{}.{group}.offset", self.topic));
        let offset = match std::fs::read_to_string(&offset_path) {
            Ok(contents) => {
                contents
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| QueueError::OpenFailed {
                        topic: self.topic.clone(),
                        message: format!("corrupt offset file {}: {e}", offset_path.display()),
                    })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(QueueError::OpenFailed {
                    topic: self.topic.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        };

        tracing::debug!(
            topic = %self.topic,
            group = %group,
            offset = offset,
            "Opened consumer"
        );

        Ok(FileQueueConsumer {
            topic: self.topic.clone(),
            log_path: self.log_path.clone(),
            offset_path,
            offset,
        })
    }
}

/// Append side of a file-backed topic
pub struct FileQueuePublisher {
    topic: String,
    file: File,
}

#[async_trait]
impl QueuePublisher for FileQueuePublisher {
    async fn publish(&mut self, payload: &[u8]) -> Result<()> {
        // One message per line; JSON payloads never contain a raw newline
        let mut line = Vec::with_capacity(payload.len() + 1);
        line.extend_from_slice(payload);
        line.push(b'\n');

        self.file
            .write_all(&line)
            .map_err(|e| QueueError::AppendFailed {
                topic: self.topic.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.file.sync_all().map_err(|e| QueueError::FlushFailed {
            topic: self.topic.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(topic = %self.topic, "Flushed topic to durable storage");
        Ok(())
    }
}

/// Drain side of a file-backed topic for one consumer group
pub struct FileQueueConsumer {
    topic: String,
    log_path: PathBuf,
    offset_path: PathBuf,
    offset: u64,
}

impl FileQueueConsumer {
    /// Read the next complete line at the current offset, if one exists
    fn read_next(&self) -> Result<Option<Vec<u8>>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            // A topic nobody has published to yet is just empty
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(QueueError::ReadFailed {
                    topic: self.topic.clone(),
                    message: e.to_string(),
                }
                .into())
            }
        };

        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.offset))
            .map_err(|e| QueueError::ReadFailed {
                topic: self.topic.clone(),
                message: e.to_string(),
            })?;

        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match reader.read(&mut byte) {
                Ok(0) => {
                    // Partial line without a terminator: the publisher has
                    // not finished appending it yet
                    return Ok(None);
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        return Ok(Some(line));
                    }
                    line.push(byte[0]);
                }
                Err(e) => {
                    return Err(QueueError::ReadFailed {
                        topic: self.topic.clone(),
                        message: e.to_string(),
                    }
                    .into())
                }
            }
        }
    }

    /// Persist the committed offset for this consumer group
    fn commit(&self) -> Result<()> {
        std::fs::write(&self.offset_path, self.offset.to_string()).map_err(|e| {
            QueueError::CommitFailed {
                topic: self.topic.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}

#[async_trait]
impl QueueConsumer for FileQueueConsumer {
    async fn poll(&mut self, idle_timeout: Duration) -> Result<Option<Vec<u8>>> {
        let started = Instant::now();

        loop {
            if let Some(payload) = self.read_next()? {
                // +1 for the line terminator
                self.offset += payload.len() as u64 + 1;
                self.commit()?;
                return Ok(Some(payload));
            }

            if started.elapsed() >= idle_timeout {
                return Ok(None);
            }

            tokio::time::sleep(POLL_INTERVAL.min(idle_timeout)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_publish_flush_poll_round_trip() {
        let dir = TempDir::new().unwrap();
        let queue = FileQueue::new(dir.path(), "patient-data").unwrap();

        let mut publisher = queue.publisher().unwrap();
        publisher.publish(br#"{"id":"1"}"#).await.unwrap();
        publisher.publish(br#"{"id":"2"}"#).await.unwrap();
        publisher.flush().await.unwrap();

        let mut consumer = queue.consumer("importer").unwrap();
        let first = consumer.poll(Duration::from_millis(50)).await.unwrap();
        let second = consumer.poll(Duration::from_millis(50)).await.unwrap();
        let third = consumer.poll(Duration::from_millis(50)).await.unwrap();

        assert_eq!(first.as_deref(), Some(br#"{"id":"1"}"#.as_slice()));
        assert_eq!(second.as_deref(), Some(br#"{"id":"2"}"#.as_slice()));
        assert!(third.is_none());
    }

    #[tokio::test]
    async fn test_offset_survives_consumer_restart() {
        let dir = TempDir::new().unwrap();
        let queue = FileQueue::new(dir.path(), "patient-data").unwrap();

        let mut publisher = queue.publisher().unwrap();
        publisher.publish(b"first").await.unwrap();
        publisher.publish(b"second").await.unwrap();
        publisher.flush().await.unwrap();

        {
            let mut consumer = queue.consumer("importer").unwrap();
            let msg = consumer.poll(Duration::from_millis(50)).await.unwrap();
            assert_eq!(msg.as_deref(), Some(b"first".as_slice()));
        }

        // A new consumer in the same group resumes after the commit
        let mut consumer = queue.consumer("importer").unwrap();
        let msg = consumer.poll(Duration::from_millis(50)).await.unwrap();
        assert_eq!(msg.as_deref(), Some(b"second".as_slice()));
    }

    #[tokio::test]
    async fn test_consumer_groups_are_independent() {
        let dir = TempDir::new().unwrap();
        let queue = FileQueue::new(dir.path(), "patient-data").unwrap();

        let mut publisher = queue.publisher().unwrap();
        publisher.publish(b"payload").await.unwrap();
        publisher.flush().await.unwrap();

        let mut first = queue.consumer("group-a").unwrap();
        let mut second = queue.consumer("group-b").unwrap();

        assert!(first
            .poll(Duration::from_millis(50))
            .await
            .unwrap()
            .is_some());
        assert!(second
            .poll(Duration::from_millis(50))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_empty_topic_times_out_with_none() {
        let dir = TempDir::new().unwrap();
        let queue = FileQueue::new(dir.path(), "empty").unwrap();

        let mut consumer = queue.consumer("importer").unwrap();
        let started = Instant::now();
        let msg = consumer.poll(Duration::from_millis(100)).await.unwrap();

        assert!(msg.is_none());
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_drained_topic_yields_nothing_on_redrain() {
        let dir = TempDir::new().unwrap();
        let queue = FileQueue::new(dir.path(), "patient-data").unwrap();

        let mut publisher = queue.publisher().unwrap();
        publisher.publish(b"only").await.unwrap();
        publisher.flush().await.unwrap();

        let mut consumer = queue.consumer("importer").unwrap();
        assert!(consumer
            .poll(Duration::from_millis(50))
            .await
            .unwrap()
            .is_some());

        let mut again = queue.consumer("importer").unwrap();
        assert!(again
            .poll(Duration::from_millis(50))
            .await
            .unwrap()
            .is_none());
    }
}
