//! Producer pipeline - source rows onto the queue topic
//!
//! Reads the tabular source, normalizes every row into a canonical message
//! and appends it to the topic. A row that fails to serialize or append is
//! logged and skipped; the batch never aborts on a row. The stage completes
//! only after an explicit flush makes all appended messages durable.

use crate::adapters::queue::QueuePublisher;
use crate::adapters::source::CsvSource;
use crate::config::TabulaConfig;
use crate::core::normalize::normalize;
use crate::core::summary::{ProduceSummary, RowOutcome};
use crate::domain::{CanonicalMessage, Result};
use std::time::Instant;

/// Producer pipeline
pub struct ProducerPipeline {
    source: CsvSource,
    columns: crate::config::ColumnConfig,
    dry_run: bool,
}

impl ProducerPipeline {
    /// Create a producer from configuration
    pub fn new(config: &TabulaConfig) -> Self {
        Self {
            source: CsvSource::new(&config.source.path, config.source.delimiter_byte()),
            columns: config.source.columns.clone(),
            dry_run: config.application.dry_run,
        }
    }

    /// Run the produce stage
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: an unreadable source
    /// file, or a flush failure at the end of the batch. Row-level failures
    /// are recorded in the summary and the loop continues.
    pub async fn run(&self, publisher: &mut dyn QueuePublisher) -> Result<ProduceSummary> {
        let started = Instant::now();
        let mut summary = ProduceSummary::new();

        tracing::info!(
            source = %self.source.path().display(),
            dry_run = self.dry_run,
            "Starting produce stage"
        );

        for (sequence, row) in self.source.rows()?.enumerate() {
            let outcome = match row {
                Ok(row) => {
                    let message = normalize(&row, sequence, &self.columns);
                    self.publish(publisher, &message).await
                }
                Err(e) => RowOutcome::Failed {
                    reason: e.to_string(),
                },
            };

            if let RowOutcome::Failed { reason } = &outcome {
                tracing::warn!(sequence = sequence, reason = %reason, "Skipping row");
            }

            summary.record(&outcome);
        }

        if !self.dry_run {
            // The stage is not complete until every append is durable
            publisher.flush().await?;
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn publish(
        &self,
        publisher: &mut dyn QueuePublisher,
        message: &CanonicalMessage,
    ) -> RowOutcome {
        let payload = match serde_json::to_vec(message) {
            Ok(payload) => payload,
            Err(e) => {
                return RowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if self.dry_run {
            tracing::info!(id = %message.id, name = %message.name, "Dry run: message not published");
            return RowOutcome::DryRun;
        }

        match publisher.publish(&payload).await {
            Ok(()) => {
                tracing::debug!(id = %message.id, name = %message.name, "Published message");
                RowOutcome::Published
            }
            Err(e) => RowOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}
