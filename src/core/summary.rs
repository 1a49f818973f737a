//! Stage summaries and per-item outcomes
//!
//! Each stage produces a best-effort summary with running counters; errors
//! never cross the stage boundary. Per-item results are explicit outcome
//! types inspected by the orchestrating loop instead of broad exception
//! interception.

use std::time::Duration;

/// Outcome of processing one source row in the producer stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Row normalized and appended to the topic
    Published,
    /// Row normalized but not appended (dry-run mode)
    DryRun,
    /// Append failed; the row is skipped and the batch continues
    Failed { reason: String },
}

/// Outcome of processing one message in the consumer stage
///
/// Mirrors the per-message state machine: a message is dropped, fails at the
/// patient phase, or completes with per-segment condition results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Patient created; conditions evaluated per segment
    Completed {
        conditions_created: usize,
        conditions_failed: usize,
    },
    /// Message carried no birth date and the drop policy is active
    Dropped,
    /// The store rejected the patient; no conditions were attempted
    PatientFailed { reason: String },
    /// The payload could not be deserialized
    Malformed { reason: String },
}

/// Summary of a producer run
#[derive(Debug, Clone, Default)]
pub struct ProduceSummary {
    /// Rows read from the source file
    pub rows_read: usize,

    /// Rows accepted for publication (counted in dry-run mode too)
    pub published: usize,

    /// Rows that failed to normalize or publish
    pub failed: usize,

    /// Duration of the run
    pub duration: Duration,
}

impl ProduceSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a row outcome
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.rows_read += 1;
        match outcome {
            RowOutcome::Published | RowOutcome::DryRun => self.published += 1,
            RowOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Check if every row was published
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            rows_read = self.rows_read,
            published = self.published,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "Produce stage completed"
        );
    }
}

/// Summary of a consumer drain
#[derive(Debug, Clone, Default)]
pub struct DrainSummary {
    /// Messages read from the topic
    pub messages: usize,

    /// Patients successfully created in the store
    pub patients_created: usize,

    /// Conditions successfully created in the store
    pub conditions_created: usize,

    /// Condition segments that matched but failed at the store
    pub conditions_failed: usize,

    /// Messages dropped for missing birth date
    pub dropped: usize,

    /// Messages whose patient creation failed
    pub patient_failures: usize,

    /// Messages with undeserializable payloads
    pub malformed: usize,

    /// Duration of the drain
    pub duration: Duration,
}

impl DrainSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a message outcome
    pub fn record(&mut self, outcome: &MessageOutcome) {
        self.messages += 1;
        match outcome {
            MessageOutcome::Completed {
                conditions_created,
                conditions_failed,
            } => {
                self.patients_created += 1;
                self.conditions_created += conditions_created;
                self.conditions_failed += conditions_failed;
            }
            MessageOutcome::Dropped => self.dropped += 1,
            MessageOutcome::PatientFailed { .. } => self.patient_failures += 1,
            MessageOutcome::Malformed { .. } => self.malformed += 1,
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            messages = self.messages,
            patients_created = self.patients_created,
            conditions_created = self.conditions_created,
            conditions_failed = self.conditions_failed,
            dropped = self.dropped,
            patient_failures = self.patient_failures,
            malformed = self.malformed,
            duration_ms = self.duration.as_millis() as u64,
            "Drain completed"
        );
    }
}
