//! Consumer pipeline - drain the topic into the FHIR store
//!
//! A drain is a bounded consumption pass: messages are read from the
//! earliest uncommitted offset until none arrives within the idle timeout.
//! Each message walks an explicit state machine whose result is a
//! [`MessageOutcome`]; failures never abort the drain.
//!
//! Per message: deserialize, apply the missing-birth-date policy, submit the
//! patient, and only after the store acknowledges the patient evaluate the
//! observation segments into conditions. A condition failure never blocks
//! sibling segments.

use crate::adapters::fhir::FhirStore;
use crate::adapters::queue::QueueConsumer;
use crate::config::{MissingBirthDatePolicy, TabulaConfig};
use crate::core::build::{build_conditions, build_patient, PatientProfile};
use crate::core::summary::{DrainSummary, MessageOutcome};
use crate::core::terminology::ConditionMap;
use crate::domain::{CanonicalMessage, Result};
use std::time::{Duration, Instant};

/// Consumer pipeline
pub struct ConsumerPipeline {
    profile: PatientProfile,
    conditions: ConditionMap,
    policy: MissingBirthDatePolicy,
    idle_timeout: Duration,
}

impl ConsumerPipeline {
    /// Create a consumer from configuration and a terminology map
    pub fn new(config: &TabulaConfig, conditions: ConditionMap) -> Self {
        Self {
            profile: PatientProfile {
                profile_url: config.fhir.patient_profile.clone(),
                identifier_system: config.fhir.identifier_system.clone(),
            },
            conditions,
            policy: config.consumer.missing_birth_date,
            idle_timeout: config.queue.idle_timeout(),
        }
    }

    /// Run one drain over the topic
    ///
    /// # Errors
    ///
    /// Returns an error only if the topic itself becomes unreadable.
    /// Message-level failures are recorded in the summary and the drain
    /// continues.
    pub async fn drain(
        &self,
        consumer: &mut dyn QueueConsumer,
        store: &dyn FhirStore,
    ) -> Result<DrainSummary> {
        let started = Instant::now();
        let mut summary = DrainSummary::new();

        tracing::info!(
            idle_timeout_ms = self.idle_timeout.as_millis() as u64,
            policy = ?self.policy,
            "Starting drain"
        );

        while let Some(payload) = consumer.poll(self.idle_timeout).await? {
            let outcome = self.process_message(&payload, store).await;

            match &outcome {
                MessageOutcome::PatientFailed { reason } => {
                    tracing::error!(reason = %reason, "Patient creation failed, message abandoned");
                }
                MessageOutcome::Malformed { reason } => {
                    tracing::warn!(reason = %reason, "Skipping undeserializable message");
                }
                MessageOutcome::Dropped | MessageOutcome::Completed { .. } => {}
            }

            summary.record(&outcome);
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Walk one message through the per-message state machine
    async fn process_message(&self, payload: &[u8], store: &dyn FhirStore) -> MessageOutcome {
        let message: CanonicalMessage = match serde_json::from_slice(payload) {
            Ok(message) => message,
            Err(e) => {
                return MessageOutcome::Malformed {
                    reason: e.to_string(),
                }
            }
        };

        if message.birth_date.is_none() && self.policy == MissingBirthDatePolicy::Drop {
            // Intentional data-quality gate: no resource, no error surfaced
            tracing::debug!(id = %message.id, "Dropping message without birth date");
            return MessageOutcome::Dropped;
        }

        let patient = build_patient(&message, &self.profile);
        let created = match store.create_patient(&patient).await {
            Ok(created) => created,
            Err(e) => {
                return MessageOutcome::PatientFailed {
                    reason: e.to_string(),
                }
            }
        };

        tracing::info!(
            id = %message.id,
            name = %message.name,
            patient_id = %created.id(),
            "Patient created"
        );

        // Conditions are only reachable with the store-assigned patient id
        let mut conditions_created = 0;
        let mut conditions_failed = 0;
        for condition in build_conditions(&message, &created, &self.conditions) {
            match store.create_condition(&condition).await {
                Ok(()) => {
                    tracing::info!(
                        patient_id = %created.id(),
                        code = %condition.code.coding[0].code,
                        display = %condition.code.coding[0].display,
                        "Condition created"
                    );
                    conditions_created += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        patient_id = %created.id(),
                        code = %condition.code.coding[0].code,
                        error = %e,
                        "Condition creation failed, continuing with remaining segments"
                    );
                    conditions_failed += 1;
                }
            }
        }

        MessageOutcome::Completed {
            conditions_created,
            conditions_failed,
        }
    }
}
