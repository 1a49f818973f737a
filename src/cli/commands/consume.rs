//! Consume command implementation
//!
//! This module implements the `consume` command for draining the queue
//! topic into the FHIR store.

use crate::adapters::fhir::RestFhirClient;
use crate::adapters::queue::FileQueue;
use crate::config::load_config;
use crate::core::{ConditionMap, ConsumerPipeline};
use clap::Args;

/// Arguments for the consume command
#[derive(Args, Debug)]
pub struct ConsumeArgs {
    /// Override the consumer group
    #[arg(long)]
    pub group: Option<String>,

    /// Override the idle timeout in milliseconds
    #[arg(long)]
    pub idle_timeout_ms: Option<u64>,
}

impl ConsumeArgs {
    /// Execute the consume command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting consume command");

        let mut config = load_config(config_path)?;

        if let Some(group) = &self.group {
            tracing::info!(group = %group, "Overriding consumer group from CLI");
            config.queue.consumer_group = group.clone();
        }

        if let Some(idle_timeout_ms) = self.idle_timeout_ms {
            tracing::info!(idle_timeout_ms, "Overriding idle timeout from CLI");
            config.queue.idle_timeout_ms = idle_timeout_ms;
        }

        let queue = match FileQueue::new(&config.queue.data_dir, &config.queue.topic) {
            Ok(q) => q,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open queue topic");
                eprintln!("Failed to open queue topic: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let mut consumer = match queue.consumer(&config.queue.consumer_group) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open queue consumer");
                eprintln!("Failed to open queue consumer: {e}");
                return Ok(4);
            }
        };

        let store = RestFhirClient::new(&config.fhir);

        println!("🚀 Starting drain...");
        println!("  FHIR server: {}", store.base_url());
        println!("  Topic: {}", config.queue.topic);
        println!("  Consumer group: {}", config.queue.consumer_group);
        println!();

        let pipeline = ConsumerPipeline::new(&config, ConditionMap::standard());
        let summary = match pipeline.drain(&mut consumer, &store).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Drain failed");
                eprintln!("Drain failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!();
        println!("📊 Drain Summary:");
        println!("  Messages: {}", summary.messages);
        println!("  Patients created: {}", summary.patients_created);
        println!("  Conditions created: {}", summary.conditions_created);
        println!("  Conditions failed: {}", summary.conditions_failed);
        println!("  Dropped (no birth date): {}", summary.dropped);
        println!("  Patient failures: {}", summary.patient_failures);
        println!("  Malformed: {}", summary.malformed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        let exit_code =
            if summary.patient_failures > 0 || summary.conditions_failed > 0 || summary.malformed > 0
            {
                println!("⚠️  Drain completed with failures");
                1 // Partial success
            } else {
                println!("✅ Drain completed successfully!");
                0
            };

        Ok(exit_code)
    }
}
