//! Produce command implementation
//!
//! This module implements the `produce` command for reading the tabular
//! source and publishing canonical messages onto the queue topic.

use crate::adapters::queue::FileQueue;
use crate::config::load_config;
use crate::core::ProducerPipeline;
use clap::Args;

/// Arguments for the produce command
#[derive(Args, Debug)]
pub struct ProduceArgs {
    /// Dry run mode - normalize rows without publishing to the queue
    #[arg(long)]
    pub dry_run: bool,

    /// Override the source file path
    #[arg(long)]
    pub source: Option<String>,
}

impl ProduceArgs {
    /// Execute the produce command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting produce command");

        let mut config = load_config(config_path)?;

        if let Some(source) = &self.source {
            tracing::info!(source = %source, "Overriding source path from CLI");
            config.source.path = source.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No messages will be published");
            println!();
        }

        let queue = match FileQueue::new(&config.queue.data_dir, &config.queue.topic) {
            Ok(q) => q,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open queue topic");
                eprintln!("Failed to open queue topic: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let mut publisher = match queue.publisher() {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open queue publisher");
                eprintln!("Failed to open queue publisher: {e}");
                return Ok(4);
            }
        };

        println!("🚀 Starting produce stage...");
        println!();

        let pipeline = ProducerPipeline::new(&config);
        let summary = match pipeline.run(&mut publisher).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Produce stage failed");
                eprintln!("Produce stage failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!();
        println!("📊 Produce Summary:");
        println!("  Rows read: {}", summary.rows_read);
        println!("  Published: {}", summary.published);
        println!("  Failed: {}", summary.failed);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        let exit_code = if summary.failed > 0 {
            println!("⚠️  Produce completed with skipped rows");
            1 // Partial success
        } else {
            println!("✅ Produce completed successfully!");
            0
        };

        Ok(exit_code)
    }
}
