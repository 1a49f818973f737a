//! Run command implementation
//!
//! This module implements the `run` command, executing the produce stage
//! and then the consume stage against the same configuration. Consume only
//! starts once produce has flushed, so every published message is durable
//! before the drain begins.

use crate::cli::commands::consume::ConsumeArgs;
use crate::cli::commands::produce::ProduceArgs;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dry run mode - normalize rows without publishing or draining
    #[arg(long)]
    pub dry_run: bool,

    /// Override the source file path
    #[arg(long)]
    pub source: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let produce = ProduceArgs {
            dry_run: self.dry_run,
            source: self.source.clone(),
        };

        let produce_code = produce.execute(config_path).await?;
        if produce_code >= 2 {
            // Fatal produce failure: nothing durable to drain
            return Ok(produce_code);
        }

        if self.dry_run {
            tracing::info!("Dry run: skipping consume stage");
            println!("🔍 Dry run: consume stage skipped");
            return Ok(produce_code);
        }

        let consume = ConsumeArgs {
            group: None,
            idle_timeout_ms: None,
        };

        let consume_code = consume.execute(config_path).await?;

        // Surface partial failures from either stage
        Ok(produce_code.max(consume_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs {
            dry_run: false,
            source: None,
        };

        assert!(!args.dry_run);
        assert!(args.source.is_none());
    }
}
