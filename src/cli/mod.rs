//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tabula using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Tabula - Tabular patient data to FHIR ETL
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(author = "Tabula Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tabula.toml", env = "TABULA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TABULA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the tabular source and publish messages onto the queue topic
    Produce(commands::produce::ProduceArgs),

    /// Drain the queue topic into the FHIR store
    Consume(commands::consume::ConsumeArgs),

    /// Run both stages in order: produce, then consume
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
