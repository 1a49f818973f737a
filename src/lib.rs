// Tabula - Tabular patient data to FHIR ETL Tool
// Copyright (c) 2025 Tabula Contributors
// Licensed under the MIT License

//! # Tabula - Tabular patient data to FHIR ETL
//!
//! Tabula is an ETL tool built in Rust that reads tabular patient data,
//! normalizes it into canonical messages on a durable queue topic, and
//! creates FHIR Patient and Condition resources on a FHIR REST server.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** patient rows from delimited text files
//! - **Normalizing** identifiers, gender, birth dates and observations
//!   into a canonical message shape
//! - **Buffering** messages on a durable at-least-once queue topic
//! - **Loading** FHIR Patient resources and SNOMED CT coded Condition
//!   resources into a FHIR store
//!
//! ## Architecture
//!
//! Tabula follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (normalization, terminology, resource
//!   construction, pipeline stages)
//! - [`adapters`] - External integrations (tabular source, queue, FHIR)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabula::adapters::queue::FileQueue;
//! use tabula::config::load_config;
//! use tabula::core::ProducerPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tabula.toml")?;
//!
//!     let queue = FileQueue::new(&config.queue.data_dir, &config.queue.topic)?;
//!     let mut publisher = queue.publisher()?;
//!
//!     let summary = ProducerPipeline::new(&config).run(&mut publisher).await?;
//!     println!("Published {} messages", summary.published);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Tabula uses the [`domain::TabulaError`] type for all errors:
//!
//! ```rust,no_run
//! use tabula::domain::TabulaError;
//!
//! fn example() -> Result<(), TabulaError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = tabula::config::load_config("tabula.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Tabula uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting produce stage");
//! warn!(sequence = 12, "Skipping row");
//! error!(error = "connection refused", "Drain failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
