//! Configuration management
//!
//! TOML-backed configuration with `${VAR}` environment substitution,
//! `TABULA_*` overrides and per-section validation.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ColumnConfig, ConsumerConfig, FhirConfig, LoggingConfig,
    MissingBirthDatePolicy, QueueConfig, SourceConfig, TabulaConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
