//! Configuration schema types
//!
//! This module defines the configuration structure for Tabula. All sections
//! map to the `tabula.toml` file and validate themselves before a pipeline
//! runs.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Tabula configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabulaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Tabular source settings
    pub source: SourceConfig,

    /// Queue topic settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// FHIR server settings
    pub fhir: FhirConfig,

    /// Consumer policy settings
    #[serde(default)]
    pub consumer: ConsumerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TabulaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.queue.validate()?;
        self.fhir.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (normalize rows without publishing to the queue)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Column names expected in the source file
///
/// Matched case-insensitively after trimming. Defaults follow the reference
/// feed's Portuguese headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Raw identifier column
    #[serde(default = "default_identifier_column")]
    pub identifier: String,

    /// Display name column
    #[serde(default = "default_name_column")]
    pub name: String,

    /// Gender text column
    #[serde(default = "default_gender_column")]
    pub gender: String,

    /// Birth date text column
    #[serde(default = "default_birth_date_column")]
    pub birth_date: String,

    /// Free-text observation column
    #[serde(default = "default_observation_column")]
    pub observation: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            identifier: default_identifier_column(),
            name: default_name_column(),
            gender: default_gender_column(),
            birth_date: default_birth_date_column(),
            observation: default_observation_column(),
        }
    }
}

/// Tabular source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the source file
    pub path: String,

    /// Field delimiter (single character)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Column name mapping
    #[serde(default)]
    pub columns: ColumnConfig,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("source.path cannot be empty".to_string());
        }
        if self.delimiter.len() != 1 || !self.delimiter.is_ascii() {
            return Err(format!(
                "source.delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ));
        }
        Ok(())
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes()[0]
    }
}

/// Queue topic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Directory holding topic logs and consumer offsets
    #[serde(default = "default_queue_data_dir")]
    pub data_dir: String,

    /// Topic name
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Consumer group id
    #[serde(default = "default_consumer_group")]
    pub consumer_group: String,

    /// Drain idle timeout in milliseconds
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            data_dir: default_queue_data_dir(),
            topic: default_topic(),
            consumer_group: default_consumer_group(),
            idle_timeout_ms: default_idle_timeout_ms(),
        }
    }
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        if self.topic.is_empty() {
            return Err("queue.topic cannot be empty".to_string());
        }
        if self.consumer_group.is_empty() {
            return Err("queue.consumer_group cannot be empty".to_string());
        }
        if self.idle_timeout_ms == 0 {
            return Err("queue.idle_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Idle timeout as a [`std::time::Duration`]
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.idle_timeout_ms)
    }
}

/// FHIR server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR server
    #[serde(default = "default_fhir_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Disable only against development servers with self-signed
    /// certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Username for basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// StructureDefinition URL stamped onto every patient
    #[serde(default = "default_patient_profile")]
    pub patient_profile: String,

    /// System URL for the patient's official identifier
    #[serde(default = "default_identifier_system")]
    pub identifier_system: String,
}

impl Default for FhirConfig {
    fn default() -> Self {
        Self {
            base_url: default_fhir_base_url(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            username: None,
            password: None,
            patient_profile: default_patient_profile(),
            identifier_system: default_identifier_system(),
        }
    }
}

impl FhirConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("fhir.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("fhir.base_url must start with http:// or https://".to_string());
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(
                "fhir.username and fhir.password must be provided together".to_string(),
            );
        }
        if self.patient_profile.is_empty() {
            return Err("fhir.patient_profile cannot be empty".to_string());
        }
        if self.identifier_system.is_empty() {
            return Err("fhir.identifier_system cannot be empty".to_string());
        }
        Ok(())
    }
}

/// What the consumer does with a message that has no birth date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingBirthDatePolicy {
    /// Silently drop the message; no resources are created
    #[default]
    Drop,
    /// Create the patient without a birthDate element
    Accept,
}

/// Consumer policy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConsumerConfig {
    /// Missing-birth-date policy
    #[serde(default)]
    pub missing_birth_date: MissingBirthDatePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation policy (daily, hourly)
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if self.local_enabled && !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_identifier_column() -> String {
    "cpf".to_string()
}

fn default_name_column() -> String {
    "nome".to_string()
}

fn default_gender_column() -> String {
    "gênero".to_string()
}

fn default_birth_date_column() -> String {
    "data de nascimento".to_string()
}

fn default_observation_column() -> String {
    "observação".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_queue_data_dir() -> String {
    "./queue-data".to_string()
}

fn default_topic() -> String {
    "patient_data".to_string()
}

fn default_consumer_group() -> String {
    "fhir_importer".to_string()
}

fn default_idle_timeout_ms() -> u64 {
    10_000
}

fn default_fhir_base_url() -> String {
    "http://localhost:8080/fhir".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_patient_profile() -> String {
    "https://fhir.rnds.saude.gov.br/StructureDefinition/BRIndividuo-1.0".to_string()
}

fn default_identifier_system() -> String {
    "http://www.saude.gov.br/fhir/rnds/StructureDefinition/cpf-usuario".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> TabulaConfig {
        TabulaConfig {
            application: ApplicationConfig::default(),
            source: SourceConfig {
                path: "./data/patients.csv".to_string(),
                delimiter: default_delimiter(),
                columns: ColumnConfig::default(),
            },
            queue: QueueConfig::default(),
            fhir: FhirConfig::default(),
            consumer: ConsumerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_empty_source_path_rejected() {
        let mut config = minimal();
        config.source.path = String::new();
        assert!(config.validate().unwrap_err().contains("source.path"));
    }

    #[test]
    fn test_multichar_delimiter_rejected() {
        let mut config = minimal();
        config.source.delimiter = ",,".to_string();
        assert!(config.validate().unwrap_err().contains("delimiter"));
    }

    #[test]
    fn test_delimiter_byte() {
        let mut config = minimal();
        config.source.delimiter = ";".to_string();
        assert_eq!(config.source.delimiter_byte(), b';');
    }

    #[test]
    fn test_fhir_base_url_scheme_required() {
        let mut config = minimal();
        config.fhir.base_url = "localhost:8080/fhir".to_string();
        assert!(config.validate().unwrap_err().contains("base_url"));
    }

    #[test]
    fn test_credentials_must_come_together() {
        let mut config = minimal();
        config.fhir.username = Some("importer".to_string());
        assert!(config.validate().unwrap_err().contains("password"));
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        let mut config = minimal();
        config.queue.idle_timeout_ms = 0;
        assert!(config.validate().unwrap_err().contains("idle_timeout_ms"));
    }

    #[test]
    fn test_missing_birth_date_policy_parses_from_toml() {
        let toml = r#"
            [source]
            path = "patients.csv"

            [fhir]
            base_url = "http://localhost:8080/fhir"

            [consumer]
            missing_birth_date = "accept"
        "#;

        let config: TabulaConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.consumer.missing_birth_date,
            MissingBirthDatePolicy::Accept
        );
    }

    #[test]
    fn test_policy_defaults_to_drop() {
        let toml = r#"
            [source]
            path = "patients.csv"

            [fhir]
            base_url = "http://localhost:8080/fhir"
        "#;

        let config: TabulaConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.consumer.missing_birth_date,
            MissingBirthDatePolicy::Drop
        );
        assert_eq!(config.queue.topic, "patient_data");
        assert_eq!(config.queue.idle_timeout_ms, 10_000);
    }
}
