//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tabula.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Tabula configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point source.path at your patient CSV file");
                println!("  3. Point fhir.base_url at your FHIR server");
                println!("  4. For authenticated servers, create a .env file with");
                println!("     TABULA_FHIR_USERNAME and TABULA_FHIR_PASSWORD");
                println!("  5. Validate configuration: tabula validate-config");
                println!("  6. Run the pipeline: tabula run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Tabula Configuration File
# Tabular patient data to FHIR ETL Tool

[application]
log_level = "info"
dry_run = false

[source]
path = "patients.csv"
delimiter = ","

[queue]
data_dir = "./queue-data"
topic = "patient_data"
consumer_group = "fhir_importer"
idle_timeout_ms = 10000

[fhir]
base_url = "http://localhost:8080/fhir"
timeout_seconds = 30
tls_verify = true

# Basic auth (optional, both must be set together)
# username = "${TABULA_FHIR_USERNAME}"
# password = "${TABULA_FHIR_PASSWORD}"

[consumer]
missing_birth_date = "drop"  # drop | accept

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Tabula Configuration File
# Tabular patient data to FHIR ETL Tool
#
# This file contains all configuration options with examples and explanations.
#
# The pipeline has two stages:
#   - produce: read the tabular source, normalize each row into a canonical
#     message and publish it onto a durable queue topic
#   - consume: drain the topic and create FHIR Patient and Condition
#     resources on the configured server

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (normalize rows without publishing)
dry_run = false

# ============================================================================
# Tabular Source Configuration
# ============================================================================
[source]
# Path to the patient CSV file
path = "patients.csv"

# Field delimiter (single character)
delimiter = ","

# Column header names, matched case-insensitively after trimming.
# Defaults target Brazilian patient exports.
[source.columns]
identifier = "cpf"
name = "nome"
gender = "gênero"
birth_date = "data de nascimento"
observation = "observação"

# ============================================================================
# Queue Configuration
# ============================================================================
[queue]
# Directory holding the topic log and consumer offsets
data_dir = "./queue-data"

# Topic name
topic = "patient_data"

# Consumer group; each group tracks its own committed offset
consumer_group = "fhir_importer"

# Drain ends after this long without a new message
idle_timeout_ms = 10000

# ============================================================================
# FHIR Server Configuration
# ============================================================================
[fhir]
# Base URL of the FHIR REST endpoint
base_url = "http://localhost:8080/fhir"

# Request timeout in seconds
timeout_seconds = 30

# TLS/SSL verification
tls_verify = true

# Basic auth credentials (optional, both must be set together)
# username = "${TABULA_FHIR_USERNAME}"
# password = "${TABULA_FHIR_PASSWORD}"

# Profile URL stamped into Patient.meta.profile
patient_profile = "https://fhir.rnds.saude.gov.br/StructureDefinition/BRIndividuo-1.0"

# System URL for the patient identifier
identifier_system = "http://www.saude.gov.br/fhir/rnds/StructureDefinition/cpf-usuario"

# ============================================================================
# Consumer Configuration
# ============================================================================
[consumer]
# What to do with messages that carry no birth date:
#   drop   - skip the message entirely (no resources created)
#   accept - create the patient without a birthDate element
missing_birth_date = "drop"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging (JSON lines, rotated)
local_enabled = false

# Local log file path
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
