//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TabulaConfig;
use crate::config::secret_string;
use crate::domain::errors::TabulaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TabulaConfig
/// 4. Applies environment variable overrides (TABULA_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
pub fn load_config(path: impl AsRef<Path>) -> Result<TabulaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TabulaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TabulaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: TabulaConfig = toml::from_str(&contents)
        .map_err(|e| TabulaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        TabulaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Referencing an unset variable is an
/// error so a missing credential fails fast instead of becoming a literal
/// `${VAR}` string.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex must compile");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TabulaError::Configuration(format!(
            "Missing environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies TABULA_* environment variable overrides
///
/// Overrides beat file values, keeping deployments twelve-factor friendly
/// without editing the TOML.
fn apply_env_overrides(config: &mut TabulaConfig) {
    if let Ok(value) = std::env::var("TABULA_LOG_LEVEL") {
        config.application.log_level = value;
    }
    if let Ok(value) = std::env::var("TABULA_SOURCE_PATH") {
        config.source.path = value;
    }
    if let Ok(value) = std::env::var("TABULA_QUEUE_DATA_DIR") {
        config.queue.data_dir = value;
    }
    if let Ok(value) = std::env::var("TABULA_QUEUE_TOPIC") {
        config.queue.topic = value;
    }
    if let Ok(value) = std::env::var("TABULA_FHIR_BASE_URL") {
        config.fhir.base_url = value;
    }
    if let Ok(value) = std::env::var("TABULA_FHIR_USERNAME") {
        config.fhir.username = Some(value);
    }
    if let Ok(value) = std::env::var("TABULA_FHIR_PASSWORD") {
        config.fhir.password = Some(secret_string(value));
    }
}
