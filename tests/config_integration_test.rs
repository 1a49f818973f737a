//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use std::io::Write;
use std::sync::Mutex;
use tabula::config::{load_config, MissingBirthDatePolicy};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("TABULA_LOG_LEVEL");
    std::env::remove_var("TABULA_SOURCE_PATH");
    std::env::remove_var("TABULA_QUEUE_DATA_DIR");
    std::env::remove_var("TABULA_QUEUE_TOPIC");
    std::env::remove_var("TABULA_FHIR_BASE_URL");
    std::env::remove_var("TABULA_FHIR_USERNAME");
    std::env::remove_var("TABULA_FHIR_PASSWORD");
    std::env::remove_var("TEST_FHIR_PASSWORD");
}

fn write_config(toml_content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "debug"
dry_run = true

[source]
path = "./data/patients.csv"
delimiter = ";"

[source.columns]
identifier = "document"
name = "full name"
gender = "sex"
birth_date = "dob"
observation = "notes"

[queue]
data_dir = "/var/lib/tabula/queue"
topic = "patient_intake"
consumer_group = "hospital_a"
idle_timeout_ms = 2500

[fhir]
base_url = "https://fhir.example.org/r4/"
timeout_seconds = 60
tls_verify = false
username = "importer"
password = "hunter2"
patient_profile = "https://fhir.example.org/StructureDefinition/Patient-1.0"
identifier_system = "https://fhir.example.org/sid/document"

[consumer]
missing_birth_date = "accept"

[logging]
local_enabled = false
local_path = "/tmp/tabula"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    // Verify application config
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    // Verify source config
    assert_eq!(config.source.path, "./data/patients.csv");
    assert_eq!(config.source.delimiter_byte(), b';');
    assert_eq!(config.source.columns.identifier, "document");
    assert_eq!(config.source.columns.birth_date, "dob");

    // Verify queue config
    assert_eq!(config.queue.data_dir, "/var/lib/tabula/queue");
    assert_eq!(config.queue.topic, "patient_intake");
    assert_eq!(config.queue.consumer_group, "hospital_a");
    assert_eq!(config.queue.idle_timeout_ms, 2500);

    // Verify FHIR config
    assert_eq!(config.fhir.base_url, "https://fhir.example.org/r4/");
    assert_eq!(config.fhir.timeout_seconds, 60);
    assert!(!config.fhir.tls_verify);
    assert_eq!(config.fhir.username, Some("importer".to_string()));
    assert!(config.fhir.password.is_some());

    // Verify consumer config
    assert_eq!(
        config.consumer.missing_birth_date,
        MissingBirthDatePolicy::Accept
    );

    // Verify logging config
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[source]
path = "patients.csv"

[fhir]
base_url = "http://localhost:8080/fhir"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    // Verify defaults are applied
    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.source.delimiter_byte(), b',');
    assert_eq!(config.source.columns.identifier, "cpf");
    assert_eq!(config.source.columns.gender, "gênero");
    assert_eq!(config.queue.data_dir, "./queue-data");
    assert_eq!(config.queue.topic, "patient_data");
    assert_eq!(config.queue.consumer_group, "fhir_importer");
    assert_eq!(config.queue.idle_timeout_ms, 10_000);
    assert_eq!(config.fhir.timeout_seconds, 30);
    assert!(config.fhir.tls_verify);
    assert!(config.fhir.username.is_none());
    assert_eq!(
        config.fhir.patient_profile,
        "https://fhir.rnds.saude.gov.br/StructureDefinition/BRIndividuo-1.0"
    );
    assert_eq!(
        config.consumer.missing_birth_date,
        MissingBirthDatePolicy::Drop
    );
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_FHIR_PASSWORD", "secret_pass");

    let toml_content = r#"
[source]
path = "patients.csv"

[fhir]
base_url = "http://localhost:8080/fhir"
username = "importer"
password = "${TEST_FHIR_PASSWORD}"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    use secrecy::ExposeSecret;
    assert_eq!(
        config.fhir.password.as_ref().unwrap().expose_secret().as_ref(),
        "secret_pass"
    );

    std::env::remove_var("TEST_FHIR_PASSWORD");
}

#[test]
fn test_missing_env_var_fails_load() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[source]
path = "patients.csv"

[fhir]
base_url = "http://localhost:8080/fhir"
username = "importer"
password = "${TABULA_TEST_UNSET_PASSWORD}"
"#;

    let temp_file = write_config(toml_content);
    let result = load_config(temp_file.path());

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("TABULA_TEST_UNSET_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TABULA_LOG_LEVEL", "trace");
    std::env::set_var("TABULA_QUEUE_TOPIC", "patient_data_staging");
    std::env::set_var("TABULA_FHIR_BASE_URL", "http://fhir-staging:8080/fhir");

    let toml_content = r#"
[source]
path = "patients.csv"

[queue]
topic = "patient_data"

[fhir]
base_url = "http://localhost:8080/fhir"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    // Verify env var overrides took effect
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.queue.topic, "patient_data_staging");
    assert_eq!(config.fhir.base_url, "http://fhir-staging:8080/fhir");

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "invalid_level"

[source]
path = "patients.csv"

[fhir]
base_url = "http://localhost:8080/fhir"
"#;

    let temp_file = write_config(toml_content);
    let result = load_config(temp_file.path());
    assert!(result.is_err());
}

#[test]
fn test_credentials_without_password_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[source]
path = "patients.csv"

[fhir]
base_url = "http://localhost:8080/fhir"
username = "importer"
"#;

    let temp_file = write_config(toml_content);
    let result = load_config(temp_file.path());
    assert!(result.is_err());
}
