//! # Configuration Loader
//!
//! ## Responsibilities
//!
//! - ✅ Locate and read the TOML configuration file
//! - ✅ Parse TOML into the AppConfig DTO
//! - ✅ Report I/O and parsing errors with context
//!
//! ## Prohibited
//!
//! ❌ **No validation logic**
//! ❌ **No business rules**
//!
//! > **Pure data loading only. Accept whatever is in the file.**

use anyhow::Context;
use std::path::{Path, PathBuf};

use jr_core::config::AppConfig;
use jr_infra::fs::app_config_dir;

const CONFIG_FILE_NAME: &str = "config.toml";

/// `<platform config dir>/journal/config.toml`
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(app_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from a TOML file
///
/// **NO validation is performed**: empty strings and missing sections are
/// facts, not errors.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    Ok(AppConfig::from_toml(&toml_value))
}

/// Like [`load_config`], but a missing file yields an empty config.
pub fn load_config_or_empty(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        return Ok(AppConfig::empty());
    }
    load_config(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let temp_file = write_config(
            r#"
            [account]
            uid = "u1"
            id_token = "tok"

            [remote]
            project_id = "journal-app"
            retry_attempts = 3

            [storage]
            data_dir = "/tmp/journal"
        "#,
        );

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.account.uid, "u1");
        assert_eq!(config.account.id_token, "tok");
        assert_eq!(config.remote.project_id, "journal-app");
        assert_eq!(config.remote.retry_attempts, 3);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/journal"));
    }

    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let temp_file = write_config("[account]\n");

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let temp_file = write_config("[account\nuid = ");

        let err = load_config(temp_file.path()).unwrap_err();

        assert!(err.to_string().contains("TOML"), "got: {err}");
    }

    #[test]
    fn test_missing_file_is_an_error_unless_optional() {
        let path = PathBuf::from("/this/path/does/not/exist/config.toml");

        assert!(load_config(&path).is_err());
        assert_eq!(load_config_or_empty(&path).unwrap(), AppConfig::empty());
    }
}
