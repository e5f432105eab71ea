//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - ✅ Define configuration data structures
//! - ✅ Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! ❌ **No business logic or policies**
//! ❌ **No validation logic**
//! ❌ **No default value calculation**
//!
//! ## Iron Rule
//!
//! > **This module contains data only, no policy, no validation.**

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub account: AccountConfig,
    pub remote: RemoteConfig,
    /// Root for cache and logs (may be empty - the host picks a platform default)
    pub data_dir: PathBuf,
}

/// Signed-in account as provided by the external auth provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountConfig {
    /// May be empty - this is a fact, not an error
    pub uid: String,
    pub id_token: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub project_id: String,
    pub collection: String,
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

fn str_at(value: &toml::Value, section: &str, key: &str) -> String {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn int_at(value: &toml::Value, section: &str, key: &str) -> i64 {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(0)
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation
    /// or default value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> Self {
        Self {
            account: AccountConfig {
                uid: str_at(toml_value, "account", "uid"),
                id_token: str_at(toml_value, "account", "id_token"),
                display_name: str_at(toml_value, "account", "display_name"),
                email: str_at(toml_value, "account", "email"),
            },
            remote: RemoteConfig {
                base_url: str_at(toml_value, "remote", "base_url"),
                project_id: str_at(toml_value, "remote", "project_id"),
                collection: str_at(toml_value, "remote", "collection"),
                timeout_secs: int_at(toml_value, "remote", "timeout_secs").max(0) as u64,
                retry_attempts: int_at(toml_value, "remote", "retry_attempts").max(0) as u32,
                retry_backoff_ms: int_at(toml_value, "remote", "retry_backoff_ms").max(0) as u64,
            },
            data_dir: PathBuf::from(str_at(toml_value, "storage", "data_dir")),
        }
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            account: AccountConfig::default(),
            remote: RemoteConfig::default(),
            data_dir: PathBuf::new(),
        }
    }
}
