use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "journal";

/// Get the journal data root directory (entry cache, identity, logs).
///
/// # Platform-specific Paths
/// - macOS: ~/Library/Application Support/journal
/// - Windows: %APPDATA%\journal
/// - Linux: $XDG_DATA_HOME/journal or ~/.local/share/journal
///
/// This function does not create the directory.
pub fn app_data_dir() -> Result<PathBuf> {
    let base_dir =
        get_platform_data_dir().context("Failed to get platform-specific data directory")?;

    Ok(base_dir.join(APP_DIR_NAME))
}

/// Directory holding `config.toml`.
pub fn app_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir().context("Unable to get platform config directory")?;
    Ok(base_dir.join(APP_DIR_NAME))
}

fn get_platform_data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // XDG_DATA_HOME wins over ~/.local/share
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home));
        }
    }

    dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Unable to get platform data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dirs_end_with_app_name() {
        let data = app_data_dir().expect("data dir");
        assert!(data.ends_with(APP_DIR_NAME));

        let config = app_config_dir().expect("config dir");
        assert!(config.ends_with(APP_DIR_NAME));
    }
}
