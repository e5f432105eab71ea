//! Host bootstrap: configuration, logging and dependency wiring.

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config, load_config_or_empty};
pub use wiring::{identity_from_account, resolve_data_root, AppRuntime};
