pub mod app_data_dir;
mod atomic;

pub use app_data_dir::{app_config_dir, app_data_dir};
pub use atomic::atomic_write;
