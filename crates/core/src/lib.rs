//! Climate API Core Library
//!
//! Shared utilities for the climate API service:
//! - Configuration loading (XDG-compliant)
//! - File system utilities

mod config;
pub mod fs;

pub use config::{find_config_file, get_xdg_data_dir, load_config, ConfigSource};
pub use fs::{is_file, path_exists};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default size of the read-only store connection pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// File name of the bundled observation dataset
pub const DEFAULT_DATABASE_FILE: &str = "hawaii.sqlite";
