//! Filesystem locations

use std::path::PathBuf;

use crate::constants;

/// Base config directory (`~/.chatbridge`), falling back to the working directory
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::config::CONFIG_DIR_NAME)
}

/// Default config file path
pub fn config_file() -> PathBuf {
    config_dir().join(constants::config::CONFIG_FILE_NAME)
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    config_dir().join(constants::config::LOGS_DIR_NAME)
}
