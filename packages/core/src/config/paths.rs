//! Platform-specific paths for config and data files
//!
//! Uses the `directories` crate to resolve XDG-style locations.

use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "claudeforge", "claudeforge")
}

/// Path to the config file, e.g. `~/.config/claudeforge/config.json`
pub fn get_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
}

/// Data directory, e.g. `~/.local/share/claudeforge`
pub fn get_data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Log directory under the data dir
pub fn get_log_dir() -> Option<PathBuf> {
    get_data_dir().map(|dir| dir.join("logs"))
}
