//! Configuration module for translate-search
//!
//! Settings are read once at startup from a YAML file and environment
//! variables, validated, and then shared read-only with every handler.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "TRANSLATE_SEARCH_SETTINGS_PATH";

/// Default locations searched for a settings file, in order
pub fn default_settings_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/translate-search/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("translate-search/settings.yml"));
    }
    paths
}

/// Load, merge and validate settings
///
/// An explicit path (command line or `TRANSLATE_SEARCH_SETTINGS_PATH`) must
/// exist. Otherwise the first default location that exists is used, falling
/// back to built-in defaults. Environment variables always win over the file.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from));

    let mut settings = match explicit {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => match default_settings_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading settings from: {}", path.display());
                Settings::from_file(&path)?
            }
            None => {
                info!("No settings file found, using defaults");
                Settings::default()
            }
        },
    };

    settings.merge_env()?;
    settings.validate()?;
    Ok(settings)
}
