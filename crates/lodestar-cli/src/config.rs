//! Configuration file discovery for the lodestar CLI
//!
//! A run reads at most one TOML file. An explicit `--config` path must
//! exist; otherwise the first of the local and per-user locations that exists
//! is used, and the built-in defaults apply when neither does.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use lodestar::{LodestarError, config::AppConfig};

/// Config file looked up relative to the working directory
const LOCAL_CONFIG: &str = "lodestar/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid value in `{path}`: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl From<ConfigError> for LodestarError {
    fn from(err: ConfigError) -> Self {
        LodestarError::Config(err.to_string())
    }
}

/// Find and load the configuration for this run
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - A layout value is out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, LodestarError> {
    // An explicit path wins and must exist
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // Otherwise the first existing candidate is used
    match search_paths().into_iter().find(|path| path.exists()) {
        Some(path) => {
            info!(path = path.display().to_string(); "Loading configuration");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

/// Candidate config files in lookup order
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("com", "lodestar", "lodestar") {
        Some(dirs) => paths.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform-specific config directory"),
    }
    paths
}

/// Read, parse and check one TOML configuration file
fn load_config_file(path: &Path) -> Result<AppConfig, LodestarError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    check_layout(&config).map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(config)
}

/// Reject layout values the spring engine cannot use
fn check_layout(config: &AppConfig) -> Result<(), String> {
    let layout = config.layout();
    if let Some(k) = layout.k() {
        if !(k.is_finite() && k > 0.0) {
            return Err(format!("layout.k must be positive, got {k}"));
        }
    }
    if !(layout.threshold().is_finite() && layout.threshold() >= 0.0) {
        return Err(format!(
            "layout.threshold must not be negative, got {}",
            layout.threshold()
        ));
    }
    if !layout.scale().is_finite() {
        return Err(format!("layout.scale must be finite, got {}", layout.scale()));
    }
    let (x, y) = layout.center();
    if !(x.is_finite() && y.is_finite()) {
        return Err("layout.center must be finite".to_string());
    }
    Ok(())
}
