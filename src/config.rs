use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{IconizeError, Result};

/// Name of the configuration file stored inside the `.mc-icons` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding mc-icons settings.
pub const CONFIG_DIR: &str = ".mc-icons";

/// Name of the asset directory looked up next to the project.
pub const ASSETS_DIRNAME: &str = "assets";

/// Default URL prefix icon paths are appended to.
pub const DEFAULT_REPO: &str = "https://github.com/Krutoy242/mc-icons/raw/master/i/";

/// Configuration for an icon resolution run.
///
/// Values come from `.mc-icons/config.json` when present; command-line flags
/// override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconizeConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Edit distance under which a unique nearest name is accepted.
    pub threshold: usize,
    /// Maximum number of icons emitted for one capture.
    pub max: usize,
    /// URL prefix icon paths are appended to.
    pub repo: String,
    /// Modpack shorthand restricting visible sources, e.g. `e2ee`.
    pub modpack: Option<String>,
    /// Never prompt; ambiguous captures are reported as unresolved.
    pub silent: bool,
    /// Shorten icon URLs through is.gd.
    pub short: bool,
    /// Directory holding the asset JSON files.
    pub assets_dir: Option<String>,
}

impl Default for IconizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            threshold: 0,
            max: 64,
            repo: DEFAULT_REPO.to_string(),
            modpack: None,
            silent: false,
            short: true,
            assets_dir: None,
        }
    }
}

/// Returns the path to the `.mc-icons` directory within the given project root.
pub fn get_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR)
}

/// Returns the path to the configuration file within the `.mc-icons` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_config_dir(project_root).join(CONFIG_FILENAME)
}

/// Resolves the asset directory to load from.
///
/// An explicit `assets_dir` wins (relative paths are taken from the project
/// root). Otherwise `assets/` in the project root is used if it exists, then
/// the per-user data directory.
pub fn resolve_assets_dir(project_root: &Path, config: &IconizeConfig) -> PathBuf {
    if let Some(dir) = &config.assets_dir {
        return project_root.join(dir);
    }
    let local = project_root.join(ASSETS_DIRNAME);
    if local.is_dir() {
        return local;
    }
    dirs::data_dir()
        .map(|data| data.join("mc-icons").join(ASSETS_DIRNAME))
        .unwrap_or(local)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration.
pub fn load_config(project_root: &Path) -> Result<IconizeConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(IconizeConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| IconizeError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: IconizeConfig =
        serde_json::from_str(&contents).map_err(|e| IconizeError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}
