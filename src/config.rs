use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{DeployError, Result};

/// Represents the complete configuration for git-deploy.
///
/// Loaded once up front and passed into the release workflow; nothing reads
/// configuration ad hoc after startup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Directory under which deployment working trees live, one
    /// subdirectory per repository. Created when missing.
    #[serde(default = "default_base_deploy_path")]
    pub base_deploy_path: String,

    /// Path of the changelog file, relative to the repository root. Its
    /// first paragraph becomes the release tag message.
    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Localized `.po` message catalogs compiled with msgfmt before the
    /// release sequence runs.
    #[serde(default)]
    pub lc_message_catalogs: Vec<String>,

    #[serde(default)]
    pub defaults: BranchDefaults,
}

/// Branch names used when not provided as console inputs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchDefaults {
    /// The development branch whose changes are being promoted.
    #[serde(default = "default_merge_branch")]
    pub merge_branch: String,

    /// The stable branch receiving the release merge and tag.
    #[serde(default = "default_main_branch")]
    pub main_branch: String,
}

fn default_base_deploy_path() -> String {
    "/var/www/deploy".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG".to_string()
}

fn default_merge_branch() -> String {
    "develop".to_string()
}

fn default_main_branch() -> String {
    "master".to_string()
}

impl Default for BranchDefaults {
    fn default() -> Self {
        BranchDefaults {
            merge_branch: default_merge_branch(),
            main_branch: default_main_branch(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_deploy_path: default_base_deploy_path(),
            changelog: default_changelog(),
            lc_message_catalogs: Vec::new(),
            defaults: BranchDefaults::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitdeploy.toml` in current directory
/// 3. `.gitdeploy.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| DeployError::config(format!("Cannot read \"{}\": {}", path, e)))?
    } else if Path::new("./gitdeploy.toml").exists() {
        fs::read_to_string("./gitdeploy.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitdeploy.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| DeployError::config(e.to_string()))
}
