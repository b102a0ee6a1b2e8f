use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InitError, Result};

/// File name looked up at the repository root.
pub const REPO_CONFIG_FILE: &str = "init-dev-branch.toml";

/// File name looked up in the user configuration directory.
pub const USER_CONFIG_FILE: &str = ".init-dev-branch.toml";

/// Complete configuration for init-dev-branch.
///
/// Every value has a default matching the hardware project layout, so the file
/// is optional.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_trunk_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Branch and remote names used to sync the trunk.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_trunk_branch")]
    pub trunk_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            trunk_branch: default_trunk_branch(),
            remote: default_remote(),
        }
    }
}

fn default_stale_directory() -> PathBuf {
    PathBuf::from("production")
}

fn default_workflow_file() -> PathBuf {
    PathBuf::from(".github/workflows/kibot.yml")
}

fn default_commit_template() -> PathBuf {
    PathBuf::from(".gitmessage")
}

/// Repository-relative paths touched during initialization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    /// Generated outputs removed from a new development branch (optional)
    #[serde(default = "default_stale_directory")]
    pub stale_directory: PathBuf,

    /// CI workflow holding the `kibot_variant` marker (mandatory)
    #[serde(default = "default_workflow_file")]
    pub workflow_file: PathBuf,

    /// Commit template providing the `Signed-off-by:` line (optional)
    #[serde(default = "default_commit_template")]
    pub commit_template: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            stale_directory: default_stale_directory(),
            workflow_file: default_workflow_file(),
            commit_template: default_commit_template(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter (must exist)
/// 2. `init-dev-branch.toml` at the repository root
/// 3. `.init-dev-branch.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_root` - Repository root used for the per-project lookup
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err(InitError::Config)` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<Config> {
    let candidate = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let in_repo = repo_root.join(REPO_CONFIG_FILE);
            if in_repo.is_file() {
                Some(in_repo)
            } else {
                dirs::config_dir()
                    .map(|dir| dir.join(USER_CONFIG_FILE))
                    .filter(|path| path.is_file())
            }
        }
    };

    let Some(path) = candidate else {
        log::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    log::debug!("loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path)
        .map_err(|e| InitError::config(format!("cannot read {}: {}", path.display(), e)))?;

    toml::from_str(&config_str)
        .map_err(|e| InitError::config(format!("cannot parse {}: {}", path.display(), e)))
}
