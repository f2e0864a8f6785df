use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use shellexpand;
use std::path::{Path, PathBuf};

/// Main configuration structure for repomirror
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Destination directory for mirrored repositories
    pub destination: String,

    /// Repository source settings
    #[serde(default)]
    pub source: SourceConfig,

    /// GitHub authentication and API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Repository source configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    /// Listing mode
    #[serde(default = "default_source_mode")]
    pub mode: String, // "file", "starred"

    /// Repos list file path (file mode)
    #[serde(default = "default_repos_file")]
    pub repos_file: String,
}

/// GitHub configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    /// Authentication method
    #[serde(default = "default_auth_method")]
    pub auth_method: String, // "auto", "gh_cli", "token"

    /// GitHub username whose starred repositories are mirrored (starred mode)
    pub username: Option<String>,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"

    /// Log format
    #[serde(default = "default_log_format")]
    pub format: String, // "compact"

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_source_mode() -> String {
    "file".to_string()
}
fn default_repos_file() -> String {
    "${HOME}/.config/repomirror/repos.txt".to_string()
}
fn default_auth_method() -> String {
    "auto".to_string()
}
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

// Default implementations
impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: default_source_mode(),
            repos_file: default_repos_file(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            auth_method: default_auth_method(),
            username: None,
            api_url: default_api_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            // Create default config
            let config = Self::default();

            // Create config directory if it doesn't exist
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            // Save default config
            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        // Expand environment variables in paths
        config.expand_paths()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("repomirror").join("config.yml"))
    }

    /// Expand environment variables in configuration paths
    pub fn expand_paths(&mut self) -> Result<()> {
        self.destination = shellexpand::full(&self.destination)
            .context("Failed to expand destination path")?
            .into_owned();

        self.source.repos_file = shellexpand::full(&self.source.repos_file)
            .context("Failed to expand repos_file path")?
            .into_owned();

        Ok(())
    }

    /// Destination directory as a path
    pub fn destination_dir(&self) -> PathBuf {
        PathBuf::from(&self.destination)
    }

    /// Repos list file as a path
    pub fn repos_file_path(&self) -> PathBuf {
        PathBuf::from(&self.source.repos_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destination: "${HOME}/synced_repos".to_string(),
            source: SourceConfig::default(),
            github: GitHubConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
