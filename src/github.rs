use serde::Deserialize;
use std::env;
use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};

/// One entry of a starred-repositories listing page.
///
/// The API returns more fields; these are the ones the mirror needs.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredRepo {
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
}

/// GitHub REST client with authentication management
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

/// GitHub authentication strategies
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Use GitHub CLI authentication
    GitHubCLI,
    /// Use environment variable token
    EnvironmentToken,
}

impl GitHubClient {
    /// Create a new GitHub client with automatic authentication
    pub fn new(config: &Config) -> Result<Self> {
        let (auth_strategy, token) = Self::detect_authentication(config)?;

        info!("Using authentication strategy: {:?}", auth_strategy);

        Self::with_token(&config.github.api_url, token)
    }

    /// Create a client with an explicit API base URL and token
    pub fn with_token(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repomirror/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let api_url = api_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            api_url,
            token: token.into(),
        })
    }

    /// Detect and obtain GitHub authentication
    fn detect_authentication(config: &Config) -> Result<(AuthStrategy, String)> {
        match config.github.auth_method.as_str() {
            "auto" => {
                // Try GitHub CLI first, then environment token
                if let Ok(token) = Self::try_github_cli() {
                    Ok((AuthStrategy::GitHubCLI, token))
                } else if let Ok(token) = Self::try_environment_token() {
                    Ok((AuthStrategy::EnvironmentToken, token))
                } else {
                    Err(Error::Auth(
                        "No GitHub authentication found. Please either:\n\
                         1. Install and authenticate GitHub CLI: gh auth login\n\
                         2. Set GITHUB_TOKEN environment variable"
                            .to_string(),
                    ))
                }
            }
            "gh_cli" => Self::try_github_cli().map(|token| (AuthStrategy::GitHubCLI, token)),
            "token" => {
                Self::try_environment_token().map(|token| (AuthStrategy::EnvironmentToken, token))
            }
            other => Err(Error::Auth(format!("Unknown auth method: {}", other))),
        }
    }

    /// Try to get token from GitHub CLI
    fn try_github_cli() -> Result<String> {
        debug!("Attempting GitHub CLI authentication");

        // Check if gh CLI is installed
        if !Self::is_command_available("gh") {
            return Err(Error::Auth("GitHub CLI (gh) is not installed".to_string()));
        }

        // Check if user is authenticated
        let auth_status = Command::new("gh")
            .args(["auth", "status"])
            .output()
            .map_err(|e| Error::Auth(format!("Failed to check GitHub CLI auth status: {}", e)))?;

        if !auth_status.status.success() {
            return Err(Error::Auth(
                "GitHub CLI is not authenticated. Run: gh auth login".to_string(),
            ));
        }

        // Get the token
        let token_output = Command::new("gh")
            .args(["auth", "token"])
            .output()
            .map_err(|e| Error::Auth(format!("Failed to get GitHub CLI token: {}", e)))?;

        if !token_output.status.success() {
            return Err(Error::Auth(format!(
                "Failed to retrieve token from GitHub CLI: {}",
                String::from_utf8_lossy(&token_output.stderr)
            )));
        }

        let token = String::from_utf8_lossy(&token_output.stdout)
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(Error::Auth("GitHub CLI returned empty token".to_string()));
        }

        debug!("Successfully obtained token from GitHub CLI");
        Ok(token)
    }

    /// Try to get token from environment variable
    fn try_environment_token() -> Result<String> {
        debug!("Attempting environment variable authentication");

        let token = env::var("GITHUB_TOKEN")
            .map_err(|_| Error::Auth("GITHUB_TOKEN environment variable not set".to_string()))?;

        if token.is_empty() {
            return Err(Error::Auth("GITHUB_TOKEN is empty".to_string()));
        }

        if !token.starts_with("ghp_") && !token.starts_with("gho_") && !token.starts_with("ghs_") {
            warn!("GITHUB_TOKEN doesn't look like a valid GitHub token (should start with ghp_, gho_, or ghs_)");
        }

        debug!("Successfully found GITHUB_TOKEN environment variable");
        Ok(token)
    }

    /// Check if a command is available in PATH
    fn is_command_available(command: &str) -> bool {
        Command::new("which")
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// List every repository starred by `username`.
    ///
    /// Pages are fetched sequentially, 100 entries at a time, page 1 upward,
    /// until a page returns zero entries. A non-success response on any page
    /// aborts the whole listing; there are no partial results and no retry.
    pub async fn list_starred(&self, username: &str) -> Result<Vec<StarredRepo>> {
        debug!("Fetching starred repositories for: {}", username);

        let mut starred = Vec::new();
        let mut page: u32 = 1;

        loop {
            let url = format!("{}/users/{}/starred", self.api_url, username);
            let page_param = page.to_string();
            let response = self
                .http
                .get(&url)
                .query(&[("per_page", "100"), ("page", page_param.as_str())])
                .header("Authorization", format!("token {}", self.token))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::ApiPage {
                    page,
                    status: status.as_u16(),
                    body,
                });
            }

            let items: Vec<StarredRepo> = response.json().await?;
            if items.is_empty() {
                break;
            }

            starred.extend(items);
            page += 1;
        }

        info!("Found {} starred repositories.", starred.len());
        Ok(starred)
    }
}
