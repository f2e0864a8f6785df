//! System health checks for repomirror
//!
//! This module provides preflight checks to verify the system is properly
//! configured before running operations.

use crate::{Config, GitHubClient};
use std::path::Path;

/// Result of system health checks
#[derive(Debug, Clone)]
pub struct HealthCheck {
    /// Git installation status
    pub git: CheckResult,
    /// Destination directory status
    pub destination: CheckResult,
    /// Repository source status (repos file or GitHub credentials)
    pub source: CheckResult,
}

/// Result of an individual health check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
    pub is_warning: bool,
}

#[allow(dead_code)]
impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: None,
            is_warning: false,
        }
    }

    fn ok_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: None,
            is_warning: false,
        }
    }

    fn error_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            details: Some(details.into()),
            is_warning: false,
        }
    }

    fn warning_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            details: Some(details.into()),
            is_warning: true,
        }
    }
}

impl HealthCheck {
    /// Run all health checks
    pub fn run(config: &Config) -> Self {
        Self {
            git: Self::check_git(),
            destination: Self::check_destination(config),
            source: Self::check_source(config),
        }
    }

    /// Check if all required checks passed (excludes warnings)
    pub fn all_passed(&self) -> bool {
        self.git.passed && self.destination.passed && self.source.passed
    }

    /// Get list of failed checks (errors only, not warnings)
    pub fn errors(&self) -> Vec<&CheckResult> {
        [&self.git, &self.destination, &self.source]
            .into_iter()
            .filter(|r| !r.passed && !r.is_warning)
            .collect()
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&CheckResult> {
        [&self.git, &self.destination, &self.source]
            .into_iter()
            .filter(|r| r.is_warning)
            .collect()
    }

    /// Check git installation
    fn check_git() -> CheckResult {
        match std::process::Command::new("git").arg("--version").output() {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                CheckResult::ok_with_details("Git installed", version.trim().to_string())
            }
            Ok(_) => CheckResult::error("Git command failed"),
            Err(_) => CheckResult::error_with_details(
                "Git not found in PATH",
                "Install git: https://git-scm.com/downloads",
            ),
        }
    }

    /// Check destination directory; a missing directory is only a warning
    /// because sync creates it on demand
    fn check_destination(config: &Config) -> CheckResult {
        let path = Path::new(&config.destination);
        if path.exists() {
            CheckResult::ok_with_details("Destination directory exists", config.destination.clone())
        } else {
            CheckResult::warning_with_details(
                "Destination directory does not exist yet",
                format!("It will be created on the first sync: {}", config.destination),
            )
        }
    }

    /// Check the configured repository source prerequisites
    fn check_source(config: &Config) -> CheckResult {
        match config.source.mode.as_str() {
            "file" => {
                let path = Path::new(&config.source.repos_file);
                if path.exists() {
                    CheckResult::ok_with_details("Repos file exists", config.source.repos_file.clone())
                } else {
                    CheckResult::error_with_details(
                        "Repos file not found",
                        format!("Create it at: {}", config.source.repos_file),
                    )
                }
            }
            "starred" => {
                if config.github.username.is_none() {
                    return CheckResult::error_with_details(
                        "GitHub username not configured",
                        "Set github.username in the config file",
                    );
                }

                match GitHubClient::new(config) {
                    Ok(_) => CheckResult::ok_with_details(
                        "GitHub authentication available",
                        format!("Username: {}", config.github.username.as_deref().unwrap_or("")),
                    ),
                    Err(e) => CheckResult::error_with_details(
                        "GitHub authentication failed",
                        format!("{}\nRun: gh auth login", e),
                    ),
                }
            }
            other => CheckResult::error_with_details(
                "Unknown source mode",
                format!("source.mode must be \"file\" or \"starred\", got \"{}\"", other),
            ),
        }
    }

    /// Get all checks as a slice for iteration
    pub fn all_checks(&self) -> [(&'static str, &CheckResult); 3] {
        [
            ("Git Installation", &self.git),
            ("Destination Directory", &self.destination),
            ("Repository Source", &self.source),
        ]
    }
}
