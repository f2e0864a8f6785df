//! Sync Driver - sequential repository synchronization
//!
//! This module provides the high-level orchestration that obtains the
//! repository list from a source and mirrors each repository in order using
//! the GitClient for actual git operations. Repositories are processed
//! strictly one at a time; a failure in one never stops the rest.

use crate::git::{GitClient, SyncResult};
use crate::source::{RepoDescriptor, Source};
use crate::Config;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Results from a complete sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub total_repositories: usize,
    pub cloned: usize,
    pub updated: usize,
    pub failed: usize,
    pub no_ops: usize,
    pub duration: Duration,
    pub results: Vec<SyncResult>,
}

/// What a sync run would do for one descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Clone,
    Update,
}

/// The main sync engine driving sequential repository synchronization
pub struct SyncEngine {
    config: Config,
    git_client: GitClient,
}

impl SyncEngine {
    /// Create a new sync engine with the given configuration
    pub fn new(config: Config) -> Self {
        let git_client = GitClient::new(config.destination_dir());

        Self { config, git_client }
    }

    /// Run a complete sync: list repositories, then mirror each in order.
    ///
    /// The closing "Finished sync." line is emitted whether the run
    /// completed, a repository failed, or the listing itself aborted.
    pub async fn run(&self, source: &dyn Source) -> Result<SyncSummary> {
        let outcome = self.run_inner(source).await;
        info!("Finished sync.");
        outcome
    }

    async fn run_inner(&self, source: &dyn Source) -> Result<SyncSummary> {
        let start_time = Instant::now();

        info!(
            "Starting sync of repositories from source: {}",
            source.source_name()
        );

        tokio::fs::create_dir_all(&self.config.destination)
            .await
            .with_context(|| {
                format!(
                    "Failed to create destination directory: {}",
                    self.config.destination
                )
            })?;

        // A listing failure aborts the run; there is no partial sync
        let descriptors = source.list().await.context("Failed to list repositories")?;

        info!("Found {} repositories.", descriptors.len());

        let results = self.sync_all(&descriptors).await;

        Ok(compile_summary(results, start_time.elapsed()))
    }

    /// Mirror each descriptor strictly in order, catching per-repository
    /// failures so the remaining iterations always run
    pub async fn sync_all(&self, descriptors: &[RepoDescriptor]) -> Vec<SyncResult> {
        let mut results = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            info!("Syncing repository: {}", descriptor.full_name());

            match self.git_client.sync_repository(descriptor).await {
                Ok(result) => {
                    if let SyncResult::Failed { error, .. } = &result {
                        error!("Error syncing repo {}: {}", descriptor.full_name(), error);
                    }
                    results.push(result);
                }
                Err(e) => {
                    error!("Error syncing repo {}: {:#}", descriptor.full_name(), e);
                    results.push(SyncResult::Failed {
                        path: self.git_client.repo_path(descriptor),
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        results
    }

    /// Clone-vs-update decision for each descriptor, from directory
    /// existence alone; touches neither git nor the network
    pub fn plan(&self, descriptors: &[RepoDescriptor]) -> Vec<(RepoDescriptor, SyncAction)> {
        descriptors
            .iter()
            .map(|descriptor| {
                let action = if self.git_client.repo_path(descriptor).exists() {
                    SyncAction::Update
                } else {
                    SyncAction::Clone
                };
                (descriptor.clone(), action)
            })
            .collect()
    }

    /// Get configuration for external inspection
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Compile a sync summary from per-repository results
fn compile_summary(results: Vec<SyncResult>, duration: Duration) -> SyncSummary {
    let total_repositories = results.len();
    let mut cloned = 0;
    let mut updated = 0;
    let mut failed = 0;
    let mut no_ops = 0;

    for result in &results {
        match result {
            SyncResult::Cloned { .. } => cloned += 1,
            SyncResult::Updated { .. } => updated += 1,
            SyncResult::NoRemoteBranches { .. } => no_ops += 1,
            SyncResult::Failed { .. } => failed += 1,
        }
    }

    SyncSummary {
        total_repositories,
        cloned,
        updated,
        failed,
        no_ops,
        duration,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(destination: &str) -> Config {
        let mut config = Config::default();
        config.destination = destination.to_string();
        config
    }

    #[test]
    fn test_compile_summary_counts() {
        let results = vec![
            SyncResult::Cloned {
                path: "/tmp/repo1".into(),
            },
            SyncResult::Updated {
                path: "/tmp/repo2".into(),
                branches: vec!["main".to_string()],
            },
            SyncResult::Failed {
                path: "/tmp/repo3".into(),
                error: "Network error".to_string(),
            },
            SyncResult::NoRemoteBranches {
                path: "/tmp/repo4".into(),
            },
            SyncResult::Updated {
                path: "/tmp/repo5".into(),
                branches: vec![],
            },
        ];

        let duration = Duration::from_secs(60);
        let summary = compile_summary(results, duration);

        assert_eq!(summary.total_repositories, 5);
        assert_eq!(summary.cloned, 1);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.no_ops, 1);
        assert_eq!(summary.duration, duration);
        assert_eq!(summary.results.len(), 5);
    }

    #[test]
    fn test_plan_decides_by_directory_existence() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(temp_dir.path().join("existing")).expect("Failed to create dir");

        let engine = SyncEngine::new(test_config(temp_dir.path().to_str().unwrap()));

        let descriptors = vec![
            RepoDescriptor::new("a", "existing"),
            RepoDescriptor::new("a", "missing"),
        ];

        let plan = engine.plan(&descriptors);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].1, SyncAction::Update);
        assert_eq!(plan[1].1, SyncAction::Clone);
    }

    #[test]
    fn test_engine_exposes_config() {
        let engine = SyncEngine::new(test_config("/tmp/mirrors"));
        assert_eq!(engine.config().destination, "/tmp/mirrors");
    }
}
