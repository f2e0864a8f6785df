use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, error, info, warn};

use crate::source::RepoDescriptor;

/// Git operations handler: clone-on-absent, fast-forward update otherwise
pub struct GitClient {
    destination: PathBuf,
}

/// Result of a sync operation for one repository
#[derive(Debug, Clone)]
pub enum SyncResult {
    /// Repository was cloned fresh; no branch selection on first clone
    Cloned { path: PathBuf },
    /// Repository was fetched and the listed branches fast-forwarded
    Updated { path: PathBuf, branches: Vec<String> },
    /// Fetch succeeded but the branch listing was empty or unavailable
    NoRemoteBranches { path: PathBuf },
    /// Operation failed with error
    Failed { path: PathBuf, error: String },
}

/// Derive remote branch short names from `git branch -r` output lines.
///
/// Each line is trimmed and everything up to and including the first `/`
/// (the remote-name prefix) is stripped. Lines without a `/` pass through
/// unchanged.
pub fn remote_branch_short_names(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once('/') {
            Some((_, short_name)) => short_name.to_string(),
            None => line.to_string(),
        })
        .collect()
}

/// Select the branches a sync will fast-forward, in deterministic order:
/// the first of `main`/`master` found (in that priority, at most one), then
/// every short name starting with the literal prefix `release` in listed
/// order. Duplicates are dropped. The prefix test is a raw string match,
/// not a glob: `release` alone, `release2`, and `releases-v1` all qualify.
pub fn select_branches(short_names: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();

    for candidate in ["main", "master"] {
        if short_names.iter().any(|name| name == candidate) {
            selected.push(candidate.to_string());
            break;
        }
    }

    for name in short_names {
        if name.starts_with("release") && !selected.contains(name) {
            selected.push(name.clone());
        }
    }

    selected
}

impl GitClient {
    /// Create a new Git client rooted at the destination directory
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Local checkout path for a descriptor
    pub fn repo_path(&self, descriptor: &RepoDescriptor) -> PathBuf {
        self.destination.join(&descriptor.name)
    }

    /// Clone or update depending on local directory presence
    pub async fn sync_repository(&self, descriptor: &RepoDescriptor) -> Result<SyncResult> {
        let path = self.repo_path(descriptor);

        if path.exists() {
            self.update_repository(descriptor).await
        } else {
            self.clone_repository(descriptor).await
        }
    }

    /// Clone a repository into the destination directory
    pub async fn clone_repository(&self, descriptor: &RepoDescriptor) -> Result<SyncResult> {
        let path = self.repo_path(descriptor);

        info!("Cloning new repo: {}", descriptor.name);

        // cwd is the destination root; git names the checkout after the repo
        match self
            .run_git(&["clone", &descriptor.clone_url], &self.destination)
            .await
        {
            Ok(_) => Ok(SyncResult::Cloned { path }),
            Err(e) => Ok(SyncResult::Failed {
                path,
                error: format!("{:#}", e),
            }),
        }
    }

    /// Bring an existing checkout up to date with upstream.
    ///
    /// Fetches all remotes, lists remote branches, selects the tracked
    /// subset, and checks out + pulls each selected branch in order. A fetch
    /// failure aborts this repository's sync; checkout/pull failures are
    /// logged per branch and never stop the remaining branches.
    pub async fn update_repository(&self, descriptor: &RepoDescriptor) -> Result<SyncResult> {
        let path = self.repo_path(descriptor);

        info!("Pulling latest changes in: {}", path.display());

        if let Err(e) = self.run_git(&["fetch", "--all"], &path).await {
            error!("Fetch failed in {}: {:#}", path.display(), e);
            return Ok(SyncResult::Failed {
                path,
                error: format!("{:#}", e),
            });
        }

        let listing = match self.run_git(&["branch", "-r"], &path).await {
            Ok(output) => output
                .lines()
                .map(|line| line.to_string())
                .collect::<Vec<_>>(),
            Err(e) => {
                warn!("Could not list remote branches in {}: {:#}", path.display(), e);
                return Ok(SyncResult::NoRemoteBranches { path });
            }
        };

        let short_names = remote_branch_short_names(&listing);
        if short_names.is_empty() {
            warn!("No remote branches found in {}", path.display());
            return Ok(SyncResult::NoRemoteBranches { path });
        }

        let selected = select_branches(&short_names);

        let mut pulled = Vec::new();
        for branch in &selected {
            info!("Pulling branch '{}' in {}", branch, path.display());

            let mut succeeded = true;

            // Both sub-steps run even if the previous one failed
            if let Err(e) = self.run_git(&["checkout", branch], &path).await {
                warn!("Checkout of '{}' failed in {}: {:#}", branch, path.display(), e);
                succeeded = false;
            }

            if let Err(e) = self.run_git(&["pull", "origin", branch], &path).await {
                warn!("Pull of '{}' failed in {}: {:#}", branch, path.display(), e);
                succeeded = false;
            }

            if succeeded {
                pulled.push(branch.clone());
            }
        }

        Ok(SyncResult::Updated {
            path,
            branches: pulled,
        })
    }

    /// Run a git command, capturing stdout and surfacing stderr on failure
    async fn run_git(&self, args: &[&str], cwd: &Path) -> Result<String> {
        let output = AsyncCommand::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "git {} failed in {}: {}",
                args.join(" "),
                cwd.display(),
                stderr.trim()
            ));
        }

        debug!("Ran git {} in {}", args.join(" "), cwd.display());
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
