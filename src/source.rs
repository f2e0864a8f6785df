//! Repository listing abstraction layer
//!
//! This module provides the interface that produces the ordered sequence of
//! repository descriptors a sync run consumes, either by parsing a repos list
//! file or by paginating a user's starred listing on the GitHub API.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::github::{GitHubClient, StarredRepo};

/// Identifies one repository to mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDescriptor {
    /// Owner/organization name (e.g., "rust-lang")
    pub owner: String,

    /// Repository name (e.g., "cargo"); doubles as the local directory name
    pub name: String,

    /// HTTPS clone URL
    pub clone_url: String,
}

impl RepoDescriptor {
    /// Build a descriptor with the canonical GitHub HTTPS clone URL.
    ///
    /// Every repos-file entry is normalized to this form no matter which
    /// original form (full URL or short form) was given.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let clone_url = format!("https://github.com/{}/{}.git", owner, name);
        Self {
            owner,
            name,
            clone_url,
        }
    }

    /// Get display name (owner/name format)
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl From<StarredRepo> for RepoDescriptor {
    fn from(repo: StarredRepo) -> Self {
        let owner = repo
            .full_name
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            owner,
            name: repo.name,
            clone_url: repo.clone_url,
        }
    }
}

/// Trait for repository listing sources
///
/// Implement this trait to add new ways of producing the repository list.
#[async_trait]
pub trait Source: Send + Sync {
    /// Produce the ordered sequence of descriptors to synchronize
    async fn list(&self) -> Result<Vec<RepoDescriptor>>;

    /// Source name for display/logging
    fn source_name(&self) -> &'static str;
}

/// Parse a single repos-file line.
///
/// Supported forms:
/// - `https://github.com/owner/repo`
/// - `https://github.com/owner/repo.git`
/// - `owner/repo`
/// - `owner/repo.git`
///
/// Returns `None` for blank lines, `#` comments, and invalid lines; the
/// caller distinguishes the latter by checking the trimmed line itself.
pub fn parse_repo_line(line: &str) -> Option<RepoDescriptor> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    // Full URL form
    if let Some(stripped) = line.strip_prefix("https://github.com/") {
        let path = stripped.trim_end_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let mut segments = path.split('/');
        let owner = segments.next()?;
        let name = segments.next()?;
        return Some(RepoDescriptor::new(owner, name));
    }

    // Short owner/repo form
    if line.contains('/') && !line.starts_with("http") {
        let (owner, remainder) = line.split_once('/')?;
        let name = remainder.strip_suffix(".git").unwrap_or(remainder);
        return Some(RepoDescriptor::new(owner, name));
    }

    None
}

/// File-based repository lister
///
/// Reads a UTF-8 text file, one repository reference per line. Invalid lines
/// are reported with their 1-based line number and skipped; parsing always
/// continues to the end of the file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse the repos file into descriptors, in file order
    pub fn parse_file(path: &Path) -> Result<Vec<RepoDescriptor>> {
        if !path.exists() {
            return Err(Error::RepoFileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        let mut descriptors = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            match parse_repo_line(line) {
                Some(descriptor) => descriptors.push(descriptor),
                None => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        warn!("Skipping invalid line {}: {}", line_number, trimmed);
                    }
                }
            }
        }

        Ok(descriptors)
    }
}

#[async_trait]
impl Source for FileSource {
    async fn list(&self) -> Result<Vec<RepoDescriptor>> {
        info!("Reading repos from file: {}", self.path.display());
        Self::parse_file(&self.path)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

/// Starred-listing repository lister
///
/// Pages through the starred repositories of a fixed user via the GitHub API.
pub struct StarredSource {
    client: GitHubClient,
    username: String,
}

impl StarredSource {
    pub fn new(client: GitHubClient, username: impl Into<String>) -> Self {
        Self {
            client,
            username: username.into(),
        }
    }
}

#[async_trait]
impl Source for StarredSource {
    async fn list(&self) -> Result<Vec<RepoDescriptor>> {
        let starred = self.client.list_starred(&self.username).await?;

        Ok(starred.into_iter().map(RepoDescriptor::from).collect())
    }

    fn source_name(&self) -> &'static str {
        "starred"
    }
}
