//! repomirror - Periodic GitHub Repository Mirroring Tool
//!
//! repomirror keeps a local directory tree in sync with a list of GitHub
//! repositories: new repositories are cloned, existing ones are fetched and
//! their tracked branches (main/master plus release branches) fast-forwarded.
//!
//! ## Core Features
//!
//! - **Two listing modes**: a repos list file, or a user's starred
//!   repositories discovered via the GitHub API
//! - **Deterministic branch tracking**: main-or-master first, then every
//!   release-prefixed branch in listed order
//! - **Unattended operation**: strictly sequential, per-repository failures
//!   are logged and skipped, the batch always runs to completion
//! - **Configuration Management**: YAML-based configuration with XDG
//!   compliance
//! - **Authentication**: GitHub CLI and token-based authentication support
//!
//! ## Modules
//!
//! - [`config`]: Configuration management and parsing
//! - [`source`]: Repository listing (file parsing and starred pagination)
//! - [`github`]: GitHub API integration and authentication
//! - [`git`]: Git operations and branch selection
//! - [`sync`]: Sequential sync driver

pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod health;
pub mod source;
pub mod sync;

pub use config::Config;
pub use error::Error;
pub use git::{GitClient, SyncResult};
pub use github::GitHubClient;
pub use health::HealthCheck;
pub use source::{FileSource, RepoDescriptor, Source, StarredSource};
pub use sync::{SyncAction, SyncEngine, SyncSummary};
