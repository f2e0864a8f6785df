//! End-to-end sync tests driving real git repositories in temp directories

mod common;

use common::*;
use repomirror::{Config, RepoDescriptor, SyncEngine, SyncResult};
use std::path::Path;
use tempfile::TempDir;

fn engine_for(dest: &Path) -> SyncEngine {
    let mut config = Config::default();
    config.destination = dest.to_string_lossy().into_owned();
    SyncEngine::new(config)
}

/// Descriptor pointing at a local upstream path instead of a GitHub URL
fn local_descriptor(upstream: &Path, name: &str) -> RepoDescriptor {
    RepoDescriptor {
        owner: "test".to_string(),
        name: name.to_string(),
        clone_url: upstream.to_string_lossy().into_owned(),
    }
}

#[tokio::test]
async fn test_absent_repo_is_cloned() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let upstream = create_upstream(&temp.path().join("upstreams"), "foo", "main");
    let dest = temp.path().join("mirrors");
    std::fs::create_dir_all(&dest).expect("Failed to create dest");

    let engine = engine_for(&dest);
    let results = engine.sync_all(&[local_descriptor(&upstream, "foo")]).await;

    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], SyncResult::Cloned { .. }));
    assert!(dest.join("foo").join(".git").exists());
    assert!(dest.join("foo").join("README.md").exists());
}

#[tokio::test]
async fn test_existing_repo_pulls_main_and_release_branches() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let upstream = create_upstream(&temp.path().join("upstreams"), "bar", "main");
    add_branch(&upstream, "release-1");
    add_branch(&upstream, "feature-x");

    let dest = temp.path().join("mirrors");
    std::fs::create_dir_all(&dest).expect("Failed to create dest");
    preclone(&dest, &upstream);

    // Upstream moves on after the initial clone
    advance_branch(&upstream, "main", "new-on-main.txt");
    advance_branch(&upstream, "release-1", "new-on-release.txt");

    let engine = engine_for(&dest);
    let results = engine.sync_all(&[local_descriptor(&upstream, "bar")]).await;

    assert_eq!(results.len(), 1);
    match &results[0] {
        SyncResult::Updated { branches, .. } => {
            // main first, then release branches in listed order
            assert_eq!(branches, &vec!["main".to_string(), "release-1".to_string()]);
        }
        other => panic!("Expected Updated, got {:?}", other),
    }

    let mirror = dest.join("bar");
    assert_eq!(rev_parse(&mirror, "main"), rev_parse(&upstream, "main"));
    assert_eq!(
        rev_parse(&mirror, "release-1"),
        rev_parse(&upstream, "release-1")
    );
}

#[tokio::test]
async fn test_master_is_pulled_when_no_main() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let upstream = create_upstream(&temp.path().join("upstreams"), "legacy", "master");

    let dest = temp.path().join("mirrors");
    std::fs::create_dir_all(&dest).expect("Failed to create dest");
    preclone(&dest, &upstream);

    advance_branch(&upstream, "master", "more.txt");

    let engine = engine_for(&dest);
    let results = engine
        .sync_all(&[local_descriptor(&upstream, "legacy")])
        .await;

    match &results[0] {
        SyncResult::Updated { branches, .. } => {
            assert_eq!(branches, &vec!["master".to_string()]);
        }
        other => panic!("Expected Updated, got {:?}", other),
    }

    let mirror = dest.join("legacy");
    assert_eq!(rev_parse(&mirror, "master"), rev_parse(&upstream, "master"));
}

#[tokio::test]
async fn test_no_tracked_branches_is_a_no_op() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let upstream = create_upstream(&temp.path().join("upstreams"), "untracked", "dev");

    let dest = temp.path().join("mirrors");
    std::fs::create_dir_all(&dest).expect("Failed to create dest");
    preclone(&dest, &upstream);

    let before = rev_parse(&dest.join("untracked"), "dev");
    advance_branch(&upstream, "dev", "ignored.txt");

    let engine = engine_for(&dest);
    let results = engine
        .sync_all(&[local_descriptor(&upstream, "untracked")])
        .await;

    // No main/master/release branch: nothing is checked out or pulled
    match &results[0] {
        SyncResult::Updated { branches, .. } => assert!(branches.is_empty()),
        other => panic!("Expected Updated, got {:?}", other),
    }
    assert_eq!(rev_parse(&dest.join("untracked"), "dev"), before);
}

#[tokio::test]
async fn test_fetch_failure_skips_repo_but_batch_continues() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let upstream = create_upstream(&temp.path().join("upstreams"), "good", "main");

    let dest = temp.path().join("mirrors");
    std::fs::create_dir_all(&dest).expect("Failed to create dest");

    // An existing checkout whose remote is unreachable
    let broken = dest.join("broken");
    std::fs::create_dir_all(&broken).expect("Failed to create broken repo");
    git(&broken, &["init", "-q"]);
    git(&broken, &["remote", "add", "origin", "/nonexistent/upstream"]);

    let engine = engine_for(&dest);
    let descriptors = vec![
        local_descriptor(&broken, "broken"),
        local_descriptor(&upstream, "good"),
    ];
    let results = engine.sync_all(&descriptors).await;

    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], SyncResult::Failed { .. }));
    // The failure did not stop the rest of the batch
    assert!(matches!(results[1], SyncResult::Cloned { .. }));
    assert!(dest.join("good").join("README.md").exists());
}

#[tokio::test]
async fn test_run_creates_destination_directory() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let dest = temp.path().join("mirrors");

    let repos_file = temp.path().join("repos.txt");
    std::fs::write(&repos_file, "# nothing to mirror\n").expect("Failed to write repos file");

    let engine = engine_for(&dest);
    let source = repomirror::FileSource::new(&repos_file);
    let summary = engine.run(&source).await.expect("Run should succeed");

    assert_eq!(summary.total_repositories, 0);
    assert!(dest.exists());
}
