/// Common test utilities and helpers for repomirror tests
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run a git command in `cwd`, panicking with stderr on failure
pub fn git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run git {:?}: {}", args, e));

    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        cwd.display(),
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Commit all pending changes in `repo` with a fixed test identity
pub fn commit_all(repo: &Path, message: &str) {
    git(repo, &["add", "-A"]);
    git(
        repo,
        &[
            "-c",
            "user.email=test@example.com",
            "-c",
            "user.name=Test User",
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
}

/// Create an upstream repository with one commit on `default_branch`.
///
/// The returned path doubles as the clone URL; the directory name must match
/// the repository name so that `git clone` picks the expected checkout name.
pub fn create_upstream(parent: &Path, name: &str, default_branch: &str) -> PathBuf {
    let repo = parent.join(name);
    std::fs::create_dir_all(&repo).expect("Failed to create upstream dir");

    git(&repo, &["init", "-q"]);
    git(
        &repo,
        &["symbolic-ref", "HEAD", &format!("refs/heads/{}", default_branch)],
    );

    std::fs::write(repo.join("README.md"), format!("# {}\n", name))
        .expect("Failed to write README");
    commit_all(&repo, "initial commit");

    repo
}

/// Add a branch with one commit to `repo`, restoring the previous checkout
pub fn add_branch(repo: &Path, branch: &str) {
    let previous = git(repo, &["branch", "--show-current"]).trim().to_string();

    git(repo, &["checkout", "-q", "-b", branch]);
    std::fs::write(
        repo.join(format!("{}.txt", branch.replace('/', "-"))),
        branch,
    )
    .expect("Failed to write branch file");
    commit_all(repo, &format!("commit on {}", branch));

    git(repo, &["checkout", "-q", &previous]);
}

/// Append a commit to `branch`, restoring the previous checkout
pub fn advance_branch(repo: &Path, branch: &str, filename: &str) {
    let previous = git(repo, &["branch", "--show-current"]).trim().to_string();

    git(repo, &["checkout", "-q", branch]);
    std::fs::write(repo.join(filename), branch).expect("Failed to write file");
    commit_all(repo, &format!("advance {}", branch));

    git(repo, &["checkout", "-q", &previous]);
}

/// Current commit hash of `rev` in `repo`
pub fn rev_parse(repo: &Path, rev: &str) -> String {
    git(repo, &["rev-parse", rev]).trim().to_string()
}

/// Clone `upstream` into `dest_root` the way a previous sync run would have
pub fn preclone(dest_root: &Path, upstream: &Path) {
    git(
        dest_root,
        &["clone", "-q", upstream.to_str().expect("utf-8 path")],
    );
}
