//! Git repository management and setup utilities
//!
//! Provides functions for creating test repositories and running kunj inside them.

#![allow(dead_code)]

use anyhow::{bail, Context};
use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test repository plus an isolated home directory.
///
/// Both `TempDir`s must stay alive for the duration of the test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub home: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Get the repository path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A `kunj` command that runs inside this repository with an empty home
    pub fn kunj(&self) -> anyhow::Result<Command> {
        kunj_in(&self.path, self.home.path())
    }

    /// Parsed `.kunj/branches.json`, or an empty object when it doesn't exist yet
    pub fn metadata(&self) -> anyhow::Result<serde_json::Value> {
        let path = self.path.join(".kunj").join("branches.json");
        if !path.exists() {
            return Ok(serde_json::json!({}));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Metadata entry for one branch
    pub fn branch_metadata(&self, branch: &str) -> anyhow::Result<serde_json::Value> {
        Ok(self.metadata()?["branches"][branch].clone())
    }
}

/// A `kunj` command in `dir` with `HOME` pointed at `home` and colors off
pub fn kunj_in(dir: &Path, home: &Path) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("kunj")?;
    cmd.current_dir(dir)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

/// Sets up a fresh git repository on `main` with user identity configured
pub fn setup_test_repo() -> anyhow::Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let home = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init"])?;
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&repo_path, &["config", "user.name", "Test User"])?;
    git(&repo_path, &["config", "user.email", "test@example.com"])?;
    git(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        home,
        path: repo_path,
    })
}

/// Sets up a git repository with an initial commit containing `initial.txt`
pub fn setup_test_repo_with_initial_commit() -> anyhow::Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;

    Ok(repo)
}

/// Runs git in `repo_path` and returns trimmed stdout; fails on a non-zero exit
pub fn git(repo_path: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .env("LC_ALL", "C")
        .output()
        .with_context(|| format!("running git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Creates a file with specified content in the repository
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> anyhow::Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> anyhow::Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

/// Adds a file to the git index
pub fn git_add(repo_path: &Path, filename: &str) -> anyhow::Result<()> {
    git(repo_path, &["add", filename])?;
    Ok(())
}

/// Creates a git commit with the specified message
pub fn git_commit(repo_path: &Path, message: &str) -> anyhow::Result<()> {
    git(repo_path, &["commit", "-m", message])?;
    Ok(())
}

pub fn current_branch(repo_path: &Path) -> anyhow::Result<String> {
    git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Lines of `git stash list`
pub fn stash_list(repo_path: &Path) -> anyhow::Result<Vec<String>> {
    Ok(git(repo_path, &["stash", "list"])?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Creates multiple test files with sequential content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> anyhow::Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("content{}\nline 2\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}

/// Modifies multiple test files with new content
pub fn modify_test_files(repo_path: &Path, filenames: &[&str]) -> anyhow::Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("modified{}\nline 2\nnew line\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}
