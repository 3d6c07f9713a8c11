//! Predefined repository scenarios

#![allow(dead_code)]

use super::repository::*;

/// Scenario: `main` with one commit plus a `feature` branch at the same commit
pub fn create_two_branch_repo() -> anyhow::Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    git(&repo.path, &["branch", "feature"])?;
    Ok(repo)
}

/// Scenario: `main` with tracked files that have uncommitted edits
pub fn create_dirty_repo() -> anyhow::Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(&repo.path, &["file1.txt", "file2.txt"])?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    modify_test_files(&repo.path, &["file1.txt", "file2.txt"])?;
    Ok(repo)
}
