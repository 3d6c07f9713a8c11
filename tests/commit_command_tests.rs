use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{assertions, fixtures::*, repository::*};

#[cfg(test)]
mod commit_command_tests {
    use super::*;

    #[test]
    fn test_commit_with_message() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "README.md", "# Docs\n")?;
        git_add(&repo.path, "README.md")?;

        repo.kunj()?
            .args(["commit", "--message", "docs: add readme"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Committed"))
            .stdout(predicate::str::contains("docs: add readme"));

        assert_eq!(
            git(&repo.path, &["log", "-1", "--format=%s"])?,
            "docs: add readme"
        );
        Ok(())
    }

    #[test]
    fn test_commit_appends_to_work_log() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.md", "notes\n")?;
        git_add(&repo.path, "notes.md")?;

        repo.kunj()?
            .args(["commit", "-m", "Write notes"])
            .assert()
            .success();

        repo.kunj()?
            .arg("log")
            .assert()
            .success()
            .stdout(predicate::str::contains("[main] Write notes"));

        Ok(())
    }

    #[test]
    fn test_commit_without_staged_changes_fails() -> anyhow::Result<()> {
        let repo = create_dirty_repo()?;

        repo.kunj()?
            .args(["commit", "-m", "nothing staged"])
            .assert()
            .failure()
            .stderr(assertions::has_error("no staged changes"));

        Ok(())
    }

    #[test]
    fn test_commit_all_uses_file_based_message() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "src/toolbar.rs", "pub fn toolbar() {}\n")?;

        repo.kunj()?
            .args(["commit", "--all", "--yes", "--no-ai"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Commit message"));

        assert_eq!(
            git(&repo.path, &["log", "-1", "--format=%s"])?,
            "feat: add src/toolbar.rs"
        );
        assert_eq!(git(&repo.path, &["status", "--porcelain"])?, "");

        Ok(())
    }

    #[test]
    fn test_commit_falls_back_when_api_key_missing() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.kunj()?
            .args(["config", "--set", "ai.enabled", "true"])
            .assert()
            .success();
        create_file(&repo.path, "tests/smoke.rs", "#[test]\nfn smoke() {}\n")?;

        repo.kunj()?
            .args(["commit", "-a", "-y"])
            .assert()
            .success();

        assert_eq!(
            git(&repo.path, &["log", "-1", "--format=%s"])?,
            "test: add tests/smoke.rs"
        );
        Ok(())
    }

    #[test]
    fn test_commit_simple_style_has_no_type() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.kunj()?
            .args(["config", "--set", "commit.style", "simple"])
            .assert()
            .success();
        create_file(&repo.path, "initial.txt", "changed\n")?;

        repo.kunj()?
            .args(["commit", "--all", "--yes"])
            .assert()
            .success();

        assert_eq!(
            git(&repo.path, &["log", "-1", "--format=%s"])?,
            "update initial.txt"
        );
        Ok(())
    }
}
