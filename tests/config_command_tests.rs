use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{assertions, repository::*};

#[cfg(test)]
mod config_command_tests {
    use super::*;

    #[test]
    fn test_config_set_and_get_local() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--set", "preferences.recentDays", "3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("preferences.recentDays = 3 (local)"));

        assert!(repo.path.join(".kunj").join("config.json").exists());

        repo.kunj()?
            .args(["config", "--get", "preferences.recentDays"])
            .assert()
            .success()
            .stdout(predicate::str::contains("3"));

        Ok(())
    }

    #[test]
    fn test_config_get_returns_default() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--get", "commit.style"])
            .assert()
            .success()
            .stdout(predicate::str::contains("conventional"));

        Ok(())
    }

    #[test]
    fn test_config_local_overrides_global() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--global", "--set", "pr.baseBranch", "develop"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(global)"));
        assert!(repo.home.path().join(".kunj").join("config.json").exists());

        repo.kunj()?
            .args(["config", "--get", "pr.baseBranch"])
            .assert()
            .success()
            .stdout(predicate::str::contains("develop"));

        repo.kunj()?
            .args(["config", "--set", "pr.baseBranch", "trunk"])
            .assert()
            .success();

        repo.kunj()?
            .args(["config", "--get", "pr.baseBranch"])
            .assert()
            .success()
            .stdout(predicate::str::contains("trunk"));

        Ok(())
    }

    #[test]
    fn test_config_list_groups_sections() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("autoStash"))
            .stdout(predicate::str::contains("baseBranch"));

        Ok(())
    }

    #[test]
    fn test_config_unknown_key_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--get", "nope.key"])
            .assert()
            .failure()
            .stderr(assertions::has_error("Unknown config key 'nope.key'"));

        Ok(())
    }

    #[test]
    fn test_config_invalid_value_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["config", "--set", "preferences.autoStash", "maybe"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid value 'maybe'"));

        assert!(!repo.path.join(".kunj").join("config.json").exists());
        Ok(())
    }

    #[test]
    fn test_config_outside_repository_uses_global() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let home = tempfile::TempDir::new()?;

        kunj_in(dir.path(), home.path())?
            .args(["config", "--set", "commit.style", "simple"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(global)"));

        assert!(home.path().join(".kunj").join("config.json").exists());
        Ok(())
    }

    #[test]
    fn test_setup_defaults_writes_global_config() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.kunj()?
            .args(["setup", "--defaults"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration saved to"));

        let content =
            std::fs::read_to_string(repo.home.path().join(".kunj").join("config.json"))?;
        let config: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(config["preferences"]["autoStash"], true);
        assert_eq!(config["commit"]["style"], "conventional");

        Ok(())
    }
}
