//! GitHub operations through the `gh` CLI.
//!
//! kunj never talks to the GitHub API itself; it shells out to `gh`, which owns
//! authentication. JSON output (`--json`) is decoded with serde.

use crate::core::{
    error::{KunjError, Result},
    shell::{self, CommandOutput},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub url: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub review_decision: Option<String>,
    #[serde(default)]
    pub head_ref_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkflowRun {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl WorkflowRun {
    /// `conclusion` once finished, `status` while running
    pub fn outcome(&self) -> &str {
        match self.conclusion.as_deref() {
            Some(conclusion) if !conclusion.is_empty() => conclusion,
            _ => &self.status,
        }
    }
}

pub struct GhCli {
    workdir: PathBuf,
}

impl GhCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    fn gh(&self, args: &[&str]) -> Result<CommandOutput> {
        shell::run("gh", args, &self.workdir)
    }

    fn gh_checked(&self, args: &[&str], context: &str) -> Result<String> {
        let output = self.gh(args)?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(output.into_error(context))
        }
    }

    /// Fail early unless `gh` is installed and logged in
    pub fn ensure_ready(&self) -> Result<()> {
        if !shell::is_available("gh") {
            return Err(KunjError::GhNotInstalled);
        }
        let auth = self.gh(&["auth", "status"])?;
        if !auth.success {
            log::debug!("gh auth status: {}", auth.error_text());
            return Err(KunjError::GhNotAuthenticated);
        }
        Ok(())
    }

    /// Open a pull request for the current branch; returns its URL
    pub fn create_pr(&self, title: &str, body: &str, base: &str, draft: bool) -> Result<String> {
        let mut args = vec!["pr", "create", "--title", title, "--body", body, "--base", base];
        if draft {
            args.push("--draft");
        }
        let stdout = self.gh_checked(&args, "Failed to create pull request")?;
        Ok(stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| line.starts_with("http"))
            .unwrap_or_else(|| stdout.trim())
            .to_string())
    }

    /// Pull request for the current branch, or `None` when there is none
    pub fn view_pr(&self) -> Result<Option<PullRequest>> {
        let output = self.gh(&[
            "pr",
            "view",
            "--json",
            "number,title,state,url,isDraft,reviewDecision,headRefName",
        ])?;
        if !output.success {
            let text = output.error_text().to_lowercase();
            if text.contains("no pull requests found") {
                return Ok(None);
            }
            return Err(output.into_error("Failed to read pull request"));
        }
        Ok(Some(serde_json::from_str(&output.stdout)?))
    }

    pub fn list_prs(&self) -> Result<Vec<PullRequest>> {
        let stdout = self.gh_checked(
            &[
                "pr",
                "list",
                "--json",
                "number,title,state,url,isDraft,reviewDecision,headRefName",
            ],
            "Failed to list pull requests",
        )?;
        parse_json_list(&stdout)
    }

    /// Recent workflow runs for `branch`
    pub fn list_runs(&self, branch: &str) -> Result<Vec<WorkflowRun>> {
        let stdout = self.gh_checked(
            &[
                "run",
                "list",
                "--branch",
                branch,
                "--limit",
                "5",
                "--json",
                "name,status,conclusion,url",
            ],
            "Failed to list workflow runs",
        )?;
        parse_json_list(&stdout)
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(stdout)?)
}
