//! Subprocess execution for `git` and `gh`.
//!
//! Every invocation goes through an argument array, never a shell string, so branch
//! names and messages are passed to the child process verbatim.
//!
//! # Public API
//! - [`CommandOutput`]: captured stdout/stderr and exit status
//! - [`run`]: spawn a program and capture its output
//! - [`GitFailure`]: structured classification of a failed git command

use crate::core::error::{KunjError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Result of executing a subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

impl CommandOutput {
    /// Trimmed stdout
    pub fn text(&self) -> &str {
        self.stdout.trim()
    }

    /// Best human-readable description of a failure
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// Classify this output as a git failure
    pub fn failure(&self) -> GitFailure {
        GitFailure::classify(self)
    }

    /// Convert a failed output into a [`KunjError::CommandFailed`]
    pub fn into_error(self, context: &str) -> KunjError {
        let kind = self.failure();
        KunjError::command_failed(kind, format!("{context}: {}", self.error_text()))
    }
}

/// Run `program` with `args` in `cwd`, capturing output.
///
/// Only a failure to spawn is an `Err`; a non-zero exit is reported through
/// [`CommandOutput::success`].
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
    log::debug!("Running {program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| KunjError::spawn_failed(program, e))?;

    let result = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
        success: output.status.success(),
    };

    if !result.success {
        log::debug!(
            "{program} exited with {}: {}",
            result.exit_code,
            result.error_text()
        );
    }

    Ok(result)
}

/// Whether `program` can be spawned at all
pub fn is_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Classification of a failed git command.
///
/// git has no machine-readable error codes for these cases, so the text is matched here
/// and nowhere else. Commands run with `LC_ALL=C` to keep the text stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitFailure {
    AlreadyExists,
    NotFullyMerged,
    UnknownRevision,
    Conflict,
    WouldOverwrite,
    NothingToCommit,
    Other,
}

impl GitFailure {
    pub fn classify(output: &CommandOutput) -> Self {
        let stderr = output.stderr.to_lowercase();
        let stdout = output.stdout.to_lowercase();

        if stderr.contains("would be overwritten") {
            GitFailure::WouldOverwrite
        } else if stderr.contains("already exists") {
            GitFailure::AlreadyExists
        } else if stderr.contains("not fully merged") {
            GitFailure::NotFullyMerged
        } else if stderr.contains("did not match any")
            || stderr.contains("invalid reference")
            || stderr.contains("not a valid")
            || stderr.contains("unknown revision")
            || stderr.contains("not found")
        {
            GitFailure::UnknownRevision
        } else if has_conflict_marker(&output.stdout) || has_conflict_marker(&output.stderr) {
            GitFailure::Conflict
        } else if stdout.contains("nothing to commit") || stderr.contains("nothing to commit") {
            GitFailure::NothingToCommit
        } else {
            GitFailure::Other
        }
    }
}

/// Conflicted paths are reported on lines starting with `CONFLICT (<kind>):`
fn has_conflict_marker(text: &str) -> bool {
    text.lines().any(|line| line.starts_with("CONFLICT ("))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code: 1,
            success: false,
        }
    }

    #[test]
    fn test_classify_already_exists() {
        let output = failed("", "fatal: a branch named 'feature' already exists");
        assert_eq!(output.failure(), GitFailure::AlreadyExists);
    }

    #[test]
    fn test_classify_not_fully_merged() {
        let output = failed("", "error: The branch 'feature' is not fully merged.");
        assert_eq!(output.failure(), GitFailure::NotFullyMerged);
    }

    #[test]
    fn test_classify_unknown_revision() {
        let output = failed(
            "",
            "error: pathspec 'nope' did not match any file(s) known to git",
        );
        assert_eq!(output.failure(), GitFailure::UnknownRevision);
    }

    #[test]
    fn test_classify_conflict_from_stdout() {
        let output = failed("CONFLICT (content): Merge conflict in a.txt", "");
        assert_eq!(output.failure(), GitFailure::Conflict);
    }

    #[test]
    fn test_classify_overwrite_naming_conflict_file() {
        let output = failed(
            "",
            "error: Your local changes to the following files would be overwritten by merge:\n\tconflict-notes.txt\nPlease commit your changes or stash them before you merge.\nAborting",
        );
        assert_eq!(output.failure(), GitFailure::WouldOverwrite);
    }

    #[test]
    fn test_classify_unknown_branch_named_conflict() {
        let output = failed(
            "",
            "error: pathspec 'fix-conflict' did not match any file(s) known to git",
        );
        assert_eq!(output.failure(), GitFailure::UnknownRevision);
    }

    #[test]
    fn test_classify_conflict_word_without_marker_is_other() {
        let output = failed("Auto-merging conflict-notes.txt", "fatal: unexpected");
        assert_eq!(output.failure(), GitFailure::Other);
    }

    #[test]
    fn test_classify_nothing_to_commit() {
        let output = failed("nothing to commit, working tree clean", "");
        assert_eq!(output.failure(), GitFailure::NothingToCommit);
    }

    #[test]
    fn test_classify_other() {
        let output = failed("", "fatal: something unexpected");
        assert_eq!(output.failure(), GitFailure::Other);
    }

    #[test]
    fn test_error_text_prefers_stderr() {
        assert_eq!(failed("out", " err ").error_text(), "err");
        assert_eq!(failed(" out ", "").error_text(), "out");
    }

    #[test]
    fn test_into_error_prefixes_context() {
        let err = failed("", "fatal: boom").into_error("Failed to push");
        assert_eq!(err.to_string(), "Failed to push: fatal: boom");
        assert_eq!(err.failure_kind(), Some(GitFailure::Other));
    }

    #[test]
    fn test_run_missing_program() {
        let result = run(
            "definitely-not-a-real-program-kunj",
            &[],
            std::path::Path::new("."),
        );
        assert!(matches!(result, Err(KunjError::SpawnFailed { .. })));
    }

    #[test]
    fn test_run_captures_output() {
        let output = run("git", &["--version"], std::path::Path::new(".")).unwrap();
        assert!(output.success);
        assert!(output.text().starts_with("git version"));
    }
}
