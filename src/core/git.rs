//! Git repository operations.
//!
//! This module provides a high-level interface to git through the [`GitRepo`] struct.
//! Repository discovery and branch enumeration go through `git2`; everything that
//! mutates the repository (checkout, stash, commit, push) runs the `git` binary via
//! [`crate::core::shell`] so behaviour matches what the user would get by hand.
//!
//! # Public API
//! - [`GitRepo`]: Main interface for git repository operations
//! - [`StashEntry`]: One line of live `git stash list` output
//! - [`DiffStats`]: Parsed `git diff --stat` summary

use crate::core::{
    error::{KunjError, Result},
    git_status::{parse_name_status, parse_porcelain, FileChange},
    shell::{self, CommandOutput, GitFailure},
};
use git2::{BranchType, Repository};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static FILES_CHANGED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) files? changed").expect("valid files regex"));
static INSERTIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) insertions?\(\+\)").expect("valid insertions regex"));
static DELETIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) deletions?\(-\)").expect("valid deletions regex"));
static STASH_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^stash@\{(\d+)\}").expect("valid stash regex"));

/// One entry of `git stash list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashEntry {
    /// Current position in the stash stack; changes whenever stashes are pushed or popped
    pub index: usize,
    /// The full `git stash list` line, e.g. `stash@{0}: On main: kunj-auto-stash-main-1`
    pub line: String,
}

impl StashEntry {
    pub fn reference(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

/// Summary of `git diff --stat`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
}

pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| KunjError::NotInGitRepo)?;
        let workdir = repo
            .workdir()
            .ok_or(KunjError::NotInGitRepo)?
            .to_path_buf();
        Ok(GitRepo { repo, workdir })
    }

    /// Open the repository containing the current directory
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Self::open(current_dir)
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    /// Run git with the given arguments in the working directory
    pub fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        shell::run("git", args, &self.workdir)
    }

    /// Run git and turn a non-zero exit into an error carrying `context`
    pub fn git_checked(&self, args: &[&str], context: &str) -> Result<String> {
        let output = self.git(args)?;
        if output.success {
            Ok(output.stdout)
        } else {
            Err(output.into_error(context))
        }
    }

    pub fn get_current_branch(&self) -> Result<String> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                // No commits yet; HEAD still names the branch
                let head_ref = self.repo.find_reference("HEAD")?;
                let target = head_ref.symbolic_target().unwrap_or("refs/heads/-none-");
                return Ok(target.trim_start_matches("refs/heads/").to_string());
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(branch_name) = head.shorthand() {
            if head.is_branch() {
                Ok(branch_name.to_string())
            } else {
                let short = head
                    .target()
                    .map(|oid| oid.to_string()[..7].to_string())
                    .unwrap_or_default();
                Ok(format!("detached at {short}"))
            }
        } else {
            Ok("-none-".to_string())
        }
    }

    /// Sorted local branch names
    pub fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Sorted remote branch names (e.g. `origin/main`), excluding symbolic HEADs
    pub fn remote_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                if !name.ends_with("/HEAD") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, BranchType::Local).is_ok()
    }

    /// `git status --porcelain` entries
    pub fn changed_files(&self) -> Result<Vec<FileChange>> {
        let stdout = self.git_checked(&["status", "--porcelain"], "Failed to read status")?;
        Ok(parse_porcelain(&stdout))
    }

    /// Whether the working tree has uncommitted changes, including untracked files
    pub fn is_dirty(&self) -> Result<bool> {
        let stdout = self.git_checked(&["status", "--porcelain"], "Failed to read status")?;
        Ok(!stdout.trim().is_empty())
    }

    /// Best-effort diff stats against HEAD; anything unparseable counts as zero
    pub fn diff_stats(&self) -> DiffStats {
        let output = match self.git(&["diff", "HEAD", "--stat"]) {
            Ok(output) if output.success => output,
            _ => match self.git(&["diff", "--stat"]) {
                Ok(output) if output.success => output,
                _ => return DiffStats::default(),
            },
        };
        parse_diff_stat(&output.stdout)
    }

    pub fn create_branch(&self, name: &str, base: Option<&str>) -> Result<()> {
        let mut args = vec!["checkout", "-b", name];
        if let Some(base) = base {
            args.push(base);
        }
        let output = self.git(&args)?;
        if output.success {
            return Ok(());
        }
        match output.failure() {
            GitFailure::AlreadyExists => Err(KunjError::branch_already_exists(name)),
            _ => Err(output.into_error(&format!("Failed to create branch '{name}'"))),
        }
    }

    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let output = self.git(&["checkout", name])?;
        if output.success {
            return Ok(());
        }
        match output.failure() {
            GitFailure::UnknownRevision => Err(KunjError::branch_not_found(name)),
            _ => Err(output.into_error(&format!("Failed to switch to branch '{name}'"))),
        }
    }

    pub fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        let output = self.git(&["branch", flag, name])?;
        if output.success {
            return Ok(());
        }
        match output.failure() {
            GitFailure::NotFullyMerged => Err(KunjError::BranchNotMerged {
                name: name.to_string(),
            }),
            GitFailure::UnknownRevision => Err(KunjError::branch_not_found(name)),
            _ => Err(output.into_error(&format!("Failed to delete branch '{name}'"))),
        }
    }

    pub fn rename_branch(&self, old: &str, new: &str) -> Result<()> {
        let output = self.git(&["branch", "-m", old, new])?;
        if output.success {
            return Ok(());
        }
        match output.failure() {
            GitFailure::AlreadyExists => Err(KunjError::branch_already_exists(new)),
            GitFailure::UnknownRevision => Err(KunjError::branch_not_found(old)),
            _ => Err(output.into_error(&format!("Failed to rename branch '{old}'"))),
        }
    }

    pub fn stash_push(&self, message: &str) -> Result<CommandOutput> {
        self.git(&["stash", "push", "--include-untracked", "-m", message])
    }

    /// Live `git stash list`, most recent first
    pub fn stash_list(&self) -> Result<Vec<StashEntry>> {
        let stdout = self.git_checked(&["stash", "list"], "Failed to list stashes")?;
        Ok(parse_stash_list(&stdout))
    }

    pub fn stash_pop(&self, index: usize) -> Result<CommandOutput> {
        self.git(&["stash", "pop", &format!("stash@{{{index}}}")])
    }

    pub fn stash_apply(&self, index: usize) -> Result<CommandOutput> {
        self.git(&["stash", "apply", &format!("stash@{{{index}}}")])
    }

    pub fn stash_drop(&self, index: usize) -> Result<CommandOutput> {
        self.git(&["stash", "drop", &format!("stash@{{{index}}}")])
    }

    pub fn stage_all(&self) -> Result<()> {
        self.git_checked(&["add", "--all"], "Failed to stage changes")?;
        Ok(())
    }

    pub fn staged_files(&self) -> Result<Vec<FileChange>> {
        let stdout = self.git_checked(
            &["diff", "--cached", "--name-status"],
            "Failed to read staged changes",
        )?;
        Ok(parse_name_status(&stdout))
    }

    /// Staged diff, truncated to `max_chars`
    pub fn staged_diff(&self, max_chars: usize) -> Result<String> {
        let stdout = self.git_checked(&["diff", "--cached"], "Failed to read staged diff")?;
        Ok(truncate_chars(&stdout, max_chars))
    }

    /// Commit staged changes; returns the short hash of the new commit
    pub fn commit(&self, message: &str) -> Result<String> {
        let output = self.git(&["commit", "-m", message])?;
        if !output.success {
            return match output.failure() {
                GitFailure::NothingToCommit => Err(KunjError::NoStagedChanges),
                _ => Err(output.into_error("Failed to commit")),
            };
        }
        let hash = self.git_checked(&["rev-parse", "--short", "HEAD"], "Failed to read HEAD")?;
        Ok(hash.trim().to_string())
    }

    /// `<short hash> <subject>` lines for commits on HEAD that are not on `base`
    pub fn commits_since(&self, base: &str) -> Result<Vec<String>> {
        let range = format!("{base}..HEAD");
        let stdout = self.git_checked(
            &["log", &range, "--pretty=format:%h %s"],
            &format!("Failed to list commits since '{base}'"),
        )?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// Diff of HEAD against the merge base with `base`, truncated to `max_chars`
    pub fn diff_against(&self, base: &str, max_chars: usize) -> Result<String> {
        let range = format!("{base}...HEAD");
        let stdout = self.git_checked(
            &["diff", &range],
            &format!("Failed to diff against '{base}'"),
        )?;
        Ok(truncate_chars(&stdout, max_chars))
    }

    pub fn push_branch(&self, branch: &str) -> Result<()> {
        self.git_checked(
            &["push", "--set-upstream", "origin", branch],
            &format!("Failed to push branch '{branch}'"),
        )?;
        Ok(())
    }

    /// Add `pattern` to `.git/info/exclude` if it is not there yet
    pub fn ensure_excluded(&self, pattern: &str) -> Result<()> {
        let info_dir = self.repo.commondir().join("info");
        let exclude_file = info_dir.join("exclude");

        let existing = fs::read_to_string(&exclude_file).unwrap_or_default();
        if existing.lines().any(|line| line.trim() == pattern) {
            return Ok(());
        }

        fs::create_dir_all(&info_dir).map_err(|e| KunjError::write_failed(&info_dir, e))?;
        let mut content = existing;
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(pattern);
        content.push('\n');
        fs::write(&exclude_file, content).map_err(|e| KunjError::write_failed(&exclude_file, e))?;

        log::debug!("Added '{pattern}' to {}", exclude_file.display());
        Ok(())
    }
}

/// Parse the summary line of `git diff --stat`
pub fn parse_diff_stat(output: &str) -> DiffStats {
    let summary = match output.lines().rev().find(|l| l.contains("changed")) {
        Some(line) => line,
        None => return DiffStats::default(),
    };

    let capture = |re: &LazyLock<Regex>| -> usize {
        re.captures(summary)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    DiffStats {
        files: capture(&FILES_CHANGED),
        additions: capture(&INSERTIONS),
        deletions: capture(&DELETIONS),
    }
}

/// Parse `git stash list` output; lines that do not start with `stash@{N}` are skipped
pub fn parse_stash_list(output: &str) -> Vec<StashEntry> {
    output
        .lines()
        .filter_map(|line| {
            let index = STASH_INDEX.captures(line)?.get(1)?.as_str().parse().ok()?;
            Some(StashEntry {
                index,
                line: line.to_string(),
            })
        })
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}\n... (diff truncated)", &text[..byte_index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
    }

    fn setup_test_repo() -> Result<(TempDir, GitRepo)> {
        let temp_dir = TempDir::new()?;
        let repo_path = temp_dir.path();

        git(repo_path, &["init"]);
        git(repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(repo_path, &["config", "user.name", "Test User"]);
        git(repo_path, &["config", "user.email", "test@example.com"]);

        let git_repo = GitRepo::open(repo_path)?;
        Ok((temp_dir, git_repo))
    }

    fn commit_file(repo: &GitRepo, name: &str, content: &str) {
        std::fs::write(repo.workdir().join(name), content).unwrap();
        git(repo.workdir(), &["add", name]);
        git(repo.workdir(), &["commit", "-m", &format!("add {name}")]);
    }

    #[test]
    fn test_open_non_git_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitRepo::open(temp_dir.path());
        assert!(matches!(result, Err(KunjError::NotInGitRepo)));
    }

    #[test]
    fn test_current_branch_before_first_commit() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        assert_eq!(repo.get_current_branch()?, "main");
        Ok(())
    }

    #[test]
    fn test_is_dirty() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");
        assert!(!repo.is_dirty()?);

        std::fs::write(repo.workdir().join("b.txt"), "untracked")?;
        assert!(repo.is_dirty()?);
        Ok(())
    }

    #[test]
    fn test_create_and_checkout_branch() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");

        repo.create_branch("feature-x", None)?;
        assert_eq!(repo.get_current_branch()?, "feature-x");
        assert!(repo.branch_exists("feature-x"));

        repo.checkout_branch("main")?;
        assert_eq!(repo.get_current_branch()?, "main");
        assert_eq!(repo.local_branches()?, vec!["feature-x", "main"]);
        Ok(())
    }

    #[test]
    fn test_create_existing_branch_is_classified() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");
        repo.create_branch("feature-x", None)?;

        let result = repo.create_branch("feature-x", None);
        assert!(matches!(result, Err(KunjError::BranchAlreadyExists { .. })));
        Ok(())
    }

    #[test]
    fn test_checkout_missing_branch_is_classified() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");

        let result = repo.checkout_branch("nope");
        assert!(matches!(result, Err(KunjError::BranchNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_delete_unmerged_branch_requires_force() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");
        repo.create_branch("feature-x", None)?;
        commit_file(&repo, "b.txt", "two\n");
        repo.checkout_branch("main")?;

        let result = repo.delete_branch("feature-x", false);
        assert!(matches!(result, Err(KunjError::BranchNotMerged { .. })));

        repo.delete_branch("feature-x", true)?;
        assert!(!repo.branch_exists("feature-x"));
        Ok(())
    }

    #[test]
    fn test_rename_branch() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");
        repo.create_branch("old-name", None)?;
        repo.create_branch("taken", Some("main"))?;

        repo.rename_branch("old-name", "new-name")?;
        assert!(repo.branch_exists("new-name"));
        assert!(!repo.branch_exists("old-name"));

        let result = repo.rename_branch("new-name", "taken");
        assert!(matches!(result, Err(KunjError::BranchAlreadyExists { .. })));
        Ok(())
    }

    #[test]
    fn test_stash_push_and_list() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "one\n");
        std::fs::write(repo.workdir().join("a.txt"), "changed\n")?;

        let output = repo.stash_push("kunj-auto-stash-main-1")?;
        assert!(output.success);

        let stashes = repo.stash_list()?;
        assert_eq!(stashes.len(), 1);
        assert_eq!(stashes[0].index, 0);
        assert!(stashes[0].line.contains("kunj-auto-stash-main-1"));
        assert!(!repo.is_dirty()?);
        Ok(())
    }

    #[test]
    fn test_commit_returns_short_hash() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        std::fs::write(repo.workdir().join("a.txt"), "one\n")?;
        repo.stage_all()?;

        let staged = repo.staged_files()?;
        assert_eq!(staged.len(), 1);

        let hash = repo.commit("feat: add a")?;
        assert!(hash.len() >= 7);
        assert!(!repo.is_dirty()?);
        Ok(())
    }

    #[test]
    fn test_ensure_excluded_is_idempotent() -> Result<()> {
        let (_temp_dir, repo) = setup_test_repo()?;
        repo.ensure_excluded(".kunj/")?;
        repo.ensure_excluded(".kunj/")?;

        let exclude = std::fs::read_to_string(repo.get_repository().commondir().join("info/exclude"))?;
        assert_eq!(exclude.lines().filter(|l| l.trim() == ".kunj/").count(), 1);
        Ok(())
    }

    #[test]
    fn test_parse_diff_stat() {
        let output = " a.txt | 3 ++-\n b.txt | 8 ++++++++\n 2 files changed, 10 insertions(+), 1 deletion(-)\n";
        assert_eq!(
            parse_diff_stat(output),
            DiffStats {
                files: 2,
                additions: 10,
                deletions: 1
            }
        );
    }

    #[test]
    fn test_parse_diff_stat_garbage() {
        assert_eq!(parse_diff_stat("not a stat"), DiffStats::default());
        let only_deletions = parse_diff_stat(" 1 file changed, 4 deletions(-)");
        assert_eq!(only_deletions.files, 1);
        assert_eq!(only_deletions.additions, 0);
        assert_eq!(only_deletions.deletions, 4);
    }

    #[test]
    fn test_parse_stash_list() {
        let output = "stash@{0}: On main: kunj-auto-stash-main-2\nstash@{1}: WIP on main: abc123 msg\n";
        let entries = parse_stash_list(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[0].reference(), "stash@{0}");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert!(truncate_chars("abcdefghij", 3).starts_with("abc\n"));
    }
}
