//! Type-safe git file status enumeration.
//!
//! This module defines [`GitStatus`] and [`FileChange`], parsed from
//! `git status --porcelain` and `git diff --name-status` output. The commit flow uses
//! them to preview what will be committed and to guess a commit type when no AI
//! reply is available.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Git file status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GitStatus {
    /// Modified file (M)
    Modified,
    /// Added/new file in index (A)
    Added,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Type changed (T)
    TypeChanged,
    /// Untracked file (??)
    Untracked,
    /// Unmerged/conflicted file (UU)
    Unmerged,
}

/// A single changed path with its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub status: GitStatus,
    pub path: PathBuf,
    pub staged: bool,
}

impl GitStatus {
    /// Convert a single status letter (as used by porcelain and `--name-status`)
    pub fn from_code(code: char) -> Option<GitStatus> {
        match code {
            'M' => Some(GitStatus::Modified),
            'A' => Some(GitStatus::Added),
            'D' => Some(GitStatus::Deleted),
            'R' => Some(GitStatus::Renamed),
            'C' => Some(GitStatus::Copied),
            'T' => Some(GitStatus::TypeChanged),
            'U' => Some(GitStatus::Unmerged),
            _ => None,
        }
    }

    /// Get the string representation for display
    pub fn as_str(&self) -> &'static str {
        match self {
            GitStatus::Modified => "M",
            GitStatus::Added => "A",
            GitStatus::Deleted => "D",
            GitStatus::Renamed => "R",
            GitStatus::Copied => "C",
            GitStatus::TypeChanged => "T",
            GitStatus::Untracked => "??",
            GitStatus::Unmerged => "UU",
        }
    }

    /// Get sort priority for status ordering
    pub fn sort_priority(&self, staged: bool) -> u8 {
        match (self, staged) {
            (GitStatus::Unmerged, _) => 0,
            (GitStatus::Added, true) => 1,
            (GitStatus::Modified, true) => 2,
            (GitStatus::Deleted, true) => 3,
            (GitStatus::Renamed, true) => 4,
            (GitStatus::Copied, true) => 5,
            (GitStatus::TypeChanged, true) => 6,
            (GitStatus::Modified, false) => 7,
            (GitStatus::Deleted, false) => 8,
            (GitStatus::Renamed, false) => 9,
            (GitStatus::Copied, false) => 10,
            (GitStatus::TypeChanged, false) => 11,
            (GitStatus::Untracked, _) => 12,
            _ => 13,
        }
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        match self {
            GitStatus::Modified => "modified",
            GitStatus::Added => "new",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::Copied => "copied",
            GitStatus::TypeChanged => "type changed",
            GitStatus::Untracked => "untracked",
            GitStatus::Unmerged => "both modified",
        }
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path part of a porcelain/name-status entry; renames keep the destination
fn entry_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let target = raw.rsplit(" -> ").next().unwrap_or(raw);
    PathBuf::from(target.trim_matches('"'))
}

/// Parse `git status --porcelain` (v1) output.
///
/// A path with both staged and unstaged changes yields two entries. Results are sorted
/// by [`GitStatus::sort_priority`] and then by path.
pub fn parse_porcelain(output: &str) -> Vec<FileChange> {
    let mut files = Vec::new();

    for line in output.lines() {
        if line.len() < 4 {
            continue;
        }
        let mut codes = line.chars();
        let (x, y) = match (codes.next(), codes.next()) {
            (Some(x), Some(y)) => (x, y),
            _ => continue,
        };
        let path = entry_path(&line[3..]);

        if x == '?' && y == '?' {
            files.push(FileChange {
                status: GitStatus::Untracked,
                path,
                staged: false,
            });
            continue;
        }

        if x == 'U' || y == 'U' || (x == 'A' && y == 'A') || (x == 'D' && y == 'D') {
            files.push(FileChange {
                status: GitStatus::Unmerged,
                path,
                staged: false,
            });
            continue;
        }

        if let Some(status) = GitStatus::from_code(x) {
            files.push(FileChange {
                status,
                path: path.clone(),
                staged: true,
            });
        }
        if let Some(status) = GitStatus::from_code(y) {
            files.push(FileChange {
                status,
                path,
                staged: false,
            });
        }
    }

    files.sort_by(|a, b| {
        a.status
            .sort_priority(a.staged)
            .cmp(&b.status.sort_priority(b.staged))
            .then_with(|| a.path.cmp(&b.path))
    });

    files
}

/// Parse `git diff --name-status` output into staged changes
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let code = parts.next()?.chars().next()?;
            let status = GitStatus::from_code(code)?;
            let path = parts.last()?;
            Some(FileChange {
                status,
                path: entry_path(path),
                staged: true,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_status_as_str() {
        assert_eq!(GitStatus::Modified.as_str(), "M");
        assert_eq!(GitStatus::Added.as_str(), "A");
        assert_eq!(GitStatus::Untracked.as_str(), "??");
        assert_eq!(GitStatus::Unmerged.as_str(), "UU");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(GitStatus::from_code('M'), Some(GitStatus::Modified));
        assert_eq!(GitStatus::from_code('R'), Some(GitStatus::Renamed));
        assert_eq!(GitStatus::from_code(' '), None);
        assert_eq!(GitStatus::from_code('?'), None);
    }

    #[test]
    fn test_parse_porcelain_staged_and_unstaged() {
        let output = "MM src/lib.rs\nA  src/new.rs\n?? notes.txt\n D gone.rs\n";
        let files = parse_porcelain(output);

        assert_eq!(files.len(), 5);
        assert_eq!(files[0].status, GitStatus::Added);
        assert!(files[0].staged);
        assert_eq!(files[0].path, PathBuf::from("src/new.rs"));
        assert_eq!(files[1].status, GitStatus::Modified);
        assert!(files[1].staged);
        assert_eq!(files[2].status, GitStatus::Modified);
        assert!(!files[2].staged);
        assert_eq!(files[3].status, GitStatus::Deleted);
        assert!(!files[3].staged);
        assert_eq!(files[4].status, GitStatus::Untracked);
    }

    #[test]
    fn test_parse_porcelain_rename_uses_target() {
        let files = parse_porcelain("R  old.rs -> new.rs\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, GitStatus::Renamed);
        assert_eq!(files[0].path, PathBuf::from("new.rs"));
    }

    #[test]
    fn test_parse_porcelain_conflict() {
        let files = parse_porcelain("UU src/main.rs\n");
        assert_eq!(files[0].status, GitStatus::Unmerged);
    }

    #[test]
    fn test_parse_name_status() {
        let files = parse_name_status("M\tsrc/lib.rs\nA\tREADME.md\nR100\ta.rs\tb.rs\n");
        assert_eq!(files.len(), 3);
        assert_eq!(files[2].status, GitStatus::Renamed);
        assert_eq!(files[2].path, PathBuf::from("b.rs"));
        assert!(files.iter().all(|f| f.staged));
    }

    #[test]
    fn test_description() {
        assert_eq!(GitStatus::Modified.description(), "modified");
        assert_eq!(GitStatus::Added.description(), "new");
        assert_eq!(GitStatus::Unmerged.description(), "both modified");
    }
}
