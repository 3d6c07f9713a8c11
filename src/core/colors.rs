//! Unified color system for git status and branch listings.
//!
//! # Public API
//! - [`get_status_color_style`]: Get color function for a git status
//! - [`get_aligned_status`]: Get properly aligned colored status text
//! - [`get_colored_path`]: Apply status color to file paths
//! - [`format_file_change`]: One line of a staged-changes preview
//! - [`format_tags`]: Branch tags as `#tag` chips
//!
//! # Color Scheme
//! - **Modified**: Yellow for both staged and unstaged modifications
//! - **Added**: Green for new files in index
//! - **Deleted**: Red for removed files
//! - **Renamed/Copied**: Blue for file operations
//! - **Untracked**: Cyan for new untracked files
//! - **Unmerged**: Red bold for conflict resolution needed

use crate::core::git_status::{FileChange, GitStatus};
use colored::*;

/// Returns a closure that applies the color for `status` to any text
pub fn get_status_color_style(status: GitStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        GitStatus::Modified => Box::new(|text: &str| text.yellow()),
        GitStatus::Untracked => Box::new(|text: &str| text.cyan()),
        GitStatus::Deleted => Box::new(|text: &str| text.red()),
        GitStatus::Added => Box::new(|text: &str| text.green()),
        GitStatus::Renamed => Box::new(|text: &str| text.blue()),
        GitStatus::Copied => Box::new(|text: &str| text.blue()),
        GitStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        GitStatus::Unmerged => Box::new(|text: &str| text.red().bold()),
    }
}

/// Get colored status symbol with proper alignment
pub fn get_aligned_status(status: GitStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    let status_str = status.as_str();
    match status_str {
        s if s.len() == 2 => color_fn(status_str),
        _ => color_fn(&format!("{status_str} ")),
    }
}

pub fn get_colored_path(status: GitStatus, path: &str) -> ColoredString {
    let color_fn = get_status_color_style(status);
    color_fn(path)
}

/// `   M  src/main.rs`
pub fn format_file_change(change: &FileChange) -> String {
    let path = change.path.to_string_lossy();
    format!(
        "   {} {}",
        get_aligned_status(change.status),
        get_colored_path(change.status, &path)
    )
}

/// `#wip #ui`, muted; empty when there are no tags
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}").bright_black().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
