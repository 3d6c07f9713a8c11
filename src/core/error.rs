//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`KunjError`] which covers every failure a kunj command can
//! report to the user. It uses `thiserror` for ergonomic error definitions and includes
//! constructor helpers for the common failure scenarios.
//!
//! # Public API
//! - [`KunjError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, KunjError>`
//!
//! # Error Categories
//! - **Environment**: not a repository, `gh` missing or unauthenticated
//! - **Subprocess**: git/gh commands that exited non-zero, classified by [`GitFailure`]
//! - **Configuration**: unknown keys, values that do not fit the schema
//! - **AI generation**: provider unavailable, request failures, unparseable replies

use crate::core::shell::GitFailure;
use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for kunj
#[derive(Error, Debug)]
pub enum KunjError {
    // Environment errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("GitHub CLI (gh) is not installed. Install it from https://cli.github.com")]
    GhNotInstalled,

    #[error("GitHub CLI is not authenticated. Run 'gh auth login' first")]
    GhNotAuthenticated,

    #[error("Failed to run '{program}': {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },

    // Subprocess failures
    #[error("{message}")]
    CommandFailed { kind: GitFailure, message: String },

    // Branch errors
    #[error("Branch '{name}' does not exist")]
    BranchNotFound { name: String },

    #[error("Branch '{name}' already exists")]
    BranchAlreadyExists { name: String },

    #[error("Already on branch '{name}'")]
    AlreadyOnBranch { name: String },

    #[error("Branch '{name}' is not fully merged. Use --force to delete it anyway")]
    BranchNotMerged { name: String },

    #[error("Cannot delete the current branch '{name}'")]
    CannotDeleteCurrentBranch { name: String },

    // Stash errors
    #[error("No stash found at index {index}")]
    StashNotFound { index: usize },

    // Commit errors
    #[error("There are no staged changes to commit. Use --all to stage everything")]
    NoStagedChanges,

    // File operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("Unknown config key '{key}'")]
    InvalidConfigKey { key: String },

    #[error("Invalid value '{value}' for config key '{key}': {reason}")]
    InvalidConfigValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not determine home directory")]
    HomeDirectoryNotFound,

    // Work log errors
    #[error("Invalid date '{input}'. Use the format YYYY-MM-DD")]
    InvalidDate { input: String },

    // AI errors
    #[error("AI generation is unavailable: {reason}")]
    AiUnavailable { reason: String },

    #[error("AI request failed: {0}")]
    AiRequest(#[from] reqwest::Error),

    #[error("AI provider returned an error ({status}): {body}")]
    AiApi { status: u16, body: String },

    #[error("AI response is missing the '{label}:' field")]
    AiMissingLabel { label: String },

    // Prompt errors
    #[error("Input cancelled")]
    Cancelled,

    /// The command already printed usage help; only the exit status remains
    #[error("Invalid usage")]
    UsageReported,
}

/// Convenience type alias for Results using KunjError
pub type Result<T> = std::result::Result<T, KunjError>;

impl KunjError {
    /// Create a classified command failure
    pub fn command_failed(kind: GitFailure, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            kind,
            message: message.into(),
        }
    }

    /// Create a spawn failure for the given program
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Create a branch not found error
    pub fn branch_not_found(name: impl Into<String>) -> Self {
        Self::BranchNotFound { name: name.into() }
    }

    /// Create a branch already exists error
    pub fn branch_already_exists(name: impl Into<String>) -> Self {
        Self::BranchAlreadyExists { name: name.into() }
    }

    /// Create a write failed error
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config key error
    pub fn invalid_config_key(key: impl Into<String>) -> Self {
        Self::InvalidConfigKey { key: key.into() }
    }

    /// Create an invalid config value error
    pub fn invalid_config_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfigValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a config parse error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Create an AI unavailable error
    pub fn ai_unavailable(reason: impl Into<String>) -> Self {
        Self::AiUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a missing label error for AI replies
    pub fn ai_missing_label(label: impl Into<String>) -> Self {
        Self::AiMissingLabel {
            label: label.into(),
        }
    }

    /// The classification of a failed subprocess, if this error came from one
    pub fn failure_kind(&self) -> Option<GitFailure> {
        match self {
            Self::CommandFailed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
