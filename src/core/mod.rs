//! Core functionality for kunj.
//!
//! This module provides the building blocks the commands are made of: git and gh
//! wrappers, branch metadata, auto-stash reconciliation, configuration, the work log,
//! error handling and output formatting.

pub mod colors;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod git;
pub mod git_status;
pub mod github;
pub mod metadata;
pub mod output;
pub mod prompt;
pub mod shell;
pub mod stash;
pub mod wip;
pub mod worklog;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{KunjError, Result};

// === Git operations ===
// Repository handle, classified subprocess failures and status parsing
pub use git::GitRepo;
pub use git_status::{FileChange, GitStatus};
pub use shell::GitFailure;

// === Branch state ===
// Metadata persistence, stash reconciliation and WIP classification
pub use metadata::{BranchMetadata, BranchMetadataUpdate, MetadataStore, StashRecord};
pub use stash::StashReconciler;
pub use wip::is_wip;

// === Configuration ===
pub use config::{ConfigLoader, ConfigScope, KunjConfig};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_error, print_error_with_structured_usage, print_info, print_notice,
    print_section_header, print_success, print_warning,
};
