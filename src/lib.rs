//! kunj - a productivity layer over `git` and `gh`.
//!
//! kunj adds branch metadata (descriptions, tags, notes), automatic stash-on-switch
//! bookkeeping, AI-assisted commit and pull request text, and a per-day work log.
//! Everything that touches the repository is a `git` or `gh` subprocess; kunj keeps its
//! own state in `.kunj/` next to the repository and `~/.kunj/` for global settings.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Git repository operations
//! - Branch metadata and stash reconciliation
//! - Layered configuration
//! - Error handling and result types

pub mod ai;
pub mod commands;
pub mod core;

// Error handling
pub use self::core::{KunjError, Result};

// Git operations
pub use self::core::{GitRepo, GitStatus};

// Branch state
pub use self::core::{is_wip, BranchMetadata, BranchMetadataUpdate, MetadataStore, StashReconciler, StashRecord};

// Configuration
pub use self::core::{ConfigLoader, ConfigScope, KunjConfig};
