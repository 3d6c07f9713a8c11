//! Branch metadata persistence.
//!
//! This module owns `.kunj/branches.json`, a map from branch name to
//! [`BranchMetadata`]. The file is advisory state: a missing or corrupt file reads as an
//! empty store, and write failures are logged rather than returned, so a metadata
//! problem never blocks a branch operation.
//!
//! # Public API
//! - [`BranchesMetadata`]: on-disk document (`{ "branches": { ... } }`)
//! - [`BranchMetadata`]: description, tags, notes, last switch time and stash records
//! - [`StashRecord`]: one auto-stash created by kunj
//! - [`BranchMetadataUpdate`]: partial record for shallow merges
//! - [`MetadataStore`]: load/save/get/update against a file path
//!
//! # Stash records
//! The `message` of a [`StashRecord`] is the only key that links it to a live git stash.
//! `ref` is recorded for display and is stale as soon as any other stash is pushed or
//! popped.

use crate::core::{dirs, git::GitRepo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashRecord {
    #[serde(rename = "ref")]
    pub reference: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub files: usize,
    #[serde(default)]
    pub additions: usize,
    #[serde(default)]
    pub deletions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_switched: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stashes: Vec<StashRecord>,
}

impl BranchMetadata {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.tags.is_empty()
            && self.notes.is_none()
            && self.last_switched.is_none()
            && self.stashes.is_empty()
    }

    /// Shallow merge: every field present in `update` replaces the stored one
    pub fn apply(&mut self, update: BranchMetadataUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(last_switched) = update.last_switched {
            self.last_switched = Some(last_switched);
        }
        if let Some(stashes) = update.stashes {
            self.stashes = stashes;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchesMetadata {
    #[serde(default)]
    pub branches: BTreeMap<String, BranchMetadata>,
}

/// Partial [`BranchMetadata`]; `None` leaves a field untouched.
///
/// `description` and `notes` are doubly optional so that a caller can clear them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchMetadataUpdate {
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<Option<String>>,
    pub last_switched: Option<DateTime<Utc>>,
    pub stashes: Option<Vec<StashRecord>>,
}

impl BranchMetadataUpdate {
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn last_switched(mut self, at: DateTime<Utc>) -> Self {
        self.last_switched = Some(at);
        self
    }

    pub fn stashes(mut self, stashes: Vec<StashRecord>) -> Self {
        self.stashes = Some(stashes);
        self
    }
}

pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<repo>/.kunj/branches.json`, with `.kunj/` kept out of git's view
    pub fn for_repo(repo: &GitRepo) -> Self {
        if let Err(e) = repo.ensure_excluded(&format!("{}/", dirs::KUNJ_DIR)) {
            log::warn!("Could not exclude {} from git: {e}", dirs::KUNJ_DIR);
        }
        Self::new(dirs::get_branches_path(repo.workdir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store; a missing or unreadable file yields an empty store
    pub fn load(&self) -> BranchesMetadata {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Failed to read '{}': {e}", self.path.display());
                }
                return BranchesMetadata::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!(
                    "Ignoring unparseable branch metadata '{}': {e}",
                    self.path.display()
                );
                BranchesMetadata::default()
            }
        }
    }

    /// Write the store; failures are logged and swallowed
    pub fn save(&self, metadata: &BranchesMetadata) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::error!("Failed to create '{}': {e}", parent.display());
                return;
            }
        }

        let json = match serde_json::to_string_pretty(metadata) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize branch metadata: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, json) {
            log::error!("Failed to write '{}': {e}", self.path.display());
        } else {
            log::debug!(
                "Saved metadata for {} branches to {}",
                metadata.branches.len(),
                self.path.display()
            );
        }
    }

    /// Metadata for `branch`; unknown branches read as an empty record
    pub fn get_item(&self, branch: &str) -> BranchMetadata {
        self.load().branches.get(branch).cloned().unwrap_or_default()
    }

    /// Shallow-merge `update` into the record for `branch` and persist
    pub fn update(&self, branch: &str, update: BranchMetadataUpdate) -> BranchMetadata {
        let mut metadata = self.load();
        let entry = metadata.branches.entry(branch.to_string()).or_default();
        entry.apply(update);
        let merged = entry.clone();
        self.save(&metadata);
        merged
    }

    /// Drop the record for `branch`; returns whether one existed
    pub fn remove(&self, branch: &str) -> bool {
        let mut metadata = self.load();
        let existed = metadata.branches.remove(branch).is_some();
        if existed {
            self.save(&metadata);
        }
        existed
    }

    /// Move the record for `old` to `new`, replacing anything stored under `new`
    pub fn rename(&self, old: &str, new: &str) -> bool {
        let mut metadata = self.load();
        match metadata.branches.remove(old) {
            Some(record) => {
                metadata.branches.insert(new.to_string(), record);
                self.save(&metadata);
                true
            }
            None => false,
        }
    }
}
