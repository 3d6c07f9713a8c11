//! Auto-stash bookkeeping and reconciliation.
//!
//! kunj stashes uncommitted work when leaving a branch and restores it when coming back.
//! Each stash it creates carries a generated message (`kunj-auto-stash-<branch>-<ms>`)
//! that is recorded in the branch metadata. git renumbers `stash@{N}` on every push, pop
//! and drop, so the message is the only stable link between a record and a live stash.
//!
//! The metadata is a cache of `git stash list`, never a source of truth: every path that
//! acts on a record looks it up in the live list first and prunes the record when the
//! stash is gone.
//!
//! # Public API
//! - [`StashReconciler`]: create, pop and inspect auto-stashes for a repository
//! - [`find_stash_by_message`]: the correlation between a record and a live entry
//! - [`StashDisplay`]: presentational view of a stored record

use crate::core::{
    error::{KunjError, Result},
    git::{GitRepo, StashEntry},
    metadata::{BranchMetadataUpdate, MetadataStore, StashRecord},
    output::{print_notice, print_warning},
    shell::GitFailure,
};
use chrono::{DateTime, Utc};

pub const STASH_PREFIX: &str = "kunj-auto-stash";

/// Correlation message for a new auto-stash
pub fn stash_message(branch: &str, epoch_millis: i64) -> String {
    format!("{STASH_PREFIX}-{branch}-{epoch_millis}")
}

/// Find the live stash whose message is exactly `message`.
///
/// `git stash list` lines look like `stash@{2}: On main: <message>`; lines that do not
/// follow that shape fall back to a substring match.
pub fn find_stash_by_message<'a>(entries: &'a [StashEntry], message: &str) -> Option<&'a StashEntry> {
    entries.iter().find(|entry| {
        let mut parts = entry.line.splitn(3, ": ");
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(_), Some(stored)) => stored.trim() == message,
            _ => entry.line.contains(message),
        }
    })
}

/// Outcome of popping or applying a stash that git accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
    Clean,
    Conflict,
}

/// A stored stash record prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashDisplay {
    pub branch: String,
    pub record: StashRecord,
    pub age: String,
    pub summary: String,
}

/// A live stash together with the branch record that owns it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStash {
    pub entry: StashEntry,
    pub owner: Option<(String, StashRecord)>,
}

pub struct StashReconciler<'a> {
    repo: &'a GitRepo,
    store: &'a MetadataStore,
}

impl<'a> StashReconciler<'a> {
    pub fn new(repo: &'a GitRepo, store: &'a MetadataStore) -> Self {
        Self { repo, store }
    }

    /// Stash uncommitted changes (including untracked files) for `branch`.
    ///
    /// Returns false when there is nothing to stash or git refused; failures are reported
    /// to the user but never abort the caller.
    pub fn create_stash(&self, branch: &str) -> bool {
        match self.repo.is_dirty() {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                log::warn!("Could not read working tree status: {e}");
                return false;
            }
        }

        let mut stats = self.repo.diff_stats();
        if stats.files == 0 {
            stats.files = self.repo.changed_files().map(|f| f.len()).unwrap_or(0);
        }

        let now = Utc::now();
        let message = stash_message(branch, now.timestamp_millis());

        match self.repo.stash_push(&message) {
            Ok(output) if output.success => {}
            Ok(output) => {
                print_warning(&format!(
                    "Could not stash changes on '{branch}': {}",
                    output.error_text()
                ));
                return false;
            }
            Err(e) => {
                print_warning(&format!("Could not stash changes on '{branch}': {e}"));
                return false;
            }
        }

        let reference = self
            .repo
            .stash_list()
            .ok()
            .and_then(|live| find_stash_by_message(&live, &message).map(StashEntry::reference))
            .unwrap_or_else(|| "stash@{0}".to_string());

        let record = StashRecord {
            reference,
            message,
            timestamp: now,
            files: stats.files,
            additions: stats.additions,
            deletions: stats.deletions,
        };

        let mut stashes = self.store.get_item(branch).stashes;
        stashes.insert(0, record.clone());
        self.store
            .update(branch, BranchMetadataUpdate::default().stashes(stashes));

        log::debug!("Created {} for '{branch}'", record.message);
        print_notice(&format!(
            "Stashed changes on '{branch}' ({})",
            change_summary(&record)
        ));
        true
    }

    /// Restore the most recent auto-stash of `branch`.
    ///
    /// Returns true when a matching stash was found and popped, with or without
    /// conflicts. Stale records are pruned along the way.
    pub fn pop_stash_for_branch(&self, branch: &str) -> bool {
        let record = match self.store.get_item(branch).stashes.first() {
            Some(record) => record.clone(),
            None => return false,
        };

        let live = match self.repo.stash_list() {
            Ok(live) => live,
            Err(e) => {
                log::warn!("Could not list stashes: {e}");
                return false;
            }
        };

        if live.is_empty() {
            log::debug!("No live stashes; clearing stash records for '{branch}'");
            self.store
                .update(branch, BranchMetadataUpdate::default().stashes(Vec::new()));
            return false;
        }

        let entry = match find_stash_by_message(&live, &record.message) {
            Some(entry) => entry,
            None => {
                log::debug!("{} is gone; pruning its record", record.message);
                self.remove_record(branch, &record.message);
                print_notice(&format!(
                    "Saved stash for '{branch}' no longer exists; removed its record"
                ));
                return false;
            }
        };

        let output = match self.repo.stash_pop(entry.index) {
            Ok(output) => output,
            Err(e) => {
                print_warning(&format!("Could not restore stash for '{branch}': {e}"));
                return false;
            }
        };

        if output.success {
            self.remove_record(branch, &record.message);
            print_notice(&format!(
                "Restored stashed changes on '{branch}' ({})",
                change_summary(&record)
            ));
            return true;
        }

        match output.failure() {
            GitFailure::Conflict => {
                self.remove_record(branch, &record.message);
                print_warning(&format!(
                    "Restoring the stash for '{branch}' produced conflicts. Resolve them, then run 'git stash drop' for the entry git kept"
                ));
                true
            }
            _ => {
                print_warning(&format!(
                    "Could not restore stash for '{branch}': {}",
                    output.error_text()
                ));
                false
            }
        }
    }

    /// Every stored record across all branches, newest first. No git calls are made, so
    /// entries may be stale until the next create/pop touches them.
    pub fn get_all_stashes_with_branch(&self) -> Vec<StashDisplay> {
        let now = Utc::now();
        let mut all: Vec<StashDisplay> = self
            .store
            .load()
            .branches
            .into_iter()
            .flat_map(|(branch, metadata)| {
                metadata.stashes.into_iter().map(move |record| StashDisplay {
                    age: relative_time(record.timestamp, now),
                    summary: change_summary(&record),
                    branch: branch.clone(),
                    record,
                })
            })
            .collect();
        all.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));
        all
    }

    /// Remove every record whose stash is no longer in `git stash list`
    pub fn prune_stale(&self) -> usize {
        let live = match self.repo.stash_list() {
            Ok(live) => live,
            Err(e) => {
                log::warn!("Could not list stashes: {e}");
                return 0;
            }
        };

        let mut metadata = self.store.load();
        let mut removed = 0;
        for record in metadata.branches.values_mut() {
            let before = record.stashes.len();
            record
                .stashes
                .retain(|stash| find_stash_by_message(&live, &stash.message).is_some());
            removed += before - record.stashes.len();
        }

        if removed > 0 {
            log::debug!("Pruned {removed} stale stash records");
            self.store.save(&metadata);
        }
        removed
    }

    /// Live stashes with the branch record that owns each one
    pub fn live_stashes(&self) -> Result<Vec<LiveStash>> {
        let live = self.repo.stash_list()?;
        let metadata = self.store.load();

        Ok(live
            .into_iter()
            .map(|entry| {
                let owner = metadata.branches.iter().find_map(|(branch, record)| {
                    record
                        .stashes
                        .iter()
                        .find(|stash| {
                            find_stash_by_message(std::slice::from_ref(&entry), &stash.message)
                                .is_some()
                        })
                        .map(|stash| (branch.clone(), stash.clone()))
                });
                LiveStash { entry, owner }
            })
            .collect())
    }

    /// `git stash pop stash@{index}`, dropping the owning record
    pub fn pop_index(&self, index: usize) -> Result<PopOutcome> {
        let entry = self.live_entry(index)?;
        let output = self.repo.stash_pop(index)?;
        let outcome = accepted_outcome(output, "Failed to pop stash")?;
        self.remove_records_for(&entry);
        Ok(outcome)
    }

    /// `git stash apply stash@{index}`; the stash and its record are kept
    pub fn apply_index(&self, index: usize) -> Result<PopOutcome> {
        self.live_entry(index)?;
        let output = self.repo.stash_apply(index)?;
        accepted_outcome(output, "Failed to apply stash")
    }

    /// `git stash drop stash@{index}`, dropping the owning record
    pub fn drop_index(&self, index: usize) -> Result<()> {
        let entry = self.live_entry(index)?;
        let output = self.repo.stash_drop(index)?;
        if !output.success {
            return Err(output.into_error("Failed to drop stash"));
        }
        self.remove_records_for(&entry);
        Ok(())
    }

    fn live_entry(&self, index: usize) -> Result<StashEntry> {
        self.repo
            .stash_list()?
            .into_iter()
            .find(|entry| entry.index == index)
            .ok_or(KunjError::StashNotFound { index })
    }

    fn remove_record(&self, branch: &str, message: &str) {
        let mut stashes = self.store.get_item(branch).stashes;
        stashes.retain(|stash| stash.message != message);
        self.store
            .update(branch, BranchMetadataUpdate::default().stashes(stashes));
    }

    fn remove_records_for(&self, entry: &StashEntry) {
        let mut metadata = self.store.load();
        let mut changed = false;
        for record in metadata.branches.values_mut() {
            let before = record.stashes.len();
            record.stashes.retain(|stash| {
                find_stash_by_message(std::slice::from_ref(entry), &stash.message).is_none()
            });
            changed |= record.stashes.len() != before;
        }
        if changed {
            self.store.save(&metadata);
        }
    }
}

fn accepted_outcome(output: crate::core::shell::CommandOutput, context: &str) -> Result<PopOutcome> {
    if output.success {
        Ok(PopOutcome::Clean)
    } else if output.failure() == GitFailure::Conflict {
        Ok(PopOutcome::Conflict)
    } else {
        Err(output.into_error(context))
    }
}

/// "3 files, +10 -2"
pub fn change_summary(record: &StashRecord) -> String {
    let noun = if record.files == 1 { "file" } else { "files" };
    format!(
        "{} {noun}, +{} -{}",
        record.files, record.additions, record.deletions
    )
}

/// Coarse human-readable age, e.g. "5 minutes ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let (value, unit) = match seconds {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 86_400 * 30 => (s / 86_400, "day"),
        s if s < 86_400 * 365 => (s / (86_400 * 30), "month"),
        s => (s / (86_400 * 365), "year"),
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}
