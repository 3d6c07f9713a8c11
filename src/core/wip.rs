//! Work-in-progress classification.
//!
//! [`is_wip`] is a pure function of the branch's metadata and the user's preferences,
//! used by `list --wip` and the standup summary.

use crate::core::{config::Preferences, metadata::BranchMetadata};
use chrono::{DateTime, Duration, Utc};

/// Whether `branch` counts as work in progress.
///
/// Personal mode: the current branch, a branch switched to within `recentDays`, or one
/// holding a stash younger than `stashAgeDays`.
///
/// Tag mode: untagged branches are WIP; a done tag wins over a WIP tag; otherwise WIP
/// only when a WIP tag is present. Tag matching ignores case.
pub fn is_wip(
    branch: &str,
    metadata: &BranchMetadata,
    preferences: &Preferences,
    current_branch: &str,
    now: DateTime<Utc>,
) -> bool {
    if preferences.personal_wip_mode {
        if branch == current_branch {
            return true;
        }

        let recent_cutoff = now - Duration::days(i64::from(preferences.recent_days));
        if metadata
            .last_switched
            .is_some_and(|switched| switched >= recent_cutoff)
        {
            return true;
        }

        let stash_cutoff = now - Duration::days(i64::from(preferences.stash_age_days));
        return metadata
            .stashes
            .iter()
            .any(|stash| stash.timestamp >= stash_cutoff);
    }

    if metadata.tags.is_empty() {
        return true;
    }

    let has_tag = |candidates: &[String]| {
        metadata
            .tags
            .iter()
            .any(|tag| candidates.iter().any(|c| c.eq_ignore_ascii_case(tag)))
    };

    if has_tag(&preferences.done_tags) {
        return false;
    }
    has_tag(&preferences.wip_tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::StashRecord;

    fn personal() -> Preferences {
        Preferences::default()
    }

    fn tag_mode() -> Preferences {
        Preferences {
            personal_wip_mode: false,
            ..Preferences::default()
        }
    }

    fn tagged(tags: &[&str]) -> BranchMetadata {
        BranchMetadata {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_personal_current_branch_always_wip() {
        let now = Utc::now();
        let old = BranchMetadata {
            last_switched: Some(now - Duration::days(400)),
            tags: vec!["done".into()],
            ..Default::default()
        };
        assert!(is_wip("main", &old, &personal(), "main", now));
    }

    #[test]
    fn test_personal_recent_switch() {
        let now = Utc::now();
        let recent = BranchMetadata {
            last_switched: Some(now - Duration::days(2)),
            ..Default::default()
        };
        let stale = BranchMetadata {
            last_switched: Some(now - Duration::days(30)),
            ..Default::default()
        };
        assert!(is_wip("b", &recent, &personal(), "main", now));
        assert!(!is_wip("b", &stale, &personal(), "main", now));
    }

    #[test]
    fn test_personal_recent_stash() {
        let now = Utc::now();
        let metadata = BranchMetadata {
            stashes: vec![StashRecord {
                reference: "stash@{0}".into(),
                message: "kunj-auto-stash-b-1".into(),
                timestamp: now - Duration::days(10),
                files: 1,
                additions: 1,
                deletions: 0,
            }],
            ..Default::default()
        };
        assert!(is_wip("b", &metadata, &personal(), "main", now));

        let strict = Preferences {
            stash_age_days: 5,
            ..personal()
        };
        assert!(!is_wip("b", &metadata, &strict, "main", now));
    }

    #[test]
    fn test_personal_no_metadata_is_not_wip() {
        assert!(!is_wip("b", &BranchMetadata::default(), &personal(), "main", Utc::now()));
    }

    #[test]
    fn test_tag_mode_untagged_is_wip() {
        assert!(is_wip("b", &BranchMetadata::default(), &tag_mode(), "main", Utc::now()));
    }

    #[test]
    fn test_tag_mode_done_beats_wip() {
        assert!(!is_wip("b", &tagged(&["done", "wip"]), &tag_mode(), "main", Utc::now()));
    }

    #[test]
    fn test_tag_mode_case_insensitive() {
        let now = Utc::now();
        assert!(is_wip("b", &tagged(&["WIP"]), &tag_mode(), "main", now));
        assert!(!is_wip("b", &tagged(&["Merged"]), &tag_mode(), "main", now));
    }

    #[test]
    fn test_tag_mode_unrelated_tags_not_wip() {
        assert!(!is_wip("b", &tagged(&["ui", "backend"]), &tag_mode(), "main", Utc::now()));
    }

    #[test]
    fn test_tag_mode_ignores_current_branch() {
        assert!(!is_wip("main", &tagged(&["done"]), &tag_mode(), "main", Utc::now()));
    }
}
