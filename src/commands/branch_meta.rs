//! `branch-note`, `branch-tag` and `branch-desc`.
//!
//! Each command reads the value when given no arguments, replaces it when given text,
//! and removes it with `--clear`. The branch defaults to the current one.

use crate::core::{
    colors::format_tags,
    command_init::CommandContext,
    error::{KunjError, Result},
    metadata::BranchMetadataUpdate,
    print_error_with_structured_usage, print_info, print_success,
};
use colored::*;

/// Trimmed, non-empty, de-duplicated tags in first-seen order
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').to_string();
        if !tag.is_empty() && !result.contains(&tag) {
            result.push(tag);
        }
    }
    result
}

/// Which free-text field a command edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Note,
    Description,
}

impl TextField {
    fn label(self) -> &'static str {
        match self {
            TextField::Note => "Note",
            TextField::Description => "Description",
        }
    }

    fn command(self) -> &'static str {
        match self {
            TextField::Note => "branch-note",
            TextField::Description => "branch-desc",
        }
    }
}

pub fn execute_branch_text(
    field: TextField,
    text: Vec<String>,
    branch: Option<String>,
    clear: bool,
) -> Result<()> {
    let ctx = CommandContext::init()?;
    let branch = ctx.resolve_branch(branch.as_deref())?;
    let text = text.join(" ").trim().to_string();

    if clear && !text.is_empty() {
        let set_usage = format!("kunj {} <text>", field.command());
        let clear_usage = format!("kunj {} --clear", field.command());
        print_error_with_structured_usage(
            "Cannot set and clear at the same time",
            &[&set_usage, &clear_usage],
            &[("--branch <name>", "Target another branch")],
        );
        return Err(KunjError::UsageReported);
    }

    if clear {
        let update = match field {
            TextField::Note => BranchMetadataUpdate::default().notes(None),
            TextField::Description => BranchMetadataUpdate::default().description(None),
        };
        ctx.store.update(&branch, update);
        print_success(&format!("{} cleared for '{branch}'\n", field.label()));
        return Ok(());
    }

    if text.is_empty() {
        let metadata = ctx.store.get_item(&branch);
        let value = match field {
            TextField::Note => metadata.notes,
            TextField::Description => metadata.description,
        };
        match value {
            Some(value) => {
                println!("\n{} {}", format!("{}:", branch).blue(), value.white());
                println!();
            }
            None => print_info(&format!(
                "No {} for '{branch}'",
                field.label().to_lowercase()
            )),
        }
        return Ok(());
    }

    let update = match field {
        TextField::Note => BranchMetadataUpdate::default().notes(Some(text)),
        TextField::Description => BranchMetadataUpdate::default().description(Some(text)),
    };
    ctx.store.update(&branch, update);
    print_success(&format!("{} saved for '{branch}'\n", field.label()));
    Ok(())
}

pub fn execute_branch_tag(
    tags: Vec<String>,
    branch: Option<String>,
    remove: bool,
    clear: bool,
) -> Result<()> {
    let ctx = CommandContext::init()?;
    let branch = ctx.resolve_branch(branch.as_deref())?;
    let tags = normalize_tags(tags);
    let existing = ctx.store.get_item(&branch).tags;

    if clear {
        ctx.store
            .update(&branch, BranchMetadataUpdate::default().tags(Vec::new()));
        print_success(&format!("Tags cleared for '{branch}'\n"));
        return Ok(());
    }

    if tags.is_empty() {
        if remove {
            print_error_with_structured_usage(
                "No tags given to remove",
                &["kunj branch-tag --remove <tag>..."],
                &[("--branch <name>", "Target another branch")],
            );
            return Err(KunjError::UsageReported);
        }
        if existing.is_empty() {
            print_info(&format!("No tags for '{branch}'"));
        } else {
            println!("\n{} {}\n", format!("{branch}:").blue(), format_tags(&existing));
        }
        return Ok(());
    }

    let updated = if remove {
        existing
            .into_iter()
            .filter(|t| !tags.iter().any(|r| r.eq_ignore_ascii_case(t)))
            .collect()
    } else {
        normalize_tags(existing.into_iter().chain(tags))
    };

    let saved = ctx
        .store
        .update(&branch, BranchMetadataUpdate::default().tags(updated))
        .tags;
    if saved.is_empty() {
        print_success(&format!("'{branch}' has no tags\n"));
    } else {
        print_success(&format!("Tags for '{branch}': {}\n", format_tags(&saved)));
    }
    Ok(())
}
