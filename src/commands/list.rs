use crate::core::{
    colors::format_tags,
    command_init::CommandContext,
    error::Result,
    metadata::BranchMetadata,
    print_info, print_section_header,
    stash::relative_time,
    wip::is_wip,
};
use chrono::Utc;
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    /// Local branches
    #[default]
    Local,
    /// Branches the WIP classifier accepts
    Wip,
    /// Branches with any stored metadata
    Configured,
    /// Local and remote branches
    All,
}

pub fn execute_list(filter: ListFilter) -> Result<()> {
    let ctx = CommandContext::init()?;
    let current = ctx.current_branch()?;
    let metadata = ctx.store.load();
    let now = Utc::now();

    let local = ctx.repo.local_branches()?;
    let metadata_for = |name: &str| metadata.branches.get(name).cloned().unwrap_or_default();

    let selected: Vec<(String, BranchMetadata)> = local
        .iter()
        .map(|name| (name.clone(), metadata_for(name)))
        .filter(|(name, meta)| match filter {
            ListFilter::Local | ListFilter::All => true,
            ListFilter::Wip => is_wip(name, meta, &ctx.config.preferences, &current, now),
            ListFilter::Configured => !meta.is_empty(),
        })
        .collect();

    let header = match filter {
        ListFilter::Local | ListFilter::All => "Local Branches",
        ListFilter::Wip => "Work in Progress",
        ListFilter::Configured => "Branches with Metadata",
    };

    if selected.is_empty() {
        let message = match filter {
            ListFilter::Wip => "No work-in-progress branches",
            ListFilter::Configured => "No branches have metadata yet. Try 'kunj branch-desc <text>'",
            _ => "No branches found. Make your first commit to create one.",
        };
        print_info(message);
    } else {
        print_section_header(header);
        for (name, meta) in &selected {
            print_branch_line(name, meta, name == &current, now);
        }
        println!();
    }

    if filter == ListFilter::All {
        let remotes = ctx.repo.remote_branches()?;
        if !remotes.is_empty() {
            print_section_header("Remote Branches");
            for remote in remotes {
                println!("    {}", remote.bright_black());
            }
            println!();
        }
    }

    Ok(())
}

fn print_branch_line(name: &str, meta: &BranchMetadata, is_current: bool, now: chrono::DateTime<Utc>) {
    let marker = if is_current {
        format!("{}{}{}", "[".bright_black(), "*".white(), "]".bright_black())
    } else {
        "   ".to_string()
    };

    let mut line = format!("{marker} {}", name.blue());
    if !meta.tags.is_empty() {
        line.push_str(&format!("  {}", format_tags(&meta.tags)));
    }
    if !meta.stashes.is_empty() {
        let noun = if meta.stashes.len() == 1 { "stash" } else { "stashes" };
        line.push_str(&format!(
            "  {}",
            format!("({} {noun})", meta.stashes.len()).yellow()
        ));
    }
    if let Some(switched) = meta.last_switched {
        line.push_str(&format!("  {}", relative_time(switched, now).bright_black()));
    }
    println!("{line}");

    if let Some(description) = &meta.description {
        println!("      {}", description.white());
    }
}
