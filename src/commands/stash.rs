use crate::core::{
    command_init::CommandContext,
    error::Result,
    print_info, print_section_header, print_success, print_warning,
    stash::{relative_time, change_summary, PopOutcome},
};
use chrono::Utc;
use colored::*;

/// What `kunj stash` should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StashAction {
    /// Stash the current branch's changes
    Save,
    List,
    /// Pop a given index, or the current branch's latest auto-stash
    Pop(Option<usize>),
    Apply(usize),
    Drop(usize),
}

pub fn execute_stash(action: StashAction) -> Result<()> {
    let ctx = CommandContext::init()?;
    let reconciler = ctx.reconciler();

    match action {
        StashAction::Save => {
            let branch = ctx.current_branch()?;
            if !reconciler.create_stash(&branch) {
                print_info("No changes to stash");
            } else {
                println!();
            }
        }
        StashAction::List => {
            let pruned = reconciler.prune_stale();
            if pruned > 0 {
                log::info!("Removed {pruned} records of stashes that no longer exist");
            }
            let live = reconciler.live_stashes()?;
            if live.is_empty() {
                print_info("No stashes");
                return Ok(());
            }

            print_section_header("Stashes");
            let now = Utc::now();
            for stash in &live {
                let index = format!(
                    "{}{}{}",
                    "[".bright_black(),
                    stash.entry.index.to_string().white(),
                    "]".bright_black()
                );
                match &stash.owner {
                    Some((branch, record)) => println!(
                        "{index} {}  {}  {}",
                        branch.blue(),
                        change_summary(record).white(),
                        relative_time(record.timestamp, now).bright_black()
                    ),
                    None => println!("{index} {}", stash.entry.line.bright_black()),
                }
            }
            println!();
        }
        StashAction::Pop(None) => {
            let branch = ctx.current_branch()?;
            if reconciler.pop_stash_for_branch(&branch) {
                println!();
            } else if ctx.store.get_item(&branch).stashes.is_empty() {
                print_info(&format!("No saved stash for '{branch}'"));
            } else {
                print_info(&format!(
                    "The stash for '{branch}' is still saved; run 'kunj stash --pop' again once the working tree allows it"
                ));
            }
        }
        StashAction::Pop(Some(index)) => match reconciler.pop_index(index)? {
            PopOutcome::Clean => print_success(&format!("Popped stash@{{{index}}}\n")),
            PopOutcome::Conflict => print_warning(&format!(
                "stash@{{{index}}} applied with conflicts; git kept the stash entry"
            )),
        },
        StashAction::Apply(index) => match reconciler.apply_index(index)? {
            PopOutcome::Clean => print_success(&format!("Applied stash@{{{index}}}\n")),
            PopOutcome::Conflict => {
                print_warning(&format!("stash@{{{index}}} applied with conflicts"))
            }
        },
        StashAction::Drop(index) => {
            reconciler.drop_index(index)?;
            print_success(&format!("Dropped stash@{{{index}}}\n"));
        }
    }

    Ok(())
}
