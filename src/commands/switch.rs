use crate::commands::create::{create_branch, CreateOptions};
use crate::core::{
    command_init::CommandContext,
    error::{KunjError, Result},
    metadata::BranchMetadataUpdate,
    print_info, print_notice, print_section_header, print_success, prompt,
};
use chrono::Utc;
use colored::*;

pub fn execute_switch(branch: Option<String>, create: bool, no_stash: bool) -> Result<()> {
    let ctx = CommandContext::init()?;

    let target = match branch {
        Some(branch) => branch,
        None => match choose_branch(&ctx)? {
            Some(branch) => branch,
            None => return Ok(()),
        },
    };

    let current = ctx.current_branch()?;
    if target == current {
        return Err(KunjError::AlreadyOnBranch { name: target });
    }

    if !ctx.repo.branch_exists(&target) && !exists_on_remote(&ctx, &target) {
        if create {
            return create_branch(
                &ctx,
                &CreateOptions {
                    name: target,
                    no_stash,
                    ..Default::default()
                },
            );
        }
        return Err(KunjError::branch_not_found(target));
    }

    let auto_stash = ctx.auto_stash(no_stash);
    let stashed = leave_branch(&ctx, &current, auto_stash);

    if let Err(e) = ctx.repo.checkout_branch(&target) {
        restore_after_failure(&ctx, &current, stashed);
        return Err(e);
    }

    let metadata = ctx.store.update(
        &target,
        BranchMetadataUpdate::default().last_switched(Utc::now()),
    );

    if auto_stash {
        ctx.reconciler().pop_stash_for_branch(&target);
    }

    print_success(&format!("Switched to branch '{target}'"));
    if let Some(description) = &metadata.description {
        println!("   {}", description.bright_black());
    }
    if let Some(notes) = &metadata.notes {
        println!("   {} {}", "Note:".blue(), notes.white());
    }
    println!();
    Ok(())
}

fn exists_on_remote(ctx: &CommandContext, branch: &str) -> bool {
    ctx.repo
        .remote_branches()
        .map(|remotes| {
            remotes
                .iter()
                .any(|r| r.split_once('/').is_some_and(|(_, name)| name == branch))
        })
        .unwrap_or(false)
}

/// Numbered menu of local branches other than the current one
fn choose_branch(ctx: &CommandContext) -> Result<Option<String>> {
    let current = ctx.current_branch()?;
    let branches: Vec<String> = ctx
        .repo
        .local_branches()?
        .into_iter()
        .filter(|b| *b != current)
        .collect();

    if branches.is_empty() {
        print_info("No other branches to switch to");
        return Ok(None);
    }

    let metadata = ctx.store.load();
    let items: Vec<String> = branches
        .iter()
        .map(|name| {
            match metadata
                .branches
                .get(name)
                .and_then(|m| m.description.as_deref())
            {
                Some(description) => format!("{}  {}", name.blue(), description.bright_black()),
                None => name.blue().to_string(),
            }
        })
        .collect();

    print_section_header("Switch to branch");
    let choice = prompt::select("Branch number", &items)?;
    if choice.is_none() {
        print_info("No branch selected");
    }
    Ok(choice.map(|i| branches[i].clone()))
}

/// Stash uncommitted work on `current` before leaving it; returns whether a stash was made
pub(crate) fn leave_branch(ctx: &CommandContext, current: &str, auto_stash: bool) -> bool {
    if !auto_stash {
        return false;
    }
    ctx.reconciler().create_stash(current)
}

/// Put a stash taken by [`leave_branch`] back when the switch itself failed
pub(crate) fn restore_after_failure(ctx: &CommandContext, current: &str, stashed: bool) {
    if stashed {
        log::debug!("Switch failed; restoring stash on '{current}'");
        if ctx.reconciler().pop_stash_for_branch(current) {
            print_notice(&format!("Your changes on '{current}' were restored"));
        }
    }
}
