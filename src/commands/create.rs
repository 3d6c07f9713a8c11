use crate::commands::branch_meta::normalize_tags;
use crate::commands::switch::{leave_branch, restore_after_failure};
use crate::core::{
    command_init::CommandContext,
    error::{KunjError, Result},
    metadata::BranchMetadataUpdate,
    print_success,
};
use chrono::Utc;

#[derive(Debug, Default)]
pub struct CreateOptions {
    pub name: String,
    pub from: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub no_stash: bool,
}

pub fn execute_create(options: CreateOptions) -> Result<()> {
    let ctx = CommandContext::init()?;
    create_branch(&ctx, &options)
}

/// Create `options.name` and switch to it, stashing work on the branch being left
pub(crate) fn create_branch(ctx: &CommandContext, options: &CreateOptions) -> Result<()> {
    let name = options.name.trim();
    if ctx.repo.branch_exists(name) {
        return Err(KunjError::branch_already_exists(name));
    }

    let current = ctx.current_branch()?;
    let stashed = leave_branch(ctx, &current, ctx.auto_stash(options.no_stash));

    if let Err(e) = ctx.repo.create_branch(name, options.from.as_deref()) {
        restore_after_failure(ctx, &current, stashed);
        return Err(e);
    }

    let mut update = BranchMetadataUpdate::default().last_switched(Utc::now());
    if let Some(description) = options.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            update = update.description(Some(description.to_string()));
        }
    }
    let tags = normalize_tags(options.tags.iter().cloned());
    if !tags.is_empty() {
        update = update.tags(tags);
    }
    ctx.store.update(name, update);

    match &options.from {
        Some(base) => print_success(&format!("Created branch '{name}' from '{base}'\n")),
        None => print_success(&format!("Created branch '{name}'\n")),
    }
    Ok(())
}
