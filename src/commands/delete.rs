use crate::core::{
    command_init::CommandContext,
    error::{KunjError, Result},
    print_success, print_warning,
};

pub fn execute_delete(branch: String, force: bool) -> Result<()> {
    let ctx = CommandContext::init()?;
    if ctx.current_branch()? == branch {
        return Err(KunjError::CannotDeleteCurrentBranch { name: branch });
    }

    ctx.repo.delete_branch(&branch, force)?;

    let leftover = ctx.store.get_item(&branch).stashes.len();
    ctx.store.remove(&branch);

    print_success(&format!("Deleted branch '{branch}'\n"));
    if leftover > 0 {
        print_warning(&format!(
            "{leftover} auto-stash(es) from '{branch}' are still in 'git stash list'"
        ));
    }
    Ok(())
}

pub fn execute_rename(old: String, new: String) -> Result<()> {
    let ctx = CommandContext::init()?;
    if !ctx.repo.branch_exists(&old) {
        return Err(KunjError::branch_not_found(old));
    }

    ctx.repo.rename_branch(&old, &new)?;
    if ctx.store.rename(&old, &new) {
        log::debug!("Moved metadata from '{old}' to '{new}'");
    }

    print_success(&format!("Renamed branch '{old}' to '{new}'\n"));
    Ok(())
}
