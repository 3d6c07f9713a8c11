use crate::ai::{AiContext, CommitInput, Source};
use crate::core::{
    colors::format_file_change,
    command_init::CommandContext,
    error::{KunjError, Result},
    metadata::BranchMetadataUpdate,
    print_info, print_notice, print_section_header, print_success, print_warning,
    prompt::{self, Choice},
    worklog::{WorkLog, WorkLogEntry},
};
use chrono::Local;
use colored::*;

#[derive(Debug, Default)]
pub struct CommitOptions {
    pub all: bool,
    pub message: Option<String>,
    pub yes: bool,
    pub no_ai: bool,
}

pub fn execute_commit(options: CommitOptions) -> Result<()> {
    install_interrupt_handler();

    let ctx = CommandContext::init()?;
    if options.all {
        ctx.repo.stage_all()?;
    }

    let staged = ctx.repo.staged_files()?;
    if staged.is_empty() {
        return Err(KunjError::NoStagedChanges);
    }
    let branch = ctx.current_branch()?;

    print_section_header("Staged changes");
    for change in &staged {
        println!("{}", format_file_change(change));
    }
    println!();

    let (message, branch_desc) = match options.message {
        Some(message) if !message.trim().is_empty() => (message, None),
        Some(_) => {
            print_warning("Ignoring empty --message");
            match generate_message(&ctx, &options, &branch, &staged)? {
                Some(generated) => generated,
                None => return Ok(()),
            }
        }
        None => match generate_message(&ctx, &options, &branch, &staged)? {
            Some(generated) => generated,
            None => return Ok(()),
        },
    };

    let hash = ctx.repo.commit(&message)?;
    let subject = message.lines().next().unwrap_or_default().to_string();
    print_success(&format!("Committed {} on '{branch}'", hash.blue()));
    println!("   {}\n", subject.white());

    if ctx.config.commit.work_log {
        let now = Local::now();
        let entry = WorkLogEntry {
            time: now.format("%H:%M").to_string(),
            branch: branch.clone(),
            message: subject,
            hash: Some(hash),
        };
        if let Err(e) = WorkLog::for_repo(&ctx.repo).append(now.date_naive(), &entry) {
            log::warn!("Could not update work log: {e}");
        }
    }

    if let Some(description) = branch_desc {
        if ctx.store.get_item(&branch).description.is_none() {
            ctx.store.update(
                &branch,
                BranchMetadataUpdate::default().description(Some(description.clone())),
            );
            print_notice(&format!("Branch description set: {description}"));
        }
    }

    Ok(())
}

/// Generated message plus suggested branch description; `None` when the user declined
fn generate_message(
    ctx: &CommandContext,
    options: &CommitOptions,
    branch: &str,
    staged: &[crate::core::git_status::FileChange],
) -> Result<Option<(String, Option<String>)>> {
    let ai = if options.no_ai {
        AiContext::disabled(&ctx.config, "--no-ai")
    } else {
        AiContext::from_config(&ctx.config)
    };

    let diff = ctx.repo.staged_diff(ai.max_diff_chars())?;
    if ai.is_available() {
        print_notice("Generating commit message...");
    }
    let generated = ai.commit_message(&CommitInput {
        branch,
        files: staged,
        diff: &diff,
    });

    if generated.source == Source::Heuristic && ai.is_available() {
        print_warning("AI generation failed; using a message based on the changed files");
    }

    print_section_header("Commit message");
    for line in generated.message.lines() {
        println!("   {}", line.white());
    }
    println!();

    if options.yes {
        return Ok(Some((generated.message, generated.branch_desc)));
    }

    match prompt::choose("Use this message?")? {
        Choice::Yes => Ok(Some((generated.message, generated.branch_desc))),
        Choice::No => {
            print_info("Commit cancelled");
            Ok(None)
        }
        Choice::Edit => match prompt::input("Commit message", None)? {
            Some(edited) if !edited.trim().is_empty() => Ok(Some((edited, generated.branch_desc))),
            _ => {
                print_info("Commit cancelled");
                Ok(None)
            }
        },
    }
}

/// Ctrl-C during a commit prints a notice and exits cleanly
fn install_interrupt_handler() {
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\n\n{}\n", "Commit cancelled".white());
        std::process::exit(0);
    }) {
        log::debug!("Could not install Ctrl-C handler: {e}");
    }
}
