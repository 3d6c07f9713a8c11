use crate::ai::{AiContext, PrInput, Source};
use crate::core::{
    command_init::CommandContext,
    error::{KunjError, Result},
    github::{GhCli, PullRequest},
    print_error_with_structured_usage, print_info, print_notice, print_section_header,
    print_success, prompt,
};
use colored::*;

#[derive(Debug, Default)]
pub struct PrOptions {
    pub title: Option<String>,
    pub body: Option<String>,
    pub base: Option<String>,
    pub draft: bool,
    pub status: bool,
    pub list: bool,
}

pub fn execute_pr(options: PrOptions) -> Result<()> {
    let ctx = CommandContext::init()?;
    let gh = GhCli::new(ctx.repo.workdir());
    gh.ensure_ready()?;

    if options.status {
        return show_status(&ctx, &gh);
    }
    if options.list {
        return list_prs(&gh);
    }
    create_pr(&ctx, &gh, options)
}

fn create_pr(ctx: &CommandContext, gh: &GhCli, options: PrOptions) -> Result<()> {
    let branch = ctx.current_branch()?;
    let base = options
        .base
        .unwrap_or_else(|| ctx.config.pr.base_branch.clone());

    if branch == base {
        print_error_with_structured_usage(
            &format!("Cannot open a pull request from '{base}' into itself"),
            &["kunj switch <feature-branch>", "kunj pr --base <branch>"],
            &[("--base <branch>", "Branch to merge into")],
        );
        return Err(KunjError::UsageReported);
    }

    let (title, body) = match (options.title, options.body) {
        (Some(title), Some(body)) => (title, body),
        (title, body) => {
            let ai = AiContext::from_config(&ctx.config);
            let commits = ctx.repo.commits_since(&base)?;
            let diff = ctx.repo.diff_against(&base, ai.max_diff_chars())?;
            if ai.is_available() {
                print_notice("Generating pull request description...");
            }
            let generated = ai.pull_request(&PrInput {
                branch: &branch,
                base: &base,
                commits: &commits,
                diff: &diff,
            });
            if generated.source == Source::Heuristic {
                log::debug!("Pull request text built from branch name and commits");
            }
            (
                title.unwrap_or(generated.title),
                body.unwrap_or(generated.body),
            )
        }
    };

    let draft = options.draft || ctx.config.pr.draft;

    print_section_header("Pull request");
    println!("   {} {}", "Title:".blue(), title.white());
    println!("   {} {} -> {}", "Branch:".blue(), branch.white(), base.white());
    if draft {
        println!("   {} {}", "Draft:".blue(), "yes".white());
    }
    println!();
    for line in body.lines() {
        println!("   {}", line.bright_black());
    }
    println!();

    if !prompt::confirm("Create this pull request?", true)? {
        print_info("Pull request not created");
        return Ok(());
    }

    ctx.repo.push_branch(&branch)?;
    let url = gh.create_pr(&title, &body, &base, draft)?;
    print_success(&format!("Pull request created: {}\n", url.blue()));
    Ok(())
}

fn show_status(ctx: &CommandContext, gh: &GhCli) -> Result<()> {
    let branch = ctx.current_branch()?;
    match gh.view_pr()? {
        Some(pr) => {
            print_section_header(&format!("Pull request for '{branch}'"));
            print_pr(&pr);
            if let Some(decision) = pr.review_decision.as_deref().filter(|d| !d.is_empty()) {
                println!("      {} {}", "Review:".blue(), decision.white());
            }
        }
        None => print_info(&format!("No pull request for '{branch}'")),
    }

    let runs = gh.list_runs(&branch)?;
    if !runs.is_empty() {
        print_section_header("Checks");
        for run in runs {
            let outcome = match run.outcome() {
                "success" => run.outcome().green(),
                "failure" | "cancelled" | "timed_out" => run.outcome().red(),
                other => other.yellow(),
            };
            println!("   {}  {}", outcome, run.name.white());
        }
    }
    println!();
    Ok(())
}

fn list_prs(gh: &GhCli) -> Result<()> {
    let prs = gh.list_prs()?;
    if prs.is_empty() {
        print_info("No open pull requests");
        return Ok(());
    }
    print_section_header("Open pull requests");
    for pr in &prs {
        print_pr(pr);
    }
    println!();
    Ok(())
}

fn print_pr(pr: &PullRequest) {
    let draft = if pr.is_draft { " (draft)" } else { "" };
    println!(
        "   {} {}{}  {}",
        format!("#{}", pr.number).blue(),
        pr.title.white(),
        draft.bright_black(),
        pr.state.to_lowercase().bright_black()
    );
    println!("      {}", pr.url.bright_black());
}
