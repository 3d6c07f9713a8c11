//! Prompt templates for commit messages and pull request descriptions.
//!
//! Templates use `{placeholder}` syntax and are rendered in a single pass; unknown
//! placeholders are kept verbatim so that literal braces in a template survive.
//!
//! # Public API
//! - [`Templates`] / [`TEMPLATES`]: the prompt text per commit style plus the PR prompt
//! - [`PromptContext`]: values substituted into a template
//! - [`render_template`]: the renderer
//! - [`commit_prompt`] / [`pr_prompt`]: pick and render the right template

use std::fmt::Write;

pub struct Templates {
    pub commit_conventional: &'static str,
    pub commit_simple: &'static str,
    pub commit_detailed: &'static str,
    pub pull_request: &'static str,
}

pub static TEMPLATES: Templates = Templates {
    commit_conventional: "You are writing a git commit message in the Conventional Commits format.

Branch: {branch}
Changed files:
{files}

Diff:
{diff}
{instructions}
Reply with exactly these labelled fields and nothing else:
TYPE: one of feat, fix, docs, style, refactor, perf, test, build, ci, chore
SCOPE: a short scope, or none
MESSAGE: imperative summary under 72 characters, lowercase, no trailing period
BODY: optional longer explanation, or none
BRANCH_DESC: one sentence describing the overall goal of this branch
",
    commit_simple: "You are writing a short git commit message.

Branch: {branch}
Changed files:
{files}

Diff:
{diff}
{instructions}
Reply with exactly these labelled fields and nothing else:
MESSAGE: one imperative sentence under 72 characters
BRANCH_DESC: one sentence describing the overall goal of this branch
",
    commit_detailed: "You are writing a detailed git commit message.

Branch: {branch}
Changed files:
{files}

Diff:
{diff}
{instructions}
Reply with exactly these labelled fields and nothing else:
TYPE: one of feat, fix, docs, style, refactor, perf, test, build, ci, chore
SCOPE: a short scope, or none
MESSAGE: imperative summary under 72 characters
BODY: a few bullet points explaining what changed and why
BRANCH_DESC: one sentence describing the overall goal of this branch
",
    pull_request: "You are writing a GitHub pull request description.

Branch: {branch}
Base: {base}
Commits:
{commits}

Diff:
{diff}
{instructions}
Reply with exactly these labelled fields and nothing else:
TITLE: concise pull request title under 72 characters
BODY: markdown description with a short summary and a list of changes
",
};

#[derive(Debug, Default)]
pub struct PromptContext<'a> {
    pub branch: Option<&'a str>,
    pub base: Option<&'a str>,
    pub files: Option<&'a str>,
    pub commits: Option<&'a str>,
    pub diff: Option<&'a str>,
    pub custom_instructions: Option<&'a str>,
}

/// Render `template` with values from `context`
pub fn render_template(template: &str, context: &PromptContext) -> String {
    let estimated_capacity = template.len()
        + context.files.map_or(0, str::len)
        + context.commits.map_or(0, str::len)
        + context.diff.map_or(0, str::len)
        + 128;
    let mut output = String::with_capacity(estimated_capacity);
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '{' {
            output.push(ch);
            continue;
        }

        let mut placeholder = String::new();
        let mut found_closing = false;
        while let Some(&next_ch) = chars.peek() {
            chars.next();
            if next_ch == '}' {
                found_closing = true;
                break;
            }
            placeholder.push(next_ch);
        }

        if !found_closing {
            output.push(ch);
            output.push_str(&placeholder);
            continue;
        }

        let value = match placeholder.as_str() {
            "branch" => Some(context.branch.unwrap_or("(unknown)")),
            "base" => Some(context.base.unwrap_or("main")),
            "files" => Some(context.files.unwrap_or("(none)")),
            "commits" => Some(context.commits.unwrap_or("(none)")),
            "diff" => Some(context.diff.unwrap_or("(empty)")),
            "instructions" => None,
            _ => {
                let _ = write!(output, "{{{placeholder}}}");
                continue;
            }
        };

        match value {
            Some(value) => output.push_str(value),
            None => {
                if let Some(extra) = context.custom_instructions.filter(|s| !s.trim().is_empty()) {
                    let _ = write!(output, "\nAdditional instructions: {}\n", extra.trim());
                }
            }
        }
    }

    output
}

/// Template for a commit style; unknown styles use the conventional template
pub fn commit_template(style: &str) -> &'static str {
    match style {
        "simple" => TEMPLATES.commit_simple,
        "detailed" => TEMPLATES.commit_detailed,
        _ => TEMPLATES.commit_conventional,
    }
}

pub fn commit_prompt(style: &str, context: &PromptContext) -> String {
    render_template(commit_template(style), context)
}

pub fn pr_prompt(context: &PromptContext) -> String {
    render_template(TEMPLATES.pull_request, context)
}
