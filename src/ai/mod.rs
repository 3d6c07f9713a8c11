//! AI-assisted commit messages and pull request descriptions.
//!
//! An [`AiContext`] is built once per command from the loaded configuration and owns the
//! provider client for that invocation. Every generation path falls back to the rules in
//! [`heuristic`] when AI is disabled, misconfigured, unreachable or replies in an
//! unexpected shape, so callers always get usable text.
//!
//! # Public API
//! - [`TextGenerator`]: a hosted model, prompt in, text out
//! - [`AiContext`]: per-invocation generator plus commit/PR settings
//! - [`GeneratedCommit`] / [`GeneratedPr`]: results tagged with their [`Source`]

pub mod client;
pub mod heuristic;
pub mod parse;
pub mod prompt;

use crate::core::{
    config::KunjConfig,
    error::{KunjError, Result},
    git_status::FileChange,
};
use client::{AnthropicGenerator, OpenAiGenerator};
use prompt::PromptContext;

pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Where a piece of generated text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Ai,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCommit {
    pub message: String,
    pub branch_desc: Option<String>,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPr {
    pub title: String,
    pub body: String,
    pub source: Source,
}

pub struct CommitInput<'a> {
    pub branch: &'a str,
    pub files: &'a [FileChange],
    pub diff: &'a str,
}

pub struct PrInput<'a> {
    pub branch: &'a str,
    pub base: &'a str,
    pub commits: &'a [String],
    pub diff: &'a str,
}

pub struct AiContext {
    generator: Option<Box<dyn TextGenerator>>,
    unavailable_reason: Option<String>,
    style: String,
    custom_instructions: Option<String>,
    max_diff_chars: usize,
}

impl AiContext {
    /// Build the provider client described by `config`, if AI is enabled and a key is set
    pub fn from_config(config: &KunjConfig) -> Self {
        let (generator, unavailable_reason) = match build_generator(config) {
            Ok(generator) => (Some(generator), None),
            Err(e) => {
                log::debug!("{e}");
                (None, Some(e.to_string()))
            }
        };
        Self {
            generator,
            unavailable_reason,
            style: config.commit.style.clone(),
            custom_instructions: config.commit.custom_instructions.clone(),
            max_diff_chars: config.ai.max_diff_chars,
        }
    }

    /// Context that always uses the heuristic
    pub fn disabled(config: &KunjConfig, reason: &str) -> Self {
        Self {
            generator: None,
            unavailable_reason: Some(reason.to_string()),
            ..Self::from_parts(config)
        }
    }

    pub fn with_generator(config: &KunjConfig, generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            ..Self::from_parts(config)
        }
    }

    fn from_parts(config: &KunjConfig) -> Self {
        Self {
            generator: None,
            unavailable_reason: None,
            style: config.commit.style.clone(),
            custom_instructions: config.commit.custom_instructions.clone(),
            max_diff_chars: config.ai.max_diff_chars,
        }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }

    pub fn max_diff_chars(&self) -> usize {
        self.max_diff_chars
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn commit_message(&self, input: &CommitInput) -> GeneratedCommit {
        if let Some(generator) = &self.generator {
            let files = format_files(input.files);
            let context = PromptContext {
                branch: Some(input.branch),
                files: Some(&files),
                diff: Some(input.diff),
                custom_instructions: self.custom_instructions.as_deref(),
                ..Default::default()
            };
            let prompt = prompt::commit_prompt(&self.style, &context);

            match generator
                .generate(&prompt)
                .and_then(|reply| parse::parse_commit_reply(&reply, &self.style))
            {
                Ok(reply) => {
                    return GeneratedCommit {
                        message: reply.to_message(&self.style),
                        branch_desc: reply.branch_desc,
                        source: Source::Ai,
                    }
                }
                Err(e) => log::warn!("AI commit message failed, using heuristic: {e}"),
            }
        }

        let reply = heuristic::heuristic_commit(input.files);
        GeneratedCommit {
            message: reply.to_message(&self.style),
            branch_desc: None,
            source: Source::Heuristic,
        }
    }

    pub fn pull_request(&self, input: &PrInput) -> GeneratedPr {
        if let Some(generator) = &self.generator {
            let commits = input.commits.join("\n");
            let context = PromptContext {
                branch: Some(input.branch),
                base: Some(input.base),
                commits: Some(&commits),
                diff: Some(input.diff),
                custom_instructions: self.custom_instructions.as_deref(),
                ..Default::default()
            };

            match generator
                .generate(&prompt::pr_prompt(&context))
                .and_then(|reply| parse::parse_pr_reply(&reply))
            {
                Ok(reply) => {
                    return GeneratedPr {
                        title: reply.title,
                        body: reply.body,
                        source: Source::Ai,
                    }
                }
                Err(e) => log::warn!("AI pull request description failed, using heuristic: {e}"),
            }
        }

        let reply = heuristic::heuristic_pr(input.branch, input.commits);
        GeneratedPr {
            title: reply.title,
            body: reply.body,
            source: Source::Heuristic,
        }
    }
}

fn build_generator(config: &KunjConfig) -> Result<Box<dyn TextGenerator>> {
    let ai = &config.ai;
    if !ai.enabled {
        return Err(KunjError::ai_unavailable(
            "disabled (enable with 'kunj config --set ai.enabled true')",
        ));
    }

    let api_key = std::env::var(&ai.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| KunjError::ai_unavailable(format!("{} is not set", ai.api_key_env)))?;

    match ai.provider.as_str() {
        "anthropic" => Ok(Box::new(AnthropicGenerator::new(api_key, &ai.model)?)),
        "openai" => Ok(Box::new(OpenAiGenerator::new(api_key, &ai.model)?)),
        other => Err(KunjError::ai_unavailable(format!("unknown provider '{other}'"))),
    }
}

fn format_files(files: &[FileChange]) -> String {
    files
        .iter()
        .map(|f| format!("{} {}", f.status.as_str(), f.path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
