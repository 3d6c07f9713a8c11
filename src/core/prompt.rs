//! Line-based interactive prompts.
//!
//! Each prompt has a `*_with` form generic over the reader and writer, and a
//! convenience wrapper bound to stdin/stdout. End of input counts as the default answer.

use crate::core::error::Result;
use colored::*;
use std::io::{self, BufRead, Write};

/// Answer to a yes/no/edit question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
    Edit,
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// `question [y/N]` (or `[Y/n]` when `default` is true)
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    write!(output, "{} ", format!("{question} {hint}:").blue())?;
    output.flush()?;

    Ok(match read_answer(input)?.map(|a| a.to_lowercase()) {
        Some(answer) if answer == "y" || answer == "yes" => true,
        Some(answer) if answer == "n" || answer == "no" => false,
        _ => default,
    })
}

pub fn confirm(question: &str, default: bool) -> Result<bool> {
    confirm_with(&mut io::stdin().lock(), &mut io::stdout(), question, default)
}

/// `question [Y/n/e]`; anything unrecognised is `Yes`
pub fn choose_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Choice> {
    write!(output, "{} ", format!("{question} [Y/n/e]:").blue())?;
    output.flush()?;

    Ok(match read_answer(input)?.map(|a| a.to_lowercase()).as_deref() {
        Some("n") | Some("no") => Choice::No,
        Some("e") | Some("edit") => Choice::Edit,
        _ => Choice::Yes,
    })
}

pub fn choose(question: &str) -> Result<Choice> {
    choose_with(&mut io::stdin().lock(), &mut io::stdout(), question)
}

/// Free-text answer; empty input returns `default`
pub fn input_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: Option<&str>,
) -> Result<Option<String>> {
    match default {
        Some(default) => write!(
            output,
            "{} {} ",
            question.blue(),
            format!("({default}):").bright_black()
        )?,
        None => write!(output, "{} ", format!("{question}:").blue())?,
    }
    output.flush()?;

    Ok(match read_answer(input)? {
        Some(answer) if !answer.is_empty() => Some(answer),
        _ => default.map(String::from),
    })
}

pub fn input(question: &str, default: Option<&str>) -> Result<Option<String>> {
    input_with(&mut io::stdin().lock(), &mut io::stdout(), question, default)
}

/// Numbered menu; returns the chosen index, or `None` on empty/invalid input
pub fn select_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    items: &[String],
) -> Result<Option<usize>> {
    for (i, item) in items.iter().enumerate() {
        writeln!(
            output,
            "{}{}{} {}",
            "[".bright_black(),
            (i + 1).to_string().white(),
            "]".bright_black(),
            item
        )?;
    }
    write!(output, "\n{} ", format!("{question}:").blue())?;
    output.flush()?;

    let answer = match read_answer(input)? {
        Some(answer) => answer,
        None => return Ok(None),
    };
    Ok(answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=items.len()).contains(n))
        .map(|n| n - 1))
}

pub fn select(question: &str, items: &[String]) -> Result<Option<usize>> {
    select_with(&mut io::stdin().lock(), &mut io::stdout(), question, items)
}
