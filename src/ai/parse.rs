//! Extraction of labelled fields from model replies.
//!
//! Replies are expected to look like:
//!
//! ```text
//! TYPE: feat
//! SCOPE: ui
//! MESSAGE: add toolbar
//! BODY: - first point
//! - second point
//! BRANCH_DESC: Toolbar for the editor
//! ```
//!
//! A field runs from its label to the next known label, so `BODY` may span lines.
//! Markdown emphasis around labels and code fences are tolerated.

use crate::core::error::{KunjError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[*_]{0,2}([A-Z_]+)[*_]{0,2}\s*:\s*[*_]{0,2}\s*(.*)$").expect("valid label regex")
});

pub const COMMIT_LABELS: [&str; 5] = ["TYPE", "SCOPE", "MESSAGE", "BODY", "BRANCH_DESC"];
pub const PR_LABELS: [&str; 2] = ["TITLE", "BODY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReply {
    pub commit_type: Option<String>,
    pub scope: Option<String>,
    pub message: String,
    pub body: Option<String>,
    pub branch_desc: Option<String>,
}

impl CommitReply {
    /// Full commit message for `style`
    pub fn to_message(&self, style: &str) -> String {
        let subject = match (&self.commit_type, &self.scope) {
            (Some(kind), Some(scope)) if style != "simple" => {
                format!("{kind}({scope}): {}", self.message)
            }
            (Some(kind), None) if style != "simple" => format!("{kind}: {}", self.message),
            _ => self.message.clone(),
        };
        match &self.body {
            Some(body) if style != "simple" => format!("{subject}\n\n{body}"),
            _ => subject,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReply {
    pub title: String,
    pub body: String,
}

/// Map of label to value for every known label present in `text`
pub fn extract_labels(text: &str, labels: &[&str]) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut current: Option<String> = None;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            continue;
        }

        let label = LABEL_LINE.captures(line).and_then(|caps| {
            let name = caps.get(1)?.as_str();
            labels
                .contains(&name)
                .then(|| (name.to_string(), caps.get(2).map_or("", |m| m.as_str())))
        });

        match label {
            Some((name, rest)) => {
                fields.insert(name.clone(), rest.trim().to_string());
                current = Some(name);
            }
            None => {
                if let Some(value) = current.as_ref().and_then(|name| fields.get_mut(name)) {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line.trim_end());
                }
            }
        }
    }

    for value in fields.values_mut() {
        *value = value.trim().to_string();
    }
    fields
}

fn optional(fields: &HashMap<String, String>, label: &str) -> Option<String> {
    fields
        .get(label)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !matches!(v.to_lowercase().as_str(), "none" | "n/a" | "-"))
        .map(String::from)
}

fn required(fields: &HashMap<String, String>, label: &str) -> Result<String> {
    optional(fields, label).ok_or_else(|| KunjError::ai_missing_label(label))
}

/// Parse a commit reply; `MESSAGE` is always required and `TYPE` in conventional style
pub fn parse_commit_reply(text: &str, style: &str) -> Result<CommitReply> {
    let fields = extract_labels(text, &COMMIT_LABELS);

    let message = required(&fields, "MESSAGE")?;
    let commit_type = if style == "conventional" {
        Some(required(&fields, "TYPE")?)
    } else {
        optional(&fields, "TYPE")
    }
    .map(|t| t.to_lowercase());

    Ok(CommitReply {
        commit_type,
        scope: optional(&fields, "SCOPE"),
        message: message.lines().next().unwrap_or_default().trim().to_string(),
        body: optional(&fields, "BODY"),
        branch_desc: optional(&fields, "BRANCH_DESC"),
    })
}

/// Parse a pull request reply; `TITLE` is required
pub fn parse_pr_reply(text: &str) -> Result<PrReply> {
    let fields = extract_labels(text, &PR_LABELS);
    Ok(PrReply {
        title: required(&fields, "TITLE")?,
        body: optional(&fields, "BODY").unwrap_or_default(),
    })
}
