use crate::core::{
    config::{ConfigLoader, ConfigScope},
    error::{KunjError, Result},
    git::GitRepo,
    print_error_with_structured_usage, print_info, print_section_header, print_success, prompt,
};
use colored::*;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// `[key, value]`
    pub set: Option<Vec<String>>,
    pub get: Option<String>,
    pub list: bool,
    pub interactive: bool,
    pub global: bool,
}

pub fn execute_config(options: ConfigOptions) -> Result<()> {
    let repo = GitRepo::open_current().ok();
    let loader = ConfigLoader::for_workdir(repo.as_ref().map(|r| r.workdir()));
    let scope = if options.global || repo.is_none() {
        ConfigScope::Global
    } else {
        ConfigScope::Local
    };

    if let Some(pair) = options.set {
        let [key, raw] = pair.as_slice() else {
            print_error_with_structured_usage(
                "--set takes a key and a value",
                &["kunj config --set <key> <value>"],
                &[("--global", "Write ~/.kunj/config.json instead of the repository config")],
            );
            return Err(KunjError::UsageReported);
        };
        let value = loader.set(scope, key, raw)?;
        print_success(&format!(
            "Set {} = {} ({})\n",
            key,
            display_value(&value),
            scope_name(scope)
        ));
        return Ok(());
    }

    if let Some(key) = options.get {
        let value = loader.get(&key)?;
        println!("{}", display_value(&value));
        return Ok(());
    }

    if options.interactive {
        return edit_interactively(&loader, scope);
    }

    print_config(&loader);
    Ok(())
}

fn scope_name(scope: ConfigScope) -> &'static str {
    match scope {
        ConfigScope::Global => "global",
        ConfigScope::Local => "local",
    }
}

/// Scalars without JSON quoting, arrays as comma-separated lists
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(unset)".to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn print_config(loader: &ConfigLoader) {
    let mut section = String::new();
    for (key, value) in loader.list() {
        let (group, name) = key.split_once('.').unwrap_or(("", key.as_str()));
        if group != section {
            print_section_header(group);
            section = group.to_string();
        }
        println!("   {} {}", format!("{name}:").blue(), display_value(&value).white());
    }
    println!();
}

fn edit_interactively(loader: &ConfigLoader, scope: ConfigScope) -> Result<()> {
    print_section_header(&format!(
        "Editing {} configuration (press Enter to keep a value)",
        scope_name(scope)
    ));

    let mut changed = 0;
    for (key, value) in loader.list() {
        let current = display_value(&value);
        let Some(answer) = prompt::input(&key, Some(&current))? else {
            continue;
        };
        if answer != current {
            loader.set(scope, &key, &answer)?;
            changed += 1;
        }
    }

    if changed == 0 {
        print_info("No changes");
    } else {
        print_success(&format!("Updated {changed} setting(s)\n"));
    }
    Ok(())
}
