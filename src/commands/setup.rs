use crate::core::{
    config::{ConfigLoader, ConfigScope, KunjConfig, AI_PROVIDERS, COMMIT_STYLES},
    dirs,
    error::Result,
    git::GitRepo,
    print_info, print_section_header, print_success, print_warning, prompt,
};
use colored::*;

/// First-run setup: writes `~/.kunj/config.json`
pub fn execute_setup(defaults: bool) -> Result<()> {
    let loader = ConfigLoader::for_workdir(None);
    let config = if defaults {
        KunjConfig::default()
    } else {
        ask(loader.load())?
    };

    let path = loader.save(ConfigScope::Global, &config)?;
    print_success(&format!("Configuration saved to {}\n", path.display()));

    if let Ok(repo) = GitRepo::open_current() {
        if let Err(e) = repo.ensure_excluded(&format!("{}/", dirs::KUNJ_DIR)) {
            log::warn!("Could not exclude {} from git: {e}", dirs::KUNJ_DIR);
        }
    }

    if config.ai.enabled && std::env::var(&config.ai.api_key_env).is_err() {
        print_warning(&format!(
            "AI is enabled but {} is not set; commit messages will use the file-based fallback",
            config.ai.api_key_env
        ));
    }
    Ok(())
}

fn ask(mut config: KunjConfig) -> Result<KunjConfig> {
    print_section_header("kunj setup");

    config.preferences.auto_stash = prompt::confirm(
        "Stash uncommitted changes automatically when switching branches?",
        config.preferences.auto_stash,
    )?;
    config.preferences.personal_wip_mode = prompt::confirm(
        "Treat recently used branches as work in progress (instead of tags)?",
        config.preferences.personal_wip_mode,
    )?;

    let style = prompt::input(
        &format!("Commit style ({})", COMMIT_STYLES.join("/")),
        Some(&config.commit.style),
    )?
    .unwrap_or_else(|| config.commit.style.clone());
    if COMMIT_STYLES.contains(&style.as_str()) {
        config.commit.style = style;
    } else {
        print_warning(&format!("Unknown commit style '{style}', keeping {}", config.commit.style));
    }

    if let Some(base) = prompt::input("Default pull request base branch", Some(&config.pr.base_branch))? {
        config.pr.base_branch = base;
    }

    config.ai.enabled = prompt::confirm("Use AI to write commit messages?", config.ai.enabled)?;
    if config.ai.enabled {
        let provider = prompt::input(
            &format!("AI provider ({})", AI_PROVIDERS.join("/")),
            Some(&config.ai.provider),
        )?
        .unwrap_or_else(|| config.ai.provider.clone());
        if AI_PROVIDERS.contains(&provider.as_str()) {
            if provider != config.ai.provider {
                let (env, model) = match provider.as_str() {
                    "openai" => ("OPENAI_API_KEY", "gpt-4o"),
                    _ => ("ANTHROPIC_API_KEY", "claude-sonnet-4-5"),
                };
                config.ai.api_key_env = env.to_string();
                config.ai.model = model.to_string();
            }
            config.ai.provider = provider;
        } else {
            print_warning(&format!("Unknown provider '{provider}', keeping {}", config.ai.provider));
        }

        if let Some(env) = prompt::input("Environment variable holding the API key", Some(&config.ai.api_key_env))? {
            config.ai.api_key_env = env;
        }
    }

    print_info(&format!(
        "Change any of these later with {}",
        "kunj config --interactive --global".blue()
    ));
    Ok(config)
}
