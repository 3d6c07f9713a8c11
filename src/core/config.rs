//! Layered configuration.
//!
//! Configuration is read from three layers, later layers winning key by key:
//! built-in defaults, `~/.kunj/config.json`, then `<repo>/.kunj/config.json`.
//! Objects are merged recursively; any other value replaces the one beneath it.

use crate::core::{
    dirs,
    error::{KunjError, Result},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub auto_stash: bool,
    #[serde(rename = "personalWIPMode")]
    pub personal_wip_mode: bool,
    pub recent_days: u32,
    pub stash_age_days: u32,
    pub wip_tags: Vec<String>,
    pub done_tags: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_stash: true,
            personal_wip_mode: true,
            recent_days: 7,
            stash_age_days: 14,
            wip_tags: vec!["wip".into(), "in-progress".into(), "draft".into()],
            done_tags: vec![
                "done".into(),
                "merged".into(),
                "completed".into(),
                "shipped".into(),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    pub enabled: bool,
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    pub max_diff_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            max_diff_chars: 12_000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitConfig {
    pub style: String,
    pub custom_instructions: Option<String>,
    pub work_log: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            style: "conventional".to_string(),
            custom_instructions: None,
            work_log: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PrConfig {
    pub base_branch: String,
    pub draft: bool,
}

impl Default for PrConfig {
    fn default() -> Self {
        Self {
            base_branch: "main".to_string(),
            draft: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct KunjConfig {
    pub preferences: Preferences,
    pub ai: AiConfig,
    pub commit: CommitConfig,
    pub pr: PrConfig,
}

pub const COMMIT_STYLES: [&str; 3] = ["conventional", "simple", "detailed"];
pub const AI_PROVIDERS: [&str; 2] = ["anthropic", "openai"];

/// Which file a `config --set` writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
    Local,
}

/// Resolves and merges the config layers
pub struct ConfigLoader {
    global_path: Option<PathBuf>,
    local_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(global_path: Option<PathBuf>, local_path: Option<PathBuf>) -> Self {
        Self {
            global_path,
            local_path,
        }
    }

    /// Loader for the repository at `workdir` (if any) and the user's home directory
    pub fn for_workdir(workdir: Option<&Path>) -> Self {
        let global_path = dirs::get_global_config_path()
            .map_err(|e| log::warn!("Global config unavailable: {e}"))
            .ok();
        let local_path = workdir.map(dirs::get_local_config_path);
        Self::new(global_path, local_path)
    }

    pub fn path_for(&self, scope: ConfigScope) -> Option<&Path> {
        match scope {
            ConfigScope::Global => self.global_path.as_deref(),
            ConfigScope::Local => self.local_path.as_deref(),
        }
    }

    fn require_path(&self, scope: ConfigScope) -> Result<PathBuf> {
        match (scope, self.path_for(scope)) {
            (_, Some(path)) => Ok(path.to_path_buf()),
            (ConfigScope::Global, None) => Err(KunjError::HomeDirectoryNotFound),
            (ConfigScope::Local, None) => Err(KunjError::NotInGitRepo),
        }
    }

    /// Merged JSON value of all layers
    pub fn load_value(&self) -> Value {
        let mut merged = default_value();
        for path in [&self.global_path, &self.local_path].into_iter().flatten() {
            if let Some(layer) = read_layer(path) {
                merge_values(&mut merged, layer);
            }
        }
        merged
    }

    pub fn load(&self) -> KunjConfig {
        match serde_json::from_value(self.load_value()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration, falling back to defaults: {e}");
                KunjConfig::default()
            }
        }
    }

    /// Value at a dotted key, e.g. `preferences.recentDays`
    pub fn get(&self, key: &str) -> Result<Value> {
        if lookup(&default_value(), key).is_none() {
            return Err(KunjError::invalid_config_key(key));
        }
        Ok(lookup(&self.load_value(), key).cloned().unwrap_or(Value::Null))
    }

    /// Every leaf key with its effective value, sorted by key
    pub fn list(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        flatten("", &self.load_value(), &mut entries);
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Set a dotted key in the given scope, coercing `raw` to the key's type
    pub fn set(&self, scope: ConfigScope, key: &str, raw: &str) -> Result<Value> {
        let template = lookup(&default_value(), key)
            .cloned()
            .ok_or_else(|| KunjError::invalid_config_key(key))?;
        let value = coerce(key, raw, &template)?;
        validate_choice(key, &value)?;

        let path = self.require_path(scope)?;

        let mut layer = read_layer(&path).unwrap_or_else(|| Value::Object(Map::new()));
        insert(&mut layer, key, value.clone());

        let mut merged = self.load_value();
        merge_values(&mut merged, layer.clone());
        serde_json::from_value::<KunjConfig>(merged)
            .map_err(|e| KunjError::invalid_config_value(key, raw, e.to_string()))?;

        write_layer(&path, &layer)?;
        log::debug!("Set {key} = {value} in {}", path.display());
        Ok(value)
    }

    /// Replace the file for `scope` with a full config
    pub fn save(&self, scope: ConfigScope, config: &KunjConfig) -> Result<PathBuf> {
        let path = self.require_path(scope)?;
        write_layer(&path, &serde_json::to_value(config)?)?;
        Ok(path)
    }
}

pub fn default_value() -> Value {
    serde_json::to_value(KunjConfig::default()).unwrap_or(Value::Null)
}

fn read_layer(path: &Path) -> Option<Value> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&content) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            log::warn!("Ignoring config '{}': not a JSON object", path.display());
            None
        }
        Err(e) => {
            log::warn!("{}", KunjError::config_parse_failed(path, e));
            None
        }
    }
}

fn write_layer(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| KunjError::write_failed(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| KunjError::write_failed(path, e))
}

/// Recursively merge `overlay` into `base`
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_object()?.get(part))
}

fn insert(value: &mut Value, key: &str, new_value: Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    let Value::Object(map) = value else {
        return;
    };
    match key.split_once('.') {
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            insert(child, rest, new_value);
        }
        None => {
            map.insert(key.to_string(), new_value);
        }
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), leaf.clone())),
    }
}

fn coerce(key: &str, raw: &str, template: &Value) -> Result<Value> {
    let trimmed = raw.trim();
    match template {
        Value::Bool(_) => match trimmed.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(KunjError::invalid_config_value(key, raw, "expected true or false")),
        },
        Value::Number(_) => trimmed
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| KunjError::invalid_config_value(key, raw, "expected a non-negative number")),
        Value::Array(_) => {
            if trimmed.starts_with('[') {
                let parsed: Vec<String> = serde_json::from_str(trimmed).map_err(|e| {
                    KunjError::invalid_config_value(key, raw, e.to_string())
                })?;
                Ok(Value::from(parsed))
            } else {
                let items: Vec<Value> = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Value::from)
                    .collect();
                Ok(Value::Array(items))
            }
        }
        Value::Null => {
            if trimmed.is_empty() || trimmed == "null" {
                Ok(Value::Null)
            } else {
                Ok(Value::from(raw))
            }
        }
        _ => Ok(Value::from(raw)),
    }
}

fn validate_choice(key: &str, value: &Value) -> Result<()> {
    let (choices, label): (&[&str], &str) = match key {
        "commit.style" => (&COMMIT_STYLES, "commit style"),
        "ai.provider" => (&AI_PROVIDERS, "AI provider"),
        _ => return Ok(()),
    };
    let text = value.as_str().unwrap_or_default();
    if choices.contains(&text) {
        Ok(())
    } else {
        Err(KunjError::invalid_config_value(
            key,
            text,
            format!("unknown {label}, expected one of: {}", choices.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn loader(temp: &TempDir) -> ConfigLoader {
        ConfigLoader::new(
            Some(temp.path().join("home/.kunj/config.json")),
            Some(temp.path().join("repo/.kunj/config.json")),
        )
    }

    fn write(path: &Path, value: Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, value.to_string()).unwrap();
    }

    #[test]
    fn test_defaults_without_files() {
        let temp = TempDir::new().unwrap();
        assert_eq!(loader(&temp).load(), KunjConfig::default());
    }

    #[test]
    fn test_on_disk_keys_are_camel_case() {
        let value = default_value();
        assert_eq!(value["preferences"]["personalWIPMode"], json!(true));
        assert_eq!(value["preferences"]["stashAgeDays"], json!(14));
        assert_eq!(value["ai"]["apiKeyEnv"], json!("ANTHROPIC_API_KEY"));
        assert!(value["commit"]["customInstructions"].is_null());
    }

    #[test]
    fn test_local_overrides_global_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);
        write(
            loader.path_for(ConfigScope::Global).unwrap(),
            json!({"preferences": {"recentDays": 3, "autoStash": false}, "commit": {"style": "simple"}}),
        );
        write(
            loader.path_for(ConfigScope::Local).unwrap(),
            json!({"preferences": {"recentDays": 10}}),
        );

        let config = loader.load();
        assert_eq!(config.preferences.recent_days, 10);
        assert!(!config.preferences.auto_stash);
        assert_eq!(config.commit.style, "simple");
        assert_eq!(config.preferences.stash_age_days, 14);
    }

    #[test]
    fn test_corrupt_layer_is_ignored() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);
        let local = loader.path_for(ConfigScope::Local).unwrap();
        fs::create_dir_all(local.parent().unwrap()).unwrap();
        fs::write(local, "{ nope").unwrap();
        assert_eq!(loader.load(), KunjConfig::default());
    }

    #[test]
    fn test_merge_values_replaces_arrays() {
        let mut base = json!({"a": {"list": [1, 2], "keep": true}});
        merge_values(&mut base, json!({"a": {"list": [3]}}));
        assert_eq!(base, json!({"a": {"list": [3], "keep": true}}));
    }

    #[test]
    fn test_set_coerces_types() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);

        loader.set(ConfigScope::Local, "preferences.recentDays", "3").unwrap();
        loader.set(ConfigScope::Local, "preferences.personalWIPMode", "false").unwrap();
        loader.set(ConfigScope::Local, "preferences.wipTags", "wip, doing").unwrap();
        loader.set(ConfigScope::Local, "commit.customInstructions", "Use past tense").unwrap();

        let config = loader.load();
        assert_eq!(config.preferences.recent_days, 3);
        assert!(!config.preferences.personal_wip_mode);
        assert_eq!(config.preferences.wip_tags, vec!["wip", "doing"]);
        assert_eq!(config.commit.custom_instructions.as_deref(), Some("Use past tense"));
    }

    #[test]
    fn test_set_global_does_not_touch_local() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);
        loader.set(ConfigScope::Global, "ai.enabled", "true").unwrap();
        assert!(loader.load().ai.enabled);
        assert!(!loader.path_for(ConfigScope::Local).unwrap().exists());
    }

    #[test]
    fn test_set_rejects_unknown_key_and_bad_values() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);
        assert!(matches!(
            loader.set(ConfigScope::Local, "preferences.nope", "1"),
            Err(KunjError::InvalidConfigKey { .. })
        ));
        assert!(matches!(
            loader.set(ConfigScope::Local, "preferences.recentDays", "soon"),
            Err(KunjError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            loader.set(ConfigScope::Local, "commit.style", "poetic"),
            Err(KunjError::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_get_and_list() {
        let temp = TempDir::new().unwrap();
        let loader = loader(&temp);
        assert_eq!(loader.get("pr.baseBranch").unwrap(), json!("main"));
        assert!(loader.get("pr.nope").is_err());

        let keys: Vec<String> = loader.list().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"preferences.autoStash".to_string()));
        assert!(keys.contains(&"commit.customInstructions".to_string()));
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    }
}
