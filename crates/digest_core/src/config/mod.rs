use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "AGENT_DIGEST_CONFIG_PATH";
const ENV_FILE_VAR: &str = "AGENT_DIGEST_ENV_FILE";
const DEFAULT_ENV_FILE: &str = "config.env";

/// Environment variable names and the config keys they set.
const ENV_KEYS: &[(&str, &str)] = &[
    ("RELEVANCE_REGION", "region"),
    ("RELEVANCE_PROJECT", "project"),
    ("RELEVANCE_API_KEY", "api_key"),
    ("SUBURB_AGENT_ID", "suburb_agent_id"),
    ("OUTREACH_AGENT_ID", "outreach_agent_id"),
    ("AGENT_DIGEST_SNAPSHOT_PATH", "snapshot_path"),
    ("AGENT_DIGEST_MAX_RESULTS", "max_results"),
    ("AGENT_DIGEST_DEFAULT_HOURS", "default_hours"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: String,
    pub project: String,
    pub api_key: String,
    pub suburb_agent_id: String,
    pub outreach_agent_id: String,
    pub suburb_agent_name: String,
    pub outreach_agent_name: String,
    pub default_hours: u32,
    pub max_results: usize,
    pub email_action_label: String,
    pub call_action_label: String,
    pub note_folder: String,
    pub note_title: String,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: String::new(),
            project: String::new(),
            api_key: String::new(),
            suburb_agent_id: String::new(),
            outreach_agent_id: String::new(),
            suburb_agent_name: "Suburbs".to_string(),
            outreach_agent_name: "Businesses".to_string(),
            default_hours: 24,
            max_results: 200,
            email_action_label: "Send Outlook email".to_string(),
            call_action_label: "Call Business via Bland AI".to_string(),
            note_folder: "Building".to_string(),
            note_title: "Daily Report".to_string(),
            snapshot_path: None,
        }
    }
}

impl Config {
    /// Checks that a live API run has everything it needs. A snapshot
    /// source only needs the agent ids.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut required = vec![
            ("suburb_agent_id", &self.suburb_agent_id),
            ("outreach_agent_id", &self.outreach_agent_id),
        ];
        if self.snapshot_path.is_none() {
            required.extend([
                ("region", &self.region),
                ("project", &self.project),
                ("api_key", &self.api_key),
            ]);
        }

        let missing: Vec<&str> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| key)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(format!(
                "missing configuration: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: Vec<AppError>,
}

/// `KEY=VALUE` settings given on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub settings: Vec<(String, String)>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("agent_digest")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("agent_digest")
            .join(CONFIG_FILE_NAME))
    }
}

fn env_file_path() -> PathBuf {
    match std::env::var(ENV_FILE_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_ENV_FILE),
    }
}

/// Defaults, then the JSON config file, then the env file, then the
/// process environment. Problems are collected as warnings and the
/// affected layer is skipped.
pub fn load_config_with_fallback() -> ConfigLoad {
    let env: HashMap<String, String> = std::env::vars().collect();
    let mut warnings = Vec::new();

    let file_path = match config_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warnings.push(err);
            None
        }
    };

    let mut load = load_layers(file_path.as_deref(), &env_file_path(), &env);
    warnings.append(&mut load.warnings);
    load.warnings = warnings;
    load
}

fn load_layers(
    file_path: Option<&Path>,
    env_file: &Path,
    env: &HashMap<String, String>,
) -> ConfigLoad {
    let mut warnings = Vec::new();

    let mut config = match file_path {
        Some(path) if path.exists() => match load_config_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                warnings.push(err);
                Config::default()
            }
        },
        _ => Config::default(),
    };

    if env_file.exists() {
        match read_env_file(env_file) {
            Ok(pairs) => apply_env_pairs(&mut config, &pairs, &mut warnings),
            Err(err) => warnings.push(err),
        }
    }

    apply_env_pairs(&mut config, env, &mut warnings);

    ConfigLoad { config, warnings }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    Ok(parse_env_lines(&content))
}

fn parse_env_lines(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"');
            (key.trim().to_string(), value.to_string())
        })
        .collect()
}

fn apply_env_pairs(
    config: &mut Config,
    pairs: &HashMap<String, String>,
    warnings: &mut Vec<AppError>,
) {
    for (env_name, key) in ENV_KEYS {
        if let Some(value) = pairs.get(*env_name)
            && !value.trim().is_empty()
            && let Err(err) = apply_setting(config, key, value)
        {
            warnings.push(AppError::invalid_input(format!("{env_name}: {}", err.message())));
        }
    }
}

/// Sets one field by name. Names are matched case-insensitively with
/// dashes, dots and spaces treated as underscores.
pub fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), AppError> {
    let canonical = canonical_key(key)
        .ok_or_else(|| AppError::invalid_input("config key cannot be empty"))?;
    let value = value.trim();

    match canonical.as_str() {
        "region" => config.region = value.to_string(),
        "project" => config.project = value.to_string(),
        "api_key" => config.api_key = value.to_string(),
        "suburb_agent_id" => config.suburb_agent_id = value.to_string(),
        "outreach_agent_id" => config.outreach_agent_id = value.to_string(),
        "suburb_agent_name" => config.suburb_agent_name = value.to_string(),
        "outreach_agent_name" => config.outreach_agent_name = value.to_string(),
        "email_action_label" => config.email_action_label = value.to_string(),
        "call_action_label" => config.call_action_label = value.to_string(),
        "note_folder" => config.note_folder = value.to_string(),
        "note_title" => config.note_title = value.to_string(),
        "snapshot_path" => {
            config.snapshot_path = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }
        "default_hours" => config.default_hours = parse_positive(&canonical, value)?,
        "max_results" => config.max_results = parse_positive(&canonical, value)?,
        other => {
            return Err(AppError::invalid_input(format!(
                "unknown config field '{other}'"
            )));
        }
    }

    Ok(())
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(AppError::invalid_input(format!(
            "{key} must be a positive integer"
        ))),
    }
}

pub fn canonical_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Result<Config, AppError> {
    let mut merged = base.clone();
    for (key, value) in overrides.settings.iter() {
        apply_setting(&mut merged, key, value)?;
    }
    Ok(merged)
}
