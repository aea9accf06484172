//! `starter config`: read and write configuration values.
//!
//! Keys are dotted paths into [`AppConfig`], e.g. `archive.chunk_size`.
//! `set` edits only the file; environment overrides still apply on load.

use std::fs;
use std::path::Path;

use serde_json::Value as Json;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let path = global.config.clone().unwrap_or_else(AppConfig::active_path);

    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&get_config_value(config, &key)?)?;
        }

        ConfigCommands::Set { key, value } => {
            set_config_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised = toml::to_string_pretty(config).map_err(|e| config_error(
                format!("Failed to serialise config: {e}"),
                Some(Box::new(e)),
            ))?;
            output.data(&serialised)?;
        }

        ConfigCommands::Path => {
            output.data(&path.display().to_string())?;
        }
    }

    Ok(())
}

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let tree = serde_json::to_value(config)
        .map_err(|e| config_error(format!("Failed to serialise config: {e}"), Some(Box::new(e))))?;
    match lookup(&tree, key) {
        Some(Json::String(s)) => Ok(s.clone()),
        Some(Json::Null) => Ok(String::new()),
        Some(section @ Json::Object(_)) => serde_json::to_string_pretty(section)
            .map_err(|e| config_error(e.to_string(), Some(Box::new(e)))),
        Some(other) => Ok(other.to_string()),
        None => Err(unknown_key(key)),
    }
}

/// Write `key = value` into the file at `path`, typed after the default.
fn set_config_value(path: &Path, key: &str, value: &str) -> CliResult<()> {
    let defaults = serde_json::to_value(AppConfig::default())
        .map_err(|e| config_error(e.to_string(), Some(Box::new(e))))?;
    let typed = match lookup(&defaults, key) {
        None | Some(Json::Object(_)) => return Err(unknown_key(key)),
        Some(Json::Bool(_)) => toml::Value::Boolean(value.parse().map_err(|_| {
            config_error(format!("'{key}' expects true or false, got '{value}'"), None)
        })?),
        Some(Json::Number(_)) => toml::Value::Integer(value.parse().map_err(|_| {
            config_error(format!("'{key}' expects a number, got '{value}'"), None)
        })?),
        Some(_) => toml::Value::String(value.to_string()),
    };

    let mut table = if path.exists() {
        fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?
            .parse::<toml::Table>()
            .map_err(|e| config_error(
                format!("'{}' is not valid TOML: {e}", path.display()),
                Some(Box::new(e)),
            ))?
    } else {
        toml::Table::new()
    };
    insert_dotted(&mut table, key, typed)?;

    let text = toml::to_string_pretty(&table)
        .map_err(|e| config_error(e.to_string(), Some(Box::new(e))))?;
    let updated: AppConfig = toml::from_str(&text)
        .map_err(|e| config_error(format!("Invalid value for '{key}': {e}"), Some(Box::new(e))))?;
    updated
        .validate()
        .with_cli_context(|| format!("Rejected value for '{key}'"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    fs::write(path, text).with_cli_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

fn lookup<'a>(tree: &'a Json, key: &str) -> Option<&'a Json> {
    key.split('.').try_fold(tree, |node, part| node.get(part))
}

fn insert_dotted(table: &mut toml::Table, key: &str, value: toml::Value) -> CliResult<()> {
    let mut parts: Vec<&str> = key.split('.').collect();
    let leaf = parts.pop().unwrap_or(key);
    let mut node = table;
    for part in parts {
        node = match node
            .entry(part)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        {
            toml::Value::Table(inner) => inner,
            _ => return Err(config_error(format!("'{part}' is not a table"), None)),
        };
    }
    node.insert(leaf.to_string(), value);
    Ok(())
}

fn unknown_key(key: &str) -> CliError {
    config_error(format!("Unknown config key: '{key}'"), None)
}

fn config_error(
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
) -> CliError {
    CliError::ConfigError { message, source }
}
