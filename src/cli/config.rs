//! `aura-gemini config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! aura-gemini config                          # Show config file
//! aura-gemini config tools.python             # Get value
//! aura-gemini config tools.python python3.12  # Set value
//! aura-gemini config --global query.limit 10  # Set in ~/.aura-gemini
//! aura-gemini config --init                   # Write defaults
//! aura-gemini config --path
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use toml_edit::DocumentMut;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., tools.aura_bin, query.limit)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Write a config file with default values
    #[arg(long)]
    pub init: bool,

    /// Show config file paths
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.aura-gemini/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if global {
        Config::global_config_path().unwrap_or_else(Config::local_config_path)
    } else {
        Config::find_local_config().unwrap_or_else(Config::local_config_path)
    }
}

pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> Result<i32> {
    let config_path = get_config_path(args.global, explicit);

    if args.path {
        if let Some(global) = Config::global_config_path() {
            println!("Global: {}", global.display());
        }
        println!("Local:  {}", Config::local_config_path().display());
        println!();
        if config_path.exists() {
            println!("{} Active: {}", "✓".green(), config_path.display());
        } else {
            println!(
                "{} No config file found at {}",
                "⚠".yellow(),
                config_path.display()
            );
        }
        return Ok(0);
    }

    if args.init {
        if config_path.exists() {
            bail!("Config already exists at {}", config_path.display());
        }
        Config::default().save_to(&config_path)?;
        println!("✅ Wrote default config to {}", config_path.display());
        return Ok(0);
    }

    let Some(key) = &args.key else {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            println!("📋 Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("📋 No config file at {}", config_path.display());
            println!();
            println!("Create one with:");
            println!("  aura-gemini config --init");
            println!("  aura-gemini config tools.python python3");
        }
        return Ok(0);
    };

    match &args.value {
        Some(value) => {
            set_config_value(&config_path, key, value)?;
            println!("✅ Set {} = {} (in {})", key, value, config_path.display());
        }
        None => match get_config_value(&config_path, key)? {
            Some(v) => println!("{}", v),
            None => println!("(not set)"),
        },
    }

    Ok(0)
}

/// Set a `section.key` value, keeping the rest of the file as written
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    let (section, field) = split_key(key)?;

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    if doc.get(section).is_none() {
        doc[section] = toml_edit::table();
    }
    doc[section][field] = toml_edit::value(parse_toml_value(val));

    // The edited file must still load.
    toml::from_str::<Config>(&doc.to_string())
        .with_context(|| format!("Invalid value for {}: {}", key, val))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;
    tracing::info!(key, path = %path.display(), "config updated");
    Ok(())
}

/// Get a `section.key` value as written in the file
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    let (section, field) = split_key(key)?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Table = toml::from_str(&content).context("Failed to parse config.toml")?;

    Ok(doc
        .get(section)
        .and_then(|t| t.get(field))
        .map(|v| match v {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('.') {
        Some((section, field)) if !section.is_empty() && !field.is_empty() && !field.contains('.') => {
            Ok((section, field))
        }
        _ => bail!("Invalid key: {}. Use section.key (e.g. tools.python)", key),
    }
}

/// Parse string value to the matching TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if let Ok(b) = s.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.into();
    }
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(".aura-gemini").join("config.toml");

        set_config_value(&path, "query.limit", "8")?;
        set_config_value(&path, "tools.python", "/opt/py/bin/python")?;

        assert_eq!(get_config_value(&path, "query.limit")?.as_deref(), Some("8"));
        assert_eq!(
            get_config_value(&path, "tools.python")?.as_deref(),
            Some("/opt/py/bin/python")
        );
        assert_eq!(get_config_value(&path, "query.preview_chars")?, None);

        let config = Config::load_from(&path)?;
        assert_eq!(config.query.limit, 8);
        assert_eq!(config.query.preview_chars, 300);
        Ok(())
    }

    #[test]
    fn test_set_preserves_comments() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "# local overrides\n[tools]\naura_bin = \"aura\"\n")?;

        set_config_value(&path, "tools.aura_bin", "/usr/local/bin/aura")?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("# local overrides"));
        assert!(content.contains("/usr/local/bin/aura"));
        Ok(())
    }

    #[test]
    fn test_rejects_wrong_type() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");

        assert!(set_config_value(&path, "query.limit", "many").is_err());
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("tools.python").unwrap(), ("tools", "python"));
        assert!(split_key("python").is_err());
        assert!(split_key("a.b.c").is_err());
        assert!(split_key(".b").is_err());
    }

    #[test]
    fn test_parse_toml_value() {
        assert_eq!(parse_toml_value("true").as_bool(), Some(true));
        assert_eq!(parse_toml_value("12").as_integer(), Some(12));
        assert_eq!(parse_toml_value("python3").as_str(), Some("python3"));
    }
}
