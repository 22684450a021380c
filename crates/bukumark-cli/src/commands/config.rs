//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use bukumark_core::config::parse_workers;
use bukumark_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "db_path": config.db_path,
                    "browser": config.browser,
                    "workers": config.workers,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.db_path.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  db_path:  {}", config.db_path.display());
            println!(
                "  browser:  {}",
                config.browser.as_deref().unwrap_or("(system opener)")
            );
            println!(
                "  workers:  {}",
                config
                    .workers
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| format!("(auto: {})", config.store_options().workers))
            );
            println!(
                "  log_file: {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a single `key = value` change
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let unset = value.is_empty() || value == "none";
    match key {
        "db_path" => {
            if unset {
                bail!("db_path cannot be empty");
            }
            config.db_path = value.into();
        }
        "browser" => {
            config.browser = if unset { None } else { Some(value.to_string()) };
        }
        "workers" => {
            config.workers = if unset {
                None
            } else {
                Some(parse_workers(value).context("Invalid value for workers")?)
            };
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: db_path, browser, workers, log_file",
                key
            );
        }
    }
    Ok(())
}
