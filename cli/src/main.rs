mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use fenn_core::Preferences;
use fenn_core::types::{AppConfig, Config};
use fenn_layout::{Element, FormLayout, Layout, Size};
use fenn_theme::{ColorName, Variant};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FENN_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.data_dir {
        Some(base_path) => Config { base_path },
        None => Config::for_app(&cli.app)?,
    };
    debug!(path = %config.base_path.display(), "using data directory");

    match cli.command {
        Commands::Get { key } => get(&config, &key),
        Commands::Set { key, value } => set(&config, &key, &value),
        Commands::Remove { key } => remove(&config, &key),
        Commands::List => list(&config),
        Commands::Color { name, variant } => color(&config, &name, variant),
        Commands::Form {
            rows,
            text_labels,
            width,
        } => form(&config, &rows, text_labels, width),
    }
}

fn load_app_config(config: &Config) -> Result<AppConfig> {
    let app_config = AppConfig::load(&config.config_path())
        .with_context(|| format!("failed to read {}", config.config_path().display()))?;
    Ok(app_config.with_defaults_for_invalid())
}

fn open_preferences(config: &Config) -> Result<Preferences> {
    let app_config = load_app_config(config)?;
    Preferences::from_config(config, &app_config)
        .with_context(|| format!("failed to open {}", config.preferences_path().display()))
}

fn get(config: &Config, key: &str) -> Result<()> {
    let prefs = open_preferences(config)?;
    let Some(value) = prefs.get(key) else {
        bail!("no value stored under '{key}'");
    };
    println!("{value}");
    Ok(())
}

fn set(config: &Config, key: &str, raw: &str) -> Result<()> {
    let prefs = open_preferences(config)?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    prefs.set(key, value)?;
    Ok(())
}

fn remove(config: &Config, key: &str) -> Result<()> {
    let prefs = open_preferences(config)?;
    if prefs.remove(key).is_none() {
        bail!("no value stored under '{key}'");
    }
    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let prefs = open_preferences(config)?;
    prefs.read_values(|values| {
        for (key, value) in values {
            println!("{key} = {value}");
        }
    });
    Ok(())
}

fn color(config: &Config, name: &ColorName, variant: Option<Variant>) -> Result<()> {
    let mut theme = load_app_config(config)?.theme_context();
    if let Some(variant) = variant {
        theme = theme.with_variant(variant);
    }
    println!("{}", theme.color(name));
    Ok(())
}

fn form(
    config: &Config,
    rows: &[(Size, Size)],
    text_labels: bool,
    width: Option<f32>,
) -> Result<()> {
    let layout = FormLayout::new(load_app_config(config)?.theme_context());

    let mut objects: Vec<Element> = rows
        .iter()
        .flat_map(|&(label, content)| {
            let label = if text_labels {
                Element::text(label)
            } else {
                Element::widget(label)
            };
            [label, Element::widget(content)]
        })
        .collect();

    let min = layout.min_size(&objects);
    let size = Size::new(width.unwrap_or(min.width).max(min.width), min.height);
    layout.layout(&mut objects, size);

    println!("min size: {}x{}", min.width, min.height);
    for (row, cells) in objects.chunks_exact(2).enumerate() {
        for (cell, name) in cells.iter().zip(["label", "content"]) {
            println!(
                "row {row} {name:<7} at ({}, {}) size {}x{}",
                cell.position.x, cell.position.y, cell.size.width, cell.size.height
            );
        }
    }
    Ok(())
}
