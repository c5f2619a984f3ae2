use clap::{Parser, Subcommand};
use fenn_layout::Size;
use fenn_theme::{ColorName, Variant};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fenn")]
#[command(about = "Inspect fenn preferences, theme colors and form layouts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding preferences.json and config.toml
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Application id used to locate the data directory when --data-dir is absent
    #[arg(long, global = true, default_value = "default")]
    pub app: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the JSON value stored under a key
    Get { key: String },

    /// Store a value; arguments that are not valid JSON are stored as strings
    Set { key: String, value: String },

    /// Delete a key
    Remove { key: String },

    /// Print every key and value
    List,

    /// Resolve a theme color against the configured theme
    Color {
        name: ColorName,

        /// Overrides the configured variant
        #[arg(long)]
        variant: Option<Variant>,
    },

    /// Lay out form rows and print each cell's position and size
    Form {
        /// Rows written as LABEL:CONTENT, each a WxH size
        #[arg(required = true, value_parser = parse_row)]
        rows: Vec<(Size, Size)>,

        /// Treat labels as text cells, inset by the inner padding
        #[arg(long)]
        text_labels: bool,

        /// Container width; defaults to the minimum width
        #[arg(long)]
        width: Option<f32>,
    },
}

pub(crate) fn parse_size(s: &str) -> Result<Size, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| format!("invalid dimension '{part}' in '{s}'"))
    };
    Ok(Size::new(parse(width)?, parse(height)?))
}

pub(crate) fn parse_row(s: &str) -> Result<(Size, Size), String> {
    let (label, content) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LABEL:CONTENT, got '{s}'"))?;
    Ok((parse_size(label)?, parse_size(content)?))
}
