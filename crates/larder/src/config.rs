//! Resolution of effective settings: CLI flags first, then the config
//! file / environment, then built-in defaults.
//!
//! Core never sees these types -- it receives a database path.

use std::path::PathBuf;

use larder_config::Config;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Settings for one invocation after merging every source.
#[derive(Debug)]
pub struct Settings {
    pub database: PathBuf,
    pub export_path: Option<PathBuf>,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Settings {
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = larder_config::load_config()?;
        Ok(Self::from_config(global, &cfg))
    }

    pub fn from_config(global: &GlobalOpts, cfg: &Config) -> Self {
        let database = global.db.clone().unwrap_or_else(|| cfg.database_path());
        let output = global
            .output
            .or_else(|| parse_output(&cfg.defaults.output))
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| parse_color(&cfg.defaults.color))
            .unwrap_or(ColorMode::Auto);

        Self {
            database,
            export_path: cfg.export_path.clone(),
            output,
            color: crate::output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
        }
    }
}

fn parse_output(raw: &str) -> Option<OutputFormat> {
    match raw {
        "table" => Some(OutputFormat::Table),
        "json" => Some(OutputFormat::Json),
        "json-compact" => Some(OutputFormat::JsonCompact),
        "yaml" => Some(OutputFormat::Yaml),
        "plain" => Some(OutputFormat::Plain),
        _ => None,
    }
}

fn parse_color(raw: &str) -> Option<ColorMode> {
    match raw {
        "auto" => Some(ColorMode::Auto),
        "always" => Some(ColorMode::Always),
        "never" => Some(ColorMode::Never),
        _ => None,
    }
}
