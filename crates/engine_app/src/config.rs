//! Application configuration: optional JSON file, overridden by CLI flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use engine_ecs::TickConfig;
use serde::Deserialize;

use crate::render::Viewport;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "engine_app", about = "Run the ECS demo scene")]
pub struct Args {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target ticks per second.
    #[arg(long)]
    pub tick_rate: Option<f64>,

    /// Number of ticks to run (0 = run forever).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Number of actors to spawn.
    #[arg(long)]
    pub actors: Option<usize>,

    /// Draw a frame every N ticks (0 = never).
    #[arg(long)]
    pub render_every: Option<u64>,
}

/// Effective settings of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Number of ticks to run (0 = unlimited).
    pub ticks: u64,
    /// Number of actors to spawn.
    pub actors: usize,
    /// Draw a frame every N ticks (0 = never).
    pub render_every: u64,
    /// Canvas width in cells.
    pub width: usize,
    /// Canvas height in cells.
    pub height: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            ticks: 120,
            actors: 12,
            render_every: 30,
            width: 48,
            height: 16,
        }
    }
}

impl AppConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid config JSON")
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Build the effective config from CLI arguments.
    ///
    /// # Errors
    ///
    /// Fails if `--config` names an unreadable or invalid file.
    pub fn from_args(args: &Args) -> Result<Self> {
        let base = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(args))
    }

    /// Apply the flags that were given on the command line.
    #[must_use]
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(rate) = args.tick_rate {
            self.tick_rate = rate;
        }
        if let Some(ticks) = args.ticks {
            self.ticks = ticks;
        }
        if let Some(actors) = args.actors {
            self.actors = actors;
        }
        if let Some(every) = args.render_every {
            self.render_every = every;
        }
        self
    }

    /// The tick loop part of the config.
    #[must_use]
    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            tick_rate: self.tick_rate,
            max_ticks: self.ticks,
        }
    }

    /// The canvas size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "actors": 3, "tick_rate": 10.0 }"#).unwrap();
        assert_eq!(config.actors, 3);
        assert_eq!(config.tick_rate, 10.0);
        assert_eq!(config.ticks, AppConfig::default().ticks);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(AppConfig::from_json(r#"{ "actor": 3 }"#).is_err());
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let args = Args::parse_from(["engine_app", "--ticks", "7", "--render-every", "0"]);
        let config = AppConfig::from_json(r#"{ "ticks": 100, "actors": 2 }"#)
            .unwrap()
            .with_overrides(&args);
        assert_eq!(config.ticks, 7);
        assert_eq!(config.render_every, 0);
        assert_eq!(config.actors, 2);
        assert_eq!(config.tick_config().max_ticks, 7);
    }

    #[test]
    fn test_missing_config_file_errors() {
        let args = Args::parse_from(["engine_app", "--config", "/nonexistent/engine_app.json"]);
        assert!(AppConfig::from_args(&args).is_err());
    }
}
