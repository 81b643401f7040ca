//! Settings assembled from an optional TOML file and command-line overrides.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use undercroft_core::Settings;

/// Options shared by every subcommand.
#[derive(Debug, Default, Args)]
pub(crate) struct ConfigArgs {
    /// TOML file with `[generation]` and `[raster]` tables.
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// Random seed, overriding the file.
    #[arg(long, global = true)]
    pub(crate) seed: Option<u64>,
    /// Grid width in cells, overriding the file.
    #[arg(long, global = true)]
    pub(crate) width: Option<i32>,
    /// Grid height in cells, overriding the file.
    #[arg(long, global = true)]
    pub(crate) height: Option<i32>,
}

/// Reads the configuration file, if any, and applies the flag overrides.
pub(crate) fn load(args: &ConfigArgs) -> Result<Settings> {
    let settings = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Settings::default(),
    };
    Ok(apply_overrides(settings, args))
}

fn parse(text: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(text)
}

fn apply_overrides(mut settings: Settings, args: &ConfigArgs) -> Settings {
    if let Some(seed) = args.seed {
        settings.generation.seed = seed;
    }
    if let Some(width) = args.width {
        settings.generation.grid_width = width;
    }
    if let Some(height) = args.height {
        settings.generation.grid_height = height;
    }
    settings
}
