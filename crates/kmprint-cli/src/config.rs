//! `kmprint.toml` discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use kmprint_engine::PrinterConfig;

pub const CONFIG_FILE: &str = "kmprint.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub printer: PrinterConfig,
    pub output: OutputSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub divider: Option<String>,
}

/// Settings from the nearest `kmprint.toml`, or the defaults
pub fn load() -> Result<Settings> {
    let Some(path) = find_config() else {
        return Ok(Settings::default());
    };
    debug!(path = %path.display(), "using configuration file");
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
}

fn parse(text: &str) -> Result<Settings> {
    Ok(toml::from_str(text)?)
}

/// Walk up from the working directory to find `kmprint.toml`
fn find_config() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
