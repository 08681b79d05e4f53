//! Session configuration and level layout loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use gremlin_maze_core::{LevelLayout, SessionConfig, Tuning};
use serde::Deserialize;
use tracing::debug;

/// On-disk shape of `config.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    lives: u32,
    levels: Vec<LevelEntry>,
    #[serde(default)]
    tuning: Tuning,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelEntry {
    layout: PathBuf,
}

/// Reads the configuration at `path` and every layout it references.
///
/// Relative layout paths are resolved against the directory holding the
/// configuration file.
pub(crate) fn load_session(path: &Path) -> Result<SessionConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let file: ConfigFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse configuration {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let levels = file
        .levels
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let layout_path = base.join(&entry.layout);
            load_layout(&layout_path)
                .with_context(|| format!("failed to load level {}", index + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(levels = levels.len(), lives = file.lives, "configuration loaded");
    Ok(SessionConfig {
        lives: file.lives,
        levels,
        tuning: file.tuning,
    })
}

/// Reads a layout file line by line.
pub(crate) fn load_layout(path: &Path) -> Result<LevelLayout> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    Ok(LevelLayout::parse(&text))
}
