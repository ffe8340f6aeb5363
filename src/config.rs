//! Configuration discovery and effective settings resolution.
//!
//! Rulemap reads `rulemap.toml|yaml|yml` from the working directory and
//! merges it with the environment to produce an `Effective` config.
//! Defaults:
//! - `output_dir`: current directory
//! - `prefix`: `rules`
//! - `color`: true
//!
//! Overrides precedence: environment (`NO_COLOR`) > config file > defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "rules";

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `rulemap.toml|yaml`.
pub struct RulemapConfig {
    /// Directory the report is written to.
    pub output_dir: Option<String>,
    /// Report file name prefix; the timestamp and `.xlsx` are appended.
    pub prefix: Option<String>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the binary after applying precedence.
pub struct Effective {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub color: bool,
}

/// Load `RulemapConfig` from `rulemap.toml` or `rulemap.yaml|yml` if present.
///
/// A missing file is `Ok(None)`; a file that exists but does not parse is an error.
pub fn load_config(root: &Path) -> Result<Option<RulemapConfig>> {
    let toml_path = root.join("rulemap.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)?;
        let cfg: RulemapConfig = toml::from_str(&s).map_err(|e| Error::Config {
            path: toml_path.clone(),
            message: e.to_string(),
        })?;
        return Ok(Some(cfg));
    }
    for yml in ["rulemap.yaml", "rulemap.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)?;
            if s.trim().is_empty() {
                return Ok(Some(RulemapConfig::default()));
            }
            let cfg: RulemapConfig = serde_yaml::from_str(&s).map_err(|e| Error::Config {
                path: p.clone(),
                message: e.to_string(),
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging the environment, discovered config, and defaults.
pub fn resolve_effective(root: &Path, no_color_env: bool) -> Result<Effective> {
    let cfg = load_config(root)?.unwrap_or_default();
    let output_dir = cfg
        .output_dir
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_default();
    let prefix = cfg
        .prefix
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
    let color = !no_color_env && cfg.color.unwrap_or(true);
    Ok(Effective {
        output_dir,
        prefix,
        color,
    })
}
