//! Layered TOML configuration.
//!
//! Settings come from, in increasing priority:
//!
//! 1. built-in defaults,
//! 2. the user file `<config_dir>/plexus/config.toml`,
//! 3. the project file `plexus.toml` in the working directory (or the file
//!    named with `--config`),
//! 4. the `FORMAT` environment variable (output format only),
//! 5. command-line flags, applied by the CLI on top of [`EffectiveConfig`].
//!
//! ```toml
//! [centrality]
//! wf_improved = true
//! normalized = true
//! parallel = false
//!
//! [input]
//! format = "json"
//!
//! [output]
//! format = "text"
//! top = 10
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::edges::EdgeFormat;
use crate::metrics::CentralityConfig;

/// Project file name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "plexus.toml";

/// One config file as written on disk. Every key is optional so files can
/// be layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub centrality: CentralitySection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralitySection {
    #[serde(default)]
    pub wf_improved: Option<bool>,
    #[serde(default)]
    pub normalized: Option<bool>,
    #[serde(default)]
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSection {
    #[serde(default)]
    pub format: Option<EdgeFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub top: Option<usize>,
}

impl FileConfig {
    /// Layer `over` on top of `self`; keys set in `over` win.
    #[must_use]
    pub fn overlay(self, over: Self) -> Self {
        Self {
            centrality: CentralitySection {
                wf_improved: over.centrality.wf_improved.or(self.centrality.wf_improved),
                normalized: over.centrality.normalized.or(self.centrality.normalized),
                parallel: over.centrality.parallel.or(self.centrality.parallel),
            },
            input: InputSection {
                format: over.input.format.or(self.input.format),
            },
            output: OutputSection {
                format: over.output.format.or(self.output.format),
                top: over.output.top.or(self.output.top),
            },
        }
    }

    /// Metric settings with defaults filled in.
    #[must_use]
    pub fn centrality_config(&self) -> CentralityConfig {
        let mut config = CentralityConfig::default();
        if let Some(wf) = self.centrality.wf_improved {
            config.closeness.wf_improved = wf;
        }
        if let Some(normalized) = self.centrality.normalized {
            config.betweenness.normalized = normalized;
        }
        config.with_parallel(self.centrality.parallel.unwrap_or(false))
    }
}

/// Fully resolved settings handed to the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub centrality: CentralityConfig,
    pub input_format: Option<EdgeFormat>,
    /// Output format from env or files; `None` leaves the choice to the
    /// terminal check.
    pub output_format: Option<String>,
    pub top: Option<usize>,
    /// Files that contributed, lowest priority first.
    pub sources: Vec<PathBuf>,
}

/// Parse one TOML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`FileConfig`].
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<FileConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `plexus.toml` from `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    let path = project_root.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    load_config_file(&path)
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("plexus/config.toml"))
}

/// Load the per-user config, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<FileConfig> {
    let Some(path) = user_config_path() else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    load_config_file(&path)
}

/// Resolve the effective configuration.
///
/// `explicit` replaces the project file lookup and must exist.
///
/// # Errors
///
/// Returns an error if any contributing file cannot be read or parsed.
pub fn resolve_config(project_root: &Path, explicit: Option<&Path>) -> Result<EffectiveConfig> {
    let mut sources = Vec::new();

    let user = load_user_config()?;
    if user != FileConfig::default() {
        sources.extend(user_config_path());
    }

    let project = if let Some(path) = explicit {
        sources.push(path.to_path_buf());
        load_config_file(path)?
    } else {
        let path = project_root.join(PROJECT_CONFIG_FILE);
        if path.exists() {
            sources.push(path);
        }
        load_project_config(project_root)?
    };

    let merged = user.overlay(project);
    let env_format = env::var("FORMAT").ok();
    let effective = build_effective(merged, env_format, sources);
    debug!(?effective, "configuration resolved");
    Ok(effective)
}

fn build_effective(
    merged: FileConfig,
    env_format: Option<String>,
    sources: Vec<PathBuf>,
) -> EffectiveConfig {
    let output_format = env_format
        .filter(|value| !value.trim().is_empty())
        .or_else(|| merged.output.format.clone());

    EffectiveConfig {
        centrality: merged.centrality_config(),
        input_format: merged.input.format,
        output_format,
        top: merged.output.top,
        sources,
    }
}
