//! Configuration file support for ocular-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/ocular-qa/config.toml` (lowest priority)
//! - Project-local: `.ocular-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ocular_qa_core::CheckName;
use serde::Deserialize;
use tracing::{debug, info};

/// Project-local config file name.
pub const PROJECT_CONFIG: &str = ".ocular-qa.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Verdict inclusion settings.
    pub gate: GateConfig,
    /// Audit log and results directory locations.
    pub storage: StorageConfig,
    /// Detector per check, keyed by check name.
    pub checks: BTreeMap<String, DetectorConfig>,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Gate configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Checks whose state takes part in the verdict.
    pub included_checks: Option<Vec<String>>,
}

/// Storage configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory receiving retained images.
    pub results_dir: Option<PathBuf>,
    /// Audit log path.
    pub log_file: Option<PathBuf>,
}

/// Detector configuration for one check.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Enable/disable the detector.
    pub enabled: Option<bool>,
    /// Program and arguments; `{image}` is replaced by the image path.
    pub command: Option<Vec<String>>,
}

impl DetectorConfig {
    /// A configured detector runs unless explicitly disabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "jsonl", "json" or "table".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/ocular-qa/config.toml`
    /// 2. Project-local: `.ocular-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file cannot be read or parsed, or if the
    /// merged configuration is invalid.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                config = load_file(&xdg_path)?;
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            config.merge(load_file(&project_path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Enabled detectors with their command lines, in check order.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown check name.
    pub fn detectors(&self) -> Result<Vec<(CheckName, Vec<String>)>> {
        let mut detectors = Vec::new();
        for (name, detector) in &self.checks {
            if !detector.is_enabled() {
                debug!("Detector for '{name}' disabled by config");
                continue;
            }
            let check: CheckName = name.parse()?;
            detectors.push((check, detector.command.clone().unwrap_or_default()));
        }
        detectors.sort_by_key(|(check, _)| *check);
        Ok(detectors)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        for (name, detector) in &self.checks {
            name.parse::<CheckName>()
                .with_context(|| format!("invalid [checks.{name}] section"))?;
            let has_program = detector
                .command
                .as_ref()
                .and_then(|c| c.first())
                .is_some_and(|p| !p.trim().is_empty());
            if detector.is_enabled() && !has_program {
                bail!("checks.{name}.command must name a program");
            }
        }

        if let Some(ref names) = self.gate.included_checks {
            for name in names {
                name.parse::<CheckName>()
                    .context("invalid gate.included_checks")?;
            }
        }

        // Output format validation
        if let Some(ref f) = self.output.format {
            if !["jsonl", "json", "table"].contains(&f.as_str()) {
                bail!("output.format must be 'jsonl', 'json' or 'table', got '{f}'");
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Gate
        self.gate.included_checks = other
            .gate
            .included_checks
            .or_else(|| self.gate.included_checks.take());

        // Storage
        self.storage.results_dir = other
            .storage
            .results_dir
            .or_else(|| self.storage.results_dir.take());
        self.storage.log_file = other
            .storage
            .log_file
            .or_else(|| self.storage.log_file.take());

        // Checks, field by field
        for (name, detector) in other.checks {
            let entry = self.checks.entry(name).or_default();
            entry.enabled = detector.enabled.or(entry.enabled);
            entry.command = detector.command.or_else(|| entry.command.take());
        }

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ocular-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.ocular-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
