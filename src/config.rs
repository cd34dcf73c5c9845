use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DRAG_SLOP, LONG_PRESS_MS, NOTICE_TTL_MS, PULL_RESISTANCE, PULL_THRESHOLD, SWIPE_RESISTANCE,
    SWIPE_THRESHOLD, TRANSITION_DELAY_MS, UNDO_WINDOW_MS, UNITS_PER_CELL,
};
use crate::mail::types::Scope;
use crate::triage::Timings;
use crate::triage::gesture::GestureConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mailbox: MailboxConfig,
    #[serde(default)]
    pub triage: TriageConfig,
    #[serde(default)]
    pub gesture: GestureSettings,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailboxConfig {
    /// Mailbox file (default: `<data dir>/triage/mailbox.toml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Scope loaded at startup: today, yesterday, 7d, 30d, 60d or 90d
    #[serde(default)]
    pub default_scope: Scope,
    #[serde(default = "default_undo_window_ms")]
    pub undo_window_ms: u64,
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            default_scope: Scope::default(),
            undo_window_ms: default_undo_window_ms(),
            notice_ttl_ms: default_notice_ttl_ms(),
            transition_ms: default_transition_ms(),
        }
    }
}

impl TriageConfig {
    pub fn timings(&self) -> Timings {
        Timings {
            transition: Duration::from_millis(self.transition_ms),
            undo_window: Duration::from_millis(self.undo_window_ms),
            notice: Duration::from_millis(self.notice_ttl_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureSettings {
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,
    #[serde(default = "default_swipe_resistance")]
    pub swipe_resistance: f32,
    #[serde(default = "default_drag_slop")]
    pub drag_slop: f32,
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    #[serde(default = "default_pull_threshold")]
    pub pull_threshold: f32,
    #[serde(default = "default_pull_resistance")]
    pub pull_resistance: f32,
    /// Gesture units per terminal cell for mouse input
    #[serde(default = "default_units_per_cell")]
    pub units_per_cell: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            swipe_threshold: default_swipe_threshold(),
            swipe_resistance: default_swipe_resistance(),
            drag_slop: default_drag_slop(),
            long_press_ms: default_long_press_ms(),
            pull_threshold: default_pull_threshold(),
            pull_resistance: default_pull_resistance(),
            units_per_cell: default_units_per_cell(),
        }
    }
}

impl GestureSettings {
    pub fn controller_config(&self) -> GestureConfig {
        GestureConfig {
            swipe_threshold: self.swipe_threshold,
            resistance: self.swipe_resistance,
            drag_slop: self.drag_slop,
            long_press: Duration::from_millis(self.long_press_ms),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Sender domains treated as school mail (e.g. "university.edu")
    #[serde(default)]
    pub school_domains: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Task file (default: `<data dir>/triage/tasks.toml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Prefix joined with a message id to link back to the mail
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            path: None,
            link_base: default_link_base(),
        }
    }
}

fn default_undo_window_ms() -> u64 {
    UNDO_WINDOW_MS
}

fn default_notice_ttl_ms() -> u64 {
    NOTICE_TTL_MS
}

fn default_transition_ms() -> u64 {
    TRANSITION_DELAY_MS
}

fn default_swipe_threshold() -> f32 {
    SWIPE_THRESHOLD
}

fn default_swipe_resistance() -> f32 {
    SWIPE_RESISTANCE
}

fn default_drag_slop() -> f32 {
    DRAG_SLOP
}

fn default_long_press_ms() -> u64 {
    LONG_PRESS_MS
}

fn default_pull_threshold() -> f32 {
    PULL_THRESHOLD
}

fn default_pull_resistance() -> f32 {
    PULL_RESISTANCE
}

fn default_units_per_cell() -> f32 {
    UNITS_PER_CELL
}

fn default_link_base() -> String {
    "https://mail.google.com/mail/u/0/#inbox/".to_string()
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("triage");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_local_dir()
            .context("Could not find data directory")?
            .join("triage");
        Ok(dir)
    }

    pub fn mailbox_path(&self) -> Result<PathBuf> {
        match &self.mailbox.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("mailbox.toml")),
        }
    }

    pub fn tasks_path(&self) -> Result<PathBuf> {
        match &self.tasks.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("tasks.toml")),
        }
    }

    /// Load the config file; a missing file means all defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        if g.swipe_threshold <= 0.0 || g.pull_threshold <= 0.0 {
            anyhow::bail!("gesture thresholds must be positive");
        }
        if !(0.0..=1.0).contains(&g.swipe_resistance) || !(0.0..=1.0).contains(&g.pull_resistance)
        {
            anyhow::bail!("gesture resistance must be between 0 and 1");
        }
        if g.units_per_cell <= 0.0 {
            anyhow::bail!("gesture.units_per_cell must be positive");
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        fs::create_dir_all(Self::data_dir()?)?;
        Ok(())
    }
}
