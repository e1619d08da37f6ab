use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{EditorError, Result};
use crate::core::pipeline::SimulatorTiming;

/// Directory name used under the platform config and data dirs.
const APP_DIR: &str = "novel-refiner";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub data: DataConfig,
    pub log: LogConfig,
    pub simulator: SimulatorConfig,
    pub picker: PickerConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

/// Pacing of the simulated pipelines, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tick_ms: u64,
    pub step_ms: u64,
    pub settle_ms: u64,
    /// Percent added per tick.
    pub increment: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Chapters per page in the link-chapters picker. 0 is treated as 1.
    pub page_size: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        let timing = SimulatorTiming::default();
        Self {
            tick_ms: timing.tick.as_millis() as u64,
            step_ms: timing.step.as_millis() as u64,
            settle_ms: timing.settle.as_millis() as u64,
            increment: timing.increment,
        }
    }
}

impl SimulatorConfig {
    pub fn timing(&self) -> SimulatorTiming {
        SimulatorTiming {
            tick: Duration::from_millis(self.tick_ms),
            step: Duration::from_millis(self.step_ms),
            settle: Duration::from_millis(self.settle_ms),
            increment: self.increment,
        }
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            page_size: crate::core::chapters::DEFAULT_PAGE_SIZE,
        }
    }
}

impl PickerConfig {
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

impl AppConfig {
    /// Load configuration from `<config_dir>/novel-refiner/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_or_default(&Self::config_path())
    }

    /// Like [`AppConfig::load`] but from an explicit path.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(EditorError::Io(_)) => {
                log::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Read and parse `path`, surfacing every failure.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            EditorError::Config(format!("Failed to parse config at {}: {e}", path.display()))
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir().join("exports")
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms.max(1))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
