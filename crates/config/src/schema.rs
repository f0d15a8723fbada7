use fillgauge_core::settings::{
    EngineSettings, DEFAULT_CAPACITY, DEFAULT_OUTLIER_SIGMAS, DEFAULT_WINDOW,
};
use fillgauge_core::{GaugeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Highest number of decimals the renderer will print.
pub const MAX_PRECISION: usize = 6;

/// Root configuration structure parsed from `fillgauge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Aggregation engine tuning.
    pub engine: EngineConfig,
    /// Capacity defaults and unit.
    pub capacity: CapacityConfig,
    /// Per-entity overrides (key = entity label, e.g. `"red"`).
    pub entities: HashMap<String, EntityConfig>,
    /// Table output settings.
    pub display: DisplayConfig,
    /// Where readings come from.
    pub feed: FeedConfig,
}

impl GaugeConfig {
    /// Reject values the engine or renderer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.engine.window == 0 {
            return Err(GaugeError::Config("engine.window must be at least 1".into()));
        }
        let sigmas = self.engine.outlier_sigmas;
        if !sigmas.is_finite() || sigmas <= 0.0 {
            return Err(GaugeError::Config(format!(
                "engine.outlier_sigmas must be a positive number, got {sigmas}"
            )));
        }
        check_capacity("capacity.default", self.capacity.default)?;
        for (key, entity) in &self.entities {
            if let Some(capacity) = entity.capacity {
                check_capacity(&format!("entities.{key}.capacity"), capacity)?;
            }
        }
        if self.display.precision > MAX_PRECISION {
            return Err(GaugeError::Config(format!(
                "display.precision must be at most {MAX_PRECISION}"
            )));
        }
        if self.feed.reconnect_secs == 0 {
            return Err(GaugeError::Config("feed.reconnect_secs must be at least 1".into()));
        }
        Ok(())
    }

    /// Settings the registry copies into newly created entities.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            window:           self.engine.window,
            outlier_sigmas:   self.engine.outlier_sigmas,
            default_capacity: self.capacity.default,
            capacities: self
                .entities
                .iter()
                .filter_map(|(key, e)| e.capacity.map(|c| (key.clone(), c)))
                .collect(),
        }
    }

    /// Display labels for entities that configure one.
    pub fn labels(&self) -> HashMap<String, String> {
        self.entities
            .iter()
            .filter_map(|(key, e)| e.label.clone().map(|l| (key.clone(), l)))
            .collect()
    }
}

fn check_capacity(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GaugeError::Config(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

/// Aggregation engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// History window per entity; filtering starts once it is full.
    pub window: usize,
    /// Samples further than this many standard deviations are outliers.
    pub outlier_sigmas: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window:         DEFAULT_WINDOW,
            outlier_sigmas: DEFAULT_OUTLIER_SIGMAS,
        }
    }
}

/// Capacity defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    /// Capacity used for entities without an override.
    pub default: f64,
    /// Unit label for quantities, e.g. `"ml"`.
    pub unit: String,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_CAPACITY,
            unit:    "ml".to_string(),
        }
    }
}

/// Per-entity overrides; unset fields fall back to the global values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub capacity: Option<f64>,
    /// Human-readable name shown instead of the raw key.
    pub label: Option<String>,
}

/// Table output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimals printed for percentages and quantities.
    pub precision: usize,
    /// Add peak, initial level, sample and outlier columns.
    pub show_diagnostics: bool,
    /// Text table for humans or one JSON object per frame.
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision:        1,
            show_diagnostics: false,
            format:           OutputFormat::Table,
        }
    }
}

/// Frame output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Reading source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Unix socket streaming JSON lines. `None` = read stdin.
    pub socket: Option<PathBuf>,
    /// Delay before reconnecting after the socket drops.
    pub reconnect_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            socket:         None,
            reconnect_secs: 2,
        }
    }
}
