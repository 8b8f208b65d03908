// Engine settings, loaded from a JSON file or defaults
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::{Period, TimeFrame};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV_VAR: &str = "STOCK_CHART_CONFIG";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub host: String,
    pub port: u16,
    pub data: DataSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub default_dir: PathBuf,
    pub alternate_dir: PathBuf,
    /// Symbols ending with this suffix are read from `alternate_dir`.
    pub alternate_suffix: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartSettings {
    pub max_grid_symbols: usize,
    /// Used when a request leaves the symbol list blank.
    pub default_symbols: String,
    pub default_period: Period,
    pub default_time_frame: TimeFrame,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            host: "127.0.0.1".to_string(),
            port: 50061,
            data: DataSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            default_dir: PathBuf::from("data/default"),
            alternate_dir: PathBuf::from("data/alternate"),
            alternate_suffix: ".JP".to_string(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            max_grid_symbols: 9,
            default_symbols: "AAPL,MSFT,GOOGL,AMZN,META,TSLA,NVDA,NFLX,ARM".to_string(),
            default_period: Period::ThreeMonths,
            default_time_frame: TimeFrame::Daily,
        }
    }
}

impl EngineSettings {
    /// Reads the file named by `STOCK_CHART_CONFIG`, or falls back to defaults.
    pub fn load() -> Result<Self, EngineError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                tracing::info!("{} not set, using default engine settings", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e)))?;
        let settings = Self::from_json(&raw)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings in '{}': {}", path.display(), e)))?;
        tracing::info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings =
            serde_json::from_str(raw).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        if settings.chart.max_grid_symbols == 0 {
            return Err(EngineError::ConfigError("chart.max_grid_symbols must be at least 1".to_string()));
        }
        Ok(settings)
    }
}
