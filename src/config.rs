use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{AppError, Context, Result};

/// One tracked asset: the source API identifier plus display options and
/// optional alert thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub upper: Option<f64>,
    #[serde(default)]
    pub lower: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    pub vs_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub history_csv: PathBuf,
    pub dashboard_html: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_theme_bg")]
    pub theme_bg: String,
    #[serde(default = "default_theme_fg")]
    pub theme_fg: String,
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            theme_bg: default_theme_bg(),
            theme_fg: default_theme_fg(),
            ma_windows: default_ma_windows(),
        }
    }
}

fn default_theme_bg() -> String {
    "#0f1220".to_string()
}

fn default_theme_fg() -> String {
    "#e8ecf5".to_string()
}

fn default_ma_windows() -> Vec<usize> {
    vec![5, 20]
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AlertConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Delivery credentials for the alert webhook. Either field may be left
/// empty, which disables delivery without being an error.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub assets: Vec<AssetConfig>,
    pub source: SourceConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    /// Load and validate the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.assets.is_empty() {
            return Err(AppError::message("config must list at least one asset"));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset.id.trim().is_empty() {
                return Err(AppError::message(format!(
                    "asset `{}` has an empty source id",
                    asset.name
                )));
            }
            if asset.name.trim().is_empty() {
                return Err(AppError::message("asset display names must not be empty"));
            }
            if !seen.insert(asset.name.as_str()) {
                return Err(AppError::message(format!(
                    "duplicate asset name `{}` in config",
                    asset.name
                )));
            }
        }

        if self.source.url.trim().is_empty() {
            return Err(AppError::message("source.url must be provided"));
        }
        if self.source.vs_currency.trim().is_empty() {
            return Err(AppError::message("source.vs_currency must be provided"));
        }

        if self.chart.ma_windows.iter().any(|&w| w == 0) {
            return Err(AppError::message(
                "chart.ma_windows entries must be at least 1",
            ));
        }

        Ok(())
    }
}
