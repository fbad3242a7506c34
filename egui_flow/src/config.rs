//! Layout configuration, loadable from TOML.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// How dock rows are numbered across the two columns.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowLayout {
    /// Sources continue below the last sink, sharing one running offset.
    #[default]
    Continuous,
    /// Sinks and sources each start at the top of their own column.
    Columns,
}

/// Height given to the embedded content when drawing.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ContentHeight {
    /// Everything between the last dock row and the bottom inset.
    #[default]
    Remaining,
    /// A fixed height in points.
    Fixed(f32),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub border_width: f32,
    pub row_layout: RowLayout,
    pub content_height: ContentHeight,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            border_width: 0.0,
            row_layout: RowLayout::default(),
            content_height: ContentHeight::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    pub layout: LayoutConfig,
}

impl FlowConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load a config file, falling back to defaults if it is missing or invalid.
pub fn load_config(path: &Path) -> FlowConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(toml_str) => match FlowConfig::from_toml_str(&toml_str) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
            }
        }
    }
    FlowConfig::default()
}

pub fn save_config(path: &Path, config: &FlowConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(path, config.to_toml_string()?)?;
    info!("Flow config saved to {}", path.display());
    Ok(())
}
