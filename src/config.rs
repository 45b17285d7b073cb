use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CanvasResult;

/// Display options for a canvas view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct CanvasConfig {
    /// Draw a translucent bar with the preset name across the top
    pub show_title: bool,
    /// Draw the on-canvas slider and show the seek bar
    pub show_controls: bool,
    /// Ask the loader for full-resolution results
    pub show_hires: bool,
    pub title_text_size: f32,
    pub title_padding: f32,
    pub separator_width: f32,
    pub toast_text_size: f32,
    pub texture_cache_size: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            show_title: false,
            show_controls: false,
            show_hires: true,
            title_text_size: 24.0,
            title_padding: 20.0,
            separator_width: 4.0,
            toast_text_size: 128.0,
            texture_cache_size: 32,
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
