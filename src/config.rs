use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub measure: MeasureConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Contours below this area (px^2) are treated as thresholding noise.
    pub min_contour_area: f64,
    /// Radius of the local-mean window used by the adaptive threshold.
    pub block_radius: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub box_color_hex: String,
    pub marker_color_hex: String,
    pub guide_color_hex: String,
    pub font_family: String,
    pub font_size_pt: u32,
    /// Pixel scale of the bitmap-font fallback.
    pub label_scale: usize,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            min_contour_area: 1000.0,
            block_radius: 5,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            box_color_hex: "#00FF00".to_string(),
            marker_color_hex: "#FF0000".to_string(),
            guide_color_hex: "#FF0000".to_string(),
            font_family: "Monospace".to_string(),
            font_size_pt: 14,
            label_scale: 2,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            measure: MeasureConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl AppConfig {
    const PATH: &'static str = "config.json";

    pub fn load() -> Result<Self> {
        let config = if Path::new(Self::PATH).exists() {
            let content = fs::read_to_string(Self::PATH)?;
            // Missing fields fall back to their defaults via #[serde(default)]
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    println!("Loaded configuration from {}", Self::PATH);
                    c
                }
                Err(e) => {
                    println!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Configuration file not found. Creating default at {}", Self::PATH);
            Self::default()
        };

        // Always save back to ensure new fields are populated in the file
        config.save()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::PATH, content)?;
        Ok(())
    }
}
