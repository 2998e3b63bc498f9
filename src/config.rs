//! Configuration persistence for snapmark settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::rgb(255, 0, 0)
    }
}

impl ShapeColor {
    /// Color used for the uncommitted preedit preview
    pub const PREEDIT: ShapeColor = ShapeColor::rgb(100, 100, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Font descriptor for text annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Pixel size (em height)
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 16.0,
        }
    }
}

/// Smallest and largest accepted mosaic block size
pub const MOSAIC_BLOCK_RANGE: std::ops::RangeInclusive<u32> = 2..=50;

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Color for new shapes and text
    pub shape_color: ShapeColor,
    /// Outline stroke width in pixels
    pub stroke_width: f32,
    /// Font for text annotations
    pub font: FontSpec,
    /// Whether text annotations are bold
    pub bold: bool,
    /// Mosaic block size (larger = coarser, range 2-50)
    pub mosaic_block_size: u32,
    /// Border the host draws around the base image, stripped on finish
    pub host_border: u32,
    /// TrueType/OpenType file used to rasterize text
    pub font_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            shape_color: ShapeColor::default(),
            stroke_width: 2.0,
            font: FontSpec::default(),
            bold: false,
            mosaic_block_size: 10,
            host_border: 0,
            font_path: None,
        }
    }
}

impl EditorConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "snapmark";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory, settings not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: EditorConfig = serde_json::from_str(&data)?;
        config.mosaic_block_size = clamp_block_size(config.mosaic_block_size);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Clamp a requested mosaic block size into the accepted range
pub fn clamp_block_size(size: u32) -> u32 {
    size.clamp(*MOSAIC_BLOCK_RANGE.start(), *MOSAIC_BLOCK_RANGE.end())
}
