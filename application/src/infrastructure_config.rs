use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::MosaicSettings;
use crate::error::{AppError, AppResult};
use domain::color::PaletteColor;
use domain::coords::TileCoord;
use domain::palette::encode_palette;

/// Largest color table an indexed PNG can carry.
const MAX_PALETTE_COLORS: u16 = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
    /// Zoom levels in the order their palettes are produced.
    pub zooms: IndexMap<String, ZoomSpec>,
    /// Hex colors forced on the quantizer instead of letting it pick.
    #[serde(default)]
    pub fixed_palette: Option<Vec<String>>,
    #[serde(default)]
    pub tile: TileConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomSpec {
    /// Sample tile coordinates, composited in list order.
    pub samples: Vec<TileCoord>,
    /// Target color count for this zoom level's palette.
    pub colors: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileConfig {
    /// Edge length of one grid cell in pixels.
    pub tile_size: u32,
    /// Opaque matte composited behind the tiles, 6 hex digits.
    pub background: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            background: "ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum in-flight tile requests within one zoom level.
    pub concurrency: usize,
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url.contains(placeholder) {
                return Err(AppError::ValidationError {
                    message: format!("URL template is missing the {placeholder} placeholder"),
                });
            }
        }

        for (key, spec) in &self.zooms {
            if spec.samples.is_empty() {
                return Err(AppError::ValidationError {
                    message: format!("Zoom '{key}' has no sample tiles"),
                });
            }
            if spec.colors == 0 || spec.colors > MAX_PALETTE_COLORS {
                return Err(AppError::ValidationError {
                    message: format!(
                        "Zoom '{key}' wants {} colors, expected 1-{MAX_PALETTE_COLORS}",
                        spec.colors
                    ),
                });
            }
        }

        if self.tile.tile_size == 0 {
            return Err(AppError::ValidationError {
                message: "Tile size must be positive".to_string(),
            });
        }
        if self.fetch.concurrency == 0 {
            return Err(AppError::ValidationError {
                message: "Fetch concurrency must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Build the settings bundle the services run with. The background must
    /// be a plain 6-digit color; the optional fixed palette is packed here so
    /// malformed entries surface before any network work starts.
    pub fn mosaic_settings(&self) -> AppResult<MosaicSettings> {
        let background: PaletteColor =
            self.tile
                .background
                .parse()
                .map_err(|e| AppError::ValidationError {
                    message: format!("Bad background color: {e}"),
                })?;
        if background.alpha.is_some() {
            return Err(AppError::ValidationError {
                message: "Background color must be opaque (6 hex digits)".to_string(),
            });
        }

        let fixed_palette = match &self.fixed_palette {
            Some(colors) => Some(encode_palette(colors)?),
            None => None,
        };

        Ok(MosaicSettings {
            tile_size: self.tile.tile_size,
            background,
            fetch_concurrency: self.fetch.concurrency,
            fixed_palette,
        })
    }
}
