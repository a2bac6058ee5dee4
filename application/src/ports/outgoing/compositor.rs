use crate::error::AppResult;
use domain::color::PaletteColor;
use std::sync::Arc;

/// One tile image positioned on the mosaic canvas.
#[derive(Debug, Clone)]
pub struct TilePlacement {
    pub x_offset: u32,
    pub y_offset: u32,
    pub image_bytes: Vec<u8>,
}

/// Canvas and quantization parameters for one mosaic.
#[derive(Debug, Clone)]
pub struct CompositeOptions {
    /// Opaque fill behind the placed tiles.
    pub background: PaletteColor,
    /// Upper bound on the quantized color count.
    pub target_colors: u16,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Packed RGBA entries to quantize against instead of deriving a palette.
    pub fixed_palette: Option<Vec<u8>>,
}

#[async_trait::async_trait]
pub trait CompositorPort: Send + Sync {
    /// Composite the placed tiles over the background and reduce the result
    /// to an indexed PNG container honoring `target_colors`.
    async fn composite(
        &self,
        tiles: Vec<TilePlacement>,
        options: &CompositeOptions,
    ) -> AppResult<Vec<u8>>;
}

pub type DynCompositorPort = Arc<dyn CompositorPort>;
