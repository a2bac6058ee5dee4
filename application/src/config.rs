use domain::color::PaletteColor;

/// Runtime settings shared by the mosaic pipeline, derived from a validated
/// [`crate::infrastructure_config::Config`].
#[derive(Debug, Clone)]
pub struct MosaicSettings {
    pub tile_size: u32,
    pub background: PaletteColor,
    pub fetch_concurrency: usize,
    /// Packed RGBA palette forced on the quantizer instead of letting it
    /// choose colors, when configured.
    pub fixed_palette: Option<Vec<u8>>,
}
