use crate::error::AppResult;
use indexmap::IndexMap;

/// Ordered mapping from zoom key to that zoom level's palette, each entry a
/// 6-or-8-digit lowercase hex string. Key order matches the run
/// configuration.
pub type PaletteSet = IndexMap<String, Vec<String>>;

#[async_trait::async_trait]
pub trait GeneratePalettesUseCase: Send + Sync {
    async fn generate_palettes(&self) -> AppResult<PaletteSet>;
}
