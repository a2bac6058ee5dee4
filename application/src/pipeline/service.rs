use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    error::AppResult,
    infrastructure_config::Config,
    mosaic::service::MosaicService,
    ports::incoming::palettes::{GeneratePalettesUseCase, PaletteSet},
};

/// Runs one mosaic per configured zoom level, strictly in key order, and
/// collects the decoded palettes.
///
/// Levels never overlap: the next level's fetches are not launched until the
/// current one fully resolves, bounding peak memory and network usage to a
/// single mosaic. The first failing level aborts the run; its error is
/// returned verbatim and no partial result is emitted.
pub struct PaletteService {
    config: Arc<Config>,
    mosaic: MosaicService,
}

impl PaletteService {
    #[must_use]
    pub fn new(config: Arc<Config>, mosaic: MosaicService) -> Self {
        Self { config, mosaic }
    }

    #[instrument(skip(self))]
    pub async fn generate_palettes(&self) -> AppResult<PaletteSet> {
        let mut palettes = PaletteSet::with_capacity(self.config.zooms.len());

        for (key, spec) in &self.config.zooms {
            info!(zoom = %key, samples = spec.samples.len(), "Building palette");
            let palette = self.mosaic.build_palette(&self.config.url, spec).await?;
            info!(zoom = %key, colors = palette.len(), "Palette ready");
            palettes.insert(key.clone(), palette);
        }

        Ok(palettes)
    }
}

#[async_trait::async_trait]
impl GeneratePalettesUseCase for PaletteService {
    async fn generate_palettes(&self) -> AppResult<PaletteSet> {
        self.generate_palettes().await
    }
}
