use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, instrument};

use domain::coords::TileCoord;
use domain::palette::decode_palette;

use crate::{
    config::MosaicSettings,
    error::AppResult,
    infrastructure_config::ZoomSpec,
    ports::outgoing::{
        compositor::{CompositeOptions, DynCompositorPort, TilePlacement},
        tile_fetch::DynTileFetchPort,
    },
};

use super::layout::MosaicLayout;

/// Builds the palette for a single zoom level: fetch its sample tiles,
/// composite them into one quantized mosaic, and read back the mosaic's
/// color table.
pub struct MosaicService {
    settings: Arc<MosaicSettings>,
    fetch_port: DynTileFetchPort,
    compositor_port: DynCompositorPort,
}

impl MosaicService {
    #[must_use]
    pub fn new(
        settings: Arc<MosaicSettings>,
        fetch_port: DynTileFetchPort,
        compositor_port: DynCompositorPort,
    ) -> Self {
        Self {
            settings,
            fetch_port,
            compositor_port,
        }
    }

    #[instrument(skip(self, url_template, spec), fields(samples = spec.samples.len(), colors = spec.colors))]
    pub async fn build_palette(
        &self,
        url_template: &str,
        spec: &ZoomSpec,
    ) -> AppResult<Vec<String>> {
        let tiles = self.fetch_tiles(url_template, &spec.samples).await?;
        debug!("Fetched {} tiles", tiles.len());

        let layout = MosaicLayout::new(tiles.len(), self.settings.tile_size);
        let placements = tiles
            .into_iter()
            .enumerate()
            .map(|(index, image_bytes)| {
                let (x_offset, y_offset) = layout.offset(index);
                TilePlacement {
                    x_offset,
                    y_offset,
                    image_bytes,
                }
            })
            .collect();

        let options = CompositeOptions {
            background: self.settings.background,
            target_colors: spec.colors,
            canvas_width: layout.canvas_size(),
            canvas_height: layout.canvas_size(),
            fixed_palette: self.settings.fixed_palette.clone(),
        };

        let mosaic = self.compositor_port.composite(placements, &options).await?;
        let palette = decode_palette(&mosaic)?;
        debug!("Decoded {} palette entries", palette.len());

        Ok(palette.iter().map(|color| color.to_hex()).collect())
    }

    /// Sample fetches run concurrently, capped at the configured limit, and
    /// resolve in sample order. The first failure aborts the whole level;
    /// results of still-pending fetches are discarded.
    async fn fetch_tiles(
        &self,
        url_template: &str,
        samples: &[TileCoord],
    ) -> AppResult<Vec<Vec<u8>>> {
        stream::iter(samples.iter().copied())
            .map(|coord| {
                let url = expand_url(url_template, coord);
                let fetch_port = Arc::clone(&self.fetch_port);
                async move {
                    debug!(%coord, "Fetching tile");
                    fetch_port.fetch_tile(&url).await
                }
            })
            .buffered(self.settings.fetch_concurrency)
            .try_collect()
            .await
    }
}

/// Literal substitution of the `{z}`/`{x}`/`{y}` placeholders.
fn expand_url(template: &str, coord: TileCoord) -> String {
    template
        .replace("{z}", &coord.z.to_string())
        .replace("{x}", &coord.x.to_string())
        .replace("{y}", &coord.y.to_string())
}
