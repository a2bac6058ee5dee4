use std::sync::Arc;

use palettegen_adapters::outgoing::{
    image_rs::mosaic_compositor_image::ImageMosaicCompositorAdapter,
    reqwest_http::tile_fetch_reqwest::{ReqwestTileFetchAdapter, ReqwestTileFetchConfig},
};
use palettegen_application::error::AppError;
use palettegen_application::infrastructure_config::Config;
use palettegen_application::mosaic::service::MosaicService;
use palettegen_application::pipeline::service::PaletteService;
use palettegen_application::ports::outgoing::{
    compositor::DynCompositorPort, tile_fetch::DynTileFetchPort,
};

pub struct AppState {
    pub config: Arc<Config>,
    pub palette_service: PaletteService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let config = Arc::new(config);
        let settings = Arc::new(config.mosaic_settings()?);

        let fetch_port: DynTileFetchPort =
            Arc::new(ReqwestTileFetchAdapter::new(ReqwestTileFetchConfig {
                user_agent: config.fetch.user_agent.clone(),
            })?);
        let compositor_port: DynCompositorPort = Arc::new(ImageMosaicCompositorAdapter::new());

        let mosaic = MosaicService::new(settings, fetch_port, compositor_port);
        let palette_service = PaletteService::new(Arc::clone(&config), mosaic);

        Ok(Self {
            config,
            palette_service,
        })
    }
}
