use crate::error::AppResult;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait TileFetchPort: Send + Sync {
    /// Retrieve the raw bytes of one tile image.
    async fn fetch_tile(&self, url: &str) -> AppResult<Vec<u8>>;
}

pub type DynTileFetchPort = Arc<dyn TileFetchPort>;
