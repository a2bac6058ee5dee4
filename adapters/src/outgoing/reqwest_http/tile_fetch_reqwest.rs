use palettegen_application::{
    error::{AppError, AppResult},
    ports::outgoing::tile_fetch::TileFetchPort,
};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTileFetchConfig {
    pub user_agent: Option<String>,
}

/// HTTP tile source backed by a shared `reqwest` client, so requests within
/// one zoom level reuse pooled connections.
#[derive(Clone)]
pub struct ReqwestTileFetchAdapter {
    client: reqwest::Client,
}

impl ReqwestTileFetchAdapter {
    pub fn new(config: ReqwestTileFetchConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder.build().map_err(|e| AppError::FetchError {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl TileFetchPort for ReqwestTileFetchAdapter {
    #[instrument(skip(self))]
    async fn fetch_tile(&self, url: &str) -> AppResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::FetchError {
                message: format!("GET {url} failed: {e}"),
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| AppError::FetchError {
                message: format!("GET {url} failed: {e}"),
            })?;

        let bytes = response.bytes().await.map_err(|e| AppError::FetchError {
            message: format!("GET {url} body read failed: {e}"),
        })?;

        debug!("Fetched {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
