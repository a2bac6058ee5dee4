use figment::{
    Figment,
    providers::{Env, Format, Json},
};
use std::path::Path;
use tracing::debug;

use palettegen_application::error::{AppError, AppResult};
use palettegen_application::infrastructure_config::Config;

/// Load and validate the run configuration from `path`.
/// `PALETTEGEN_`-prefixed environment variables override file values, with
/// `__` separating nested keys (e.g. `PALETTEGEN_FETCH__CONCURRENCY`).
pub fn load_config(path: &Path) -> AppResult<Config> {
    if !path.is_file() {
        return Err(AppError::ConfigError {
            message: format!("Config file not found: {}", path.display()),
        });
    }

    let config: Config = Figment::from(Json::file(path))
        .merge(Env::prefixed("PALETTEGEN_").split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    debug!("Configuration valid: {} zoom levels", config.zooms.len());
    Ok(config)
}
