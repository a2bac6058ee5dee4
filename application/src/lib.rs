#[cfg(any(
    feature = "adapters",
    feature = "reqwest",
    feature = "image",
    feature = "png"
))]
compile_error!("application must not depend on adapters/framework crates");

pub mod config;
pub mod error;
pub mod infrastructure_config;
pub mod mosaic;
pub mod pipeline;
pub mod ports;
