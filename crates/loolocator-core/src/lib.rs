pub mod app_config;
pub mod config;
pub mod geo;
pub mod params;
pub mod washroom;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinate, InvalidCoordinate, DEMO_ORIGIN};
pub use params::{InvalidParameter, SearchParameters, SearchRadius};
pub use washroom::{format_distance, Amenity, WashroomId, WashroomRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
