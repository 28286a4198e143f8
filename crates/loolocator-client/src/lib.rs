pub mod client;
pub mod error;
pub mod normalize;
pub mod service;
pub mod types;

pub use client::{DirectoryClient, DEFAULT_RESULT_LIMIT};
pub use error::{MapUnavailable, QueryError, QueryErrorKind};
pub use service::MapKey;
pub use types::HealthStatus;
