use std::num::NonZeroU32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the washroom directory service.
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of results requested per nearest search.
    pub result_limit: NonZeroU32,
    /// Upper bound on a single position acquisition.
    pub location_timeout_secs: u64,
    /// Cached positions younger than this are reused instead of asking the platform.
    pub location_max_age_secs: u64,
}
