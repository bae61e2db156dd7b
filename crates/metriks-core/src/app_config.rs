use std::path::PathBuf;

use crate::search::Coordinates;

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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub catalog_base_url: String,
    /// Path segment after `/search/`, e.g. `"pharma"`.
    pub catalog_category: String,
    pub page_size: u32,
    /// Fixed window applied to every catalog and quote request.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub retailers_path: PathBuf,
    pub allow_partial: bool,
    /// Fixed position used for nearby searches, when configured.
    pub home_location: Option<Coordinates>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("catalog_base_url", &self.catalog_base_url)
            .field("catalog_category", &self.catalog_category)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("retailers_path", &self.retailers_path)
            .field("allow_partial", &self.allow_partial)
            .field(
                "home_location",
                &self.home_location.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
