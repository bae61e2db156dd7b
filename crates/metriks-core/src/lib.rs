pub mod app_config;
pub mod config;
pub mod error;
pub mod products;
pub mod retailers;
pub mod search;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ErrorKind};
pub use products::{ProductSummary, PLACEHOLDER_IMAGE};
pub use retailers::{load_retailers, parse_retailers, RetailerConfig, RetailersFile};
pub use search::{Coordinates, ResultPage, SearchMode, SearchQuery};
