use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerConfig {
    /// Stable identifier used as `retailerId` in quotes and comparisons.
    pub id: String,
    pub name: String,
    /// Endpoint answering `GET ?items=A,B` with quotes for this retailer.
    pub quote_url: String,
}

#[derive(Debug, Deserialize)]
pub struct RetailersFile {
    pub retailers: Vec<RetailerConfig>,
}

impl RetailersFile {
    /// Looks up a retailer by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RetailerConfig> {
        self.retailers.iter().find(|r| r.id == id)
    }
}

/// Load and validate the retailer registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_retailers(path: &Path) -> Result<RetailersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RetailersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_retailers(&content)
}

/// Parse and validate a retailer registry from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is invalid or fails validation.
pub fn parse_retailers(content: &str) -> Result<RetailersFile, ConfigError> {
    let retailers_file: RetailersFile = serde_yaml::from_str(content)?;
    validate_retailers(&retailers_file)?;
    Ok(retailers_file)
}

fn validate_retailers(retailers_file: &RetailersFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for retailer in &retailers_file.retailers {
        if retailer.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "retailer id must be non-empty".to_string(),
            ));
        }

        if retailer.id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "retailer id '{}' must not contain whitespace",
                retailer.id
            )));
        }

        if retailer.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' has an empty name",
                retailer.id
            )));
        }

        if !(retailer.quote_url.starts_with("https://")
            || retailer.quote_url.starts_with("http://"))
        {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' has invalid quote_url '{}'; expected an http(s) URL",
                retailer.id, retailer.quote_url
            )));
        }

        if !seen_ids.insert(retailer.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer id: '{}'",
                retailer.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;
