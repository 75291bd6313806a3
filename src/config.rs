//! Browser configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

/// Tunables shared by every browser instance of an application.
///
/// Per-resource facts (facets, sortable fields, page sizes) belong to
/// [`ResourceSchema`](crate::ResourceSchema), not here.
///
/// ## Example
///
/// ```
/// use resource_browser::BrowserConfig;
///
/// let config = BrowserConfig::from_json_str(r#"{ "debounce_ms": 300 }"#).unwrap();
/// assert_eq!(config.debounce_ms, 300);
/// assert_eq!(config.stats_page_size, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Quiet interval of the search debouncer, in milliseconds.
    pub debounce_ms: u64,
    /// Page size used to approximate "all rows" for aggregate statistics.
    pub stats_page_size: u32,
    /// Page size used by the bulk export fetch.
    pub export_page_size: u32,
    /// Reload mounted statistics as soon as they are invalidated.
    pub reload_stats_on_invalidate: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            stats_page_size: 1000,
            export_page_size: 1000,
            reload_stats_on_invalidate: true,
        }
    }
}

impl BrowserConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, BrowserError> {
        let config: BrowserConfig =
            serde_json::from_str(json).map_err(|e| BrowserError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BrowserError> {
        if self.debounce_ms == 0 {
            return Err(BrowserError::Config("debounce_ms must be positive".into()));
        }
        if self.stats_page_size == 0 {
            return Err(BrowserError::Config(
                "stats_page_size must be positive".into(),
            ));
        }
        if self.export_page_size == 0 {
            return Err(BrowserError::Config(
                "export_page_size must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
