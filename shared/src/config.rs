//! Dashboard configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all) is
//! enough to build a working configuration.

use serde::{Deserialize, Serialize};

/// Largest page the upstream database service will return in one query
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for the gateway, the query endpoint and the record schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the gateway that forwards queries upstream
    pub base_url: String,
    /// Endpoint (relative to `base_url`) that runs a database query
    pub query_endpoint: String,
    /// Page-size ceiling sent with every query
    pub page_size: u32,
    /// Names of the upstream properties read by the record adapter
    pub schema: RecordSchema,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "/api".to_string(),
            query_endpoint: "/getExpenseData".to_string(),
            page_size: MAX_PAGE_SIZE,
            schema: RecordSchema::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration document, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Page size actually sent upstream, clamped to `1..=MAX_PAGE_SIZE`
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Property names of an upstream expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSchema {
    pub date_property: String,
    pub title_property: String,
    pub tags_property: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            date_property: "Date".to_string(),
            title_property: "Name".to_string(),
            tags_property: "Tags".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DashboardConfig::default();
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.query_endpoint, "/getExpenseData");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.schema.date_property, "Date");
        assert_eq!(config.schema.title_property, "Name");
        assert_eq!(config.schema.tags_property, "Tags");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = DashboardConfig::from_json(
            r#"{ "page_size": 25, "schema": { "tags_property": "Category" } }"#,
        )
        .unwrap();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.schema.tags_property, "Category");
        assert_eq!(config.schema.date_property, "Date");
    }

    #[test]
    fn test_effective_page_size_is_clamped() {
        let mut config = DashboardConfig::default();

        config.page_size = 0;
        assert_eq!(config.effective_page_size(), 1);

        config.page_size = 500;
        assert_eq!(config.effective_page_size(), MAX_PAGE_SIZE);

        config.page_size = 40;
        assert_eq!(config.effective_page_size(), 40);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "page_size": "many" }"#).is_err());
    }
}
