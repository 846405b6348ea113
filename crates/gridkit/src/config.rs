//! Table configuration.
//!
//! ```
//! use gridkit::TableConfig;
//!
//! let config = TableConfig::from_json(r#"{ "items_per_page": 25 }"#).unwrap();
//! assert_eq!(config.items_per_page, Some(25));
//! assert_eq!(config.no_entries_message, "No entries found");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::pagination::{page_size_options, DEFAULT_MAX_PAGE_LINKS, DEFAULT_PAGE_SIZE_OPTIONS};

/// Shown in place of rows when nothing matches.
pub const DEFAULT_NO_ENTRIES_MESSAGE: &str = "No entries found";

/// Presentation settings for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Initial page size. `None` shows every row on one page.
    pub items_per_page: Option<usize>,
    pub no_entries_message: String,
    pub page_size_options: Vec<usize>,
    pub max_page_links: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            items_per_page: None,
            no_entries_message: DEFAULT_NO_ENTRIES_MESSAGE.to_string(),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            max_page_links: DEFAULT_MAX_PAGE_LINKS,
        }
    }
}

impl TableConfig {
    /// Parses and validates a JSON configuration. Missing keys take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TableConfig =
            serde_json::from_str(json).map_err(|e| GridError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the initial page size.
    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = Some(items_per_page);
        self
    }

    /// Sets the placeholder shown when nothing matches.
    pub fn with_no_entries_message(mut self, message: impl Into<String>) -> Self {
        self.no_entries_message = message.into();
        self
    }

    /// Rejects zero page sizes.
    pub fn validate(&self) -> Result<()> {
        if self.items_per_page == Some(0) {
            return Err(GridError::Config("items_per_page must be greater than zero".into()));
        }
        if self.page_size_options.contains(&0) {
            return Err(GridError::Config("page_size_options must not contain zero".into()));
        }
        Ok(())
    }

    /// Page sizes to offer while `current` is selected.
    pub fn page_size_options_for(&self, current: usize) -> Vec<usize> {
        page_size_options(current, &self.page_size_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TableConfig::default();
        assert_eq!(config.items_per_page, None);
        assert_eq!(config.no_entries_message, "No entries found");
        assert_eq!(config.page_size_options, vec![10, 50, 100]);
        assert_eq!(config.max_page_links, 6);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(TableConfig::from_json("{}").unwrap(), TableConfig::default());
    }

    #[test]
    fn partial_json_overrides() {
        let json = r#"{"no_entries_message":"Nothing here","max_page_links":4}"#;
        let config = TableConfig::from_json(json).unwrap();
        assert_eq!(config.no_entries_message, "Nothing here");
        assert_eq!(config.max_page_links, 4);
        assert_eq!(config.page_size_options, vec![10, 50, 100]);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = TableConfig::from_json(r#"{"items_per_page":0}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let err = TableConfig::from_json(r#"{"page_size_options":[10,0]}"#).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = TableConfig::from_json("{ items_per_page: }").unwrap_err();
        assert!(err.to_string().starts_with("invalid table configuration"));
    }

    #[test]
    fn size_options_include_small_current() {
        let config = TableConfig::default().with_items_per_page(2);
        assert_eq!(config.page_size_options_for(2), vec![2, 10, 50, 100]);
    }
}
