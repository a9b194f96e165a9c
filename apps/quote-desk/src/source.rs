//! # Line-Item Sources
//!
//! The external store that supplies line items is the only asynchronous
//! boundary of the desk. Every adapter implements [`LineItemSource`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use quote_core::LineItemInput;

use crate::error::DeskResult;

/// Supplies the line items of one quote.
#[async_trait]
pub trait LineItemSource: Send + Sync {
    /// Fetches the complete list. A partial list is never returned: either
    /// every item arrives or the call fails.
    async fn fetch(&self) -> DeskResult<Vec<LineItemInput>>;

    /// Short name used in log output.
    fn describe(&self) -> String;
}

/// An object carrying an `items` array alongside other quote fields.
#[derive(Debug, Deserialize)]
struct WrappedItems {
    items: Vec<LineItemInput>,
}

/// Parses a line-item file: a bare array, or an object with an `items`
/// array. The shape is picked up front so a bad item reports its own field
/// and position.
fn parse_items(contents: &str) -> DeskResult<Vec<LineItemInput>> {
    if contents.trim_start().starts_with('[') {
        Ok(serde_json::from_str(contents)?)
    } else {
        Ok(serde_json::from_str::<WrappedItems>(contents)?.items)
    }
}

/// Reads line items from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LineItemSource for JsonFileSource {
    async fn fetch(&self) -> DeskResult<Vec<LineItemInput>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let items = parse_items(&contents)?;
        debug!(path = ?self.path, count = items.len(), "Read line items");
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_file_accepts_bare_array() {
        let json = r#"[{"description":"Sand","kind":"material","unit":"kilogram","quantity":25,"netPrice":12}]"#;
        let items = parse_items(json).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Sand");
    }

    #[test]
    fn test_items_file_accepts_wrapped_object() {
        let json = r#"{"quoteNumber":"Q-1","items":[{"description":"Labour","kind":"labour"}]}"#;
        let items = parse_items(json).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_bad_item_reports_the_offending_field() {
        let json = r#"[
            {"description":"Sand","kind":"material"},
            {"description":"Cement","kind":"material","netPrice":"cheap"}
        ]"#;
        let err = parse_items(json).unwrap_err().to_string();
        assert!(err.contains("invalid type"), "{err}");
        assert!(err.contains("line 3"), "{err}");

        let err = parse_items(r#"{"items":[{"kind":"labour"}]}"#).unwrap_err().to_string();
        assert!(err.contains("missing field `description`"), "{err}");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = JsonFileSource::new("/definitely/not/here/items.json");
        assert!(source.fetch().await.is_err());
    }
}
