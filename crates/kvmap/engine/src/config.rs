//! Mapper configuration

use crate::error::MapperResult;
use crate::peer::WidgetAttributeTable;
use kvmap_types::DateFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Settings shared by [`Mapper`](crate::Mapper) and
/// [`PeerCopier`](crate::PeerCopier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Format used when a string is assigned to a date field
    pub date_format: DateFormat,

    /// Extra widget kind → attribute entries, applied over the defaults
    pub widget_attributes: BTreeMap<String, String>,

    /// Keep skip reasons in fill reports
    pub record_skips: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            widget_attributes: BTreeMap::new(),
            record_skips: true,
        }
    }
}

impl MapperConfig {
    pub fn from_json_str(json: &str) -> MapperResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file. A missing file yields the defaults.
    pub fn from_path(path: impl AsRef<Path>) -> MapperResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No mapper configuration found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!(
            path = %path.display(),
            date_format = %config.date_format,
            widget_attributes = config.widget_attributes.len(),
            "Loaded mapper configuration"
        );
        Ok(config)
    }

    /// Default widget table with the configured entries applied
    pub fn widget_table(&self) -> WidgetAttributeTable {
        let mut table = WidgetAttributeTable::default();
        table.extend(
            self.widget_attributes
                .iter()
                .map(|(kind, attribute)| (kind.clone(), attribute.clone())),
        );
        table
    }
}
