use crate::document::{DocumentIndex, PageKey};
use crate::error::MetadataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Persisted association graph. Both sections are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSection>,
}

/// Document ownership of every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSection {
    #[serde(default)]
    pub axes: BTreeMap<String, DocumentIndex>,
    #[serde(default)]
    pub datasets: BTreeMap<String, DocumentIndex>,
    /// One slot per measurement of the data model, in collection order.
    #[serde(default)]
    pub measurements: Vec<Option<DocumentIndex>>,
}

/// Page placement of every entity inside paginated documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSection {
    #[serde(default)]
    pub axes: BTreeMap<String, PageKey>,
    #[serde(default)]
    pub datasets: BTreeMap<String, PageKey>,
    /// One slot per measurement of the data model, in collection order.
    #[serde(default)]
    pub measurements: Vec<Option<PageKey>>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.page.is_none()
    }

    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MetadataError> {
        std::fs::write(path.as_ref(), format!("{}\n", self.to_json_pretty()?))?;
        Ok(())
    }
}
