use super::types::DocumentIndex;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Notifications published by the document manager.
#[derive(Debug, Clone, Serialize)]
pub enum DocumentEvent {
    /// A new document set replaced the registry
    Loaded {
        document_count: usize,
        timestamp: DateTime<Utc>,
    },
    /// The live slot moved to another document
    Switched {
        from: DocumentIndex,
        to: DocumentIndex,
        timestamp: DateTime<Utc>,
    },
    MetadataExported {
        has_file_section: bool,
        has_page_section: bool,
        timestamp: DateTime<Utc>,
    },
    MetadataImported {
        rebuilt_page_structures: usize,
        timestamp: DateTime<Utc>,
    },
}
