//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `folio_core::api` instead of reaching into internal modules.

pub use crate::config::{load_default, load_from_file, AppConfig, ImportConfig, LoggingConfig};
pub use crate::context::Services;
pub use crate::document::{
    ContainerKind, Document, DocumentEvent, DocumentIndex, DocumentManager, EntityHandle,
    EntityId, EntityKind, PageKey, ParsedDocument,
};
pub use crate::error::{
    CliError, FetchFailure, FetchFailureReason, ImportError, MetadataError,
};
pub use crate::metadata::{FileSection, ImportReport, Metadata, PageSection};
pub use crate::services::{
    ContentLoader, DataModel, History, LiveState, MultiPageParser, NavigationView, PageData,
    PageStructure, PageStructureFactory, SelectionView,
};
