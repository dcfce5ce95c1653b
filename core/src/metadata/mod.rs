//! Persistence of the association graph as a two-section JSON object.

mod export;
mod import;
mod types;

pub use import::ImportReport;
pub use types::{FileSection, Metadata, PageSection};
