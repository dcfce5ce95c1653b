use crate::document::DocumentIndex;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("project error: {0}")]
    Project(String),
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Why a page-structure fetch produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureReason {
    Timeout,
    Parser(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub index: DocumentIndex,
    pub document: String,
    pub reason: FetchFailureReason,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FetchFailureReason::Timeout => {
                write!(f, "document {} ({}) timed out", self.index, self.document)
            }
            FetchFailureReason::Parser(msg) => {
                write!(f, "document {} ({}): {}", self.index, self.document, msg)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("page structures not rebuilt, {} fetch(es) failed: {}", .failures.len(), join_failures(.failures))]
    PageFetch { failures: Vec<FetchFailure> },
}

fn join_failures(failures: &[FetchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("invalid metadata json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("metadata io error: {0}")]
    Io(#[from] std::io::Error),
}
