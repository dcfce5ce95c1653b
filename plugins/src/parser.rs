use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use folio_core::api::{Document, MultiPageParser, ParsedDocument};
use regex::bytes::Regex;
use std::sync::Arc;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Counts the page objects of a PDF.
///
/// The scan is a byte-level search for `/Type /Page` dictionaries; it does not
/// decode object streams, so PDFs that compress their page tree report fewer
/// pages than they have.
pub struct PdfPageParser {
    page_object: Arc<Regex>,
}

impl PdfPageParser {
    pub fn new() -> Result<Self> {
        let page_object =
            Regex::new(r"/Type\s*/Page\b").context("Failed to compile page object pattern")?;
        Ok(Self {
            page_object: Arc::new(page_object),
        })
    }

    pub fn is_pdf(content: &[u8]) -> bool {
        content.starts_with(PDF_MAGIC)
    }
}

fn count_pages(pattern: &Regex, content: &Bytes) -> u32 {
    let count = pattern.find_iter(content).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[async_trait]
impl MultiPageParser for PdfPageParser {
    async fn parse(&self, document: &Document) -> Result<Option<ParsedDocument>> {
        if !Self::is_pdf(&document.content) {
            return Ok(None);
        }

        let pattern = self.page_object.clone();
        let content = document.content.clone();
        let page_count = tokio::task::spawn_blocking(move || count_pages(&pattern, &content))
            .await
            .with_context(|| format!("Page scan of {} did not complete", document.name))?;

        if page_count == 0 {
            bail!("{} is a PDF without any page", document.name);
        }

        tracing::debug!(
            target: "folio.flow",
            stage = "parse.done",
            doc.name = %document.name,
            page_count
        );
        Ok(Some(ParsedDocument::new(page_count, document.content.clone())))
    }
}
