pub mod parser;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::error::AppError;
use crate::models::{TermDocuments, TermId};

pub use parser::{JsonTermParser, ParsedTerm, TermParser};

/// Supplies the raw documents of a term.
#[async_trait]
pub trait TermSource: Send + Sync {
    async fn fetch_term(&self, term: TermId) -> Result<TermDocuments, AppError>;
}

/// Fetches term documents from `{base_url}/{year}/{term}/{sections|catalogue|attributes}`.
pub struct HttpTermSource {
    client: Client,
    base_url: String,
}

impl HttpTermSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Source(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_document(&self, term: TermId, kind: &str) -> Result<String, AppError> {
        let url = format!("{}/{}/{}/{}", self.base_url, term.year, term.term, kind);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Source(format!("Failed to fetch {}: {}", url, e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::Source(format!("term {} is not published yet", term)));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Source(format!("source error {}: {}", status, body)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Source(format!("Failed to read {}: {}", url, e)))
    }
}

#[async_trait]
impl TermSource for HttpTermSource {
    async fn fetch_term(&self, term: TermId) -> Result<TermDocuments, AppError> {
        let sections = self.fetch_document(term, "sections").await?;
        let catalogue = self.fetch_document(term, "catalogue").await?;
        let attributes = self.fetch_document(term, "attributes").await?;

        info!(
            "fetched {} ({} bytes of sections)",
            term,
            sections.len()
        );

        Ok(TermDocuments {
            year: term.year,
            term: term.term,
            sections,
            catalogue,
            attributes,
        })
    }
}
