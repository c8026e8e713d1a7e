use crate::error::AppError;
use crate::models::{AttributeEntry, CatalogueEntry, Term, TermDocuments};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTerm {
    pub term: Term,
    pub catalogue: Vec<CatalogueEntry>,
    pub attributes: Vec<AttributeEntry>,
}

/// Turns raw term documents into entities.
pub trait TermParser: Send + Sync {
    fn parse(&self, docs: &TermDocuments) -> Result<ParsedTerm, AppError>;
}

/// Reads documents that were already extracted to JSON upstream.
pub struct JsonTermParser;

impl TermParser for JsonTermParser {
    fn parse(&self, docs: &TermDocuments) -> Result<ParsedTerm, AppError> {
        let term: Term = serde_json::from_str(&docs.sections)
            .map_err(|e| AppError::Source(format!("Failed to parse sections: {}", e)))?;
        let catalogue: Vec<CatalogueEntry> = serde_json::from_str(&docs.catalogue)
            .map_err(|e| AppError::Source(format!("Failed to parse catalogue: {}", e)))?;
        let attributes: Vec<AttributeEntry> = serde_json::from_str(&docs.attributes)
            .map_err(|e| AppError::Source(format!("Failed to parse attributes: {}", e)))?;

        if term.id() != docs.id() {
            return Err(AppError::Source(format!(
                "sections document describes {} but {} was requested",
                term.id(),
                docs.id()
            )));
        }

        Ok(ParsedTerm {
            term,
            catalogue,
            attributes,
        })
    }
}
