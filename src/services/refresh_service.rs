use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{CourseChange, TermId};
use crate::services::change_detector;
use crate::source::{TermParser, TermSource};

pub struct RefreshService {
    db: SqlitePool,
    source: Arc<dyn TermSource>,
    parser: Arc<dyn TermParser>,
}

#[derive(Debug, Serialize)]
pub struct RefreshReport {
    pub term: TermId,
    pub sections_written: usize,
    pub changes: Vec<CourseChange>,
}

#[derive(Debug, Serialize)]
pub struct RebuildReport {
    pub terms: Vec<TermId>,
    pub sections_written: usize,
}

impl RefreshService {
    pub fn new(db: SqlitePool, source: Arc<dyn TermSource>, parser: Arc<dyn TermParser>) -> Self {
        Self { db, source, parser }
    }

    /// Re-fetches the newest stored term, reports what changed, then stores the fresh data.
    ///
    /// Each store write is atomic on its own; the refresh as a whole is not. If a later write
    /// fails, the sections from an earlier one stay committed.
    pub async fn refresh_latest_term(&self) -> Result<RefreshReport, AppError> {
        let term = repository::get_most_recent_term(&self.db)
            .await?
            .ok_or(AppError::NoBaselineTerm)?;
        info!("Refreshing {}", term);

        info!("Step 1: Fetching documents");
        let docs = self.source.fetch_term(term).await?;

        info!("Step 2: Parsing documents");
        let parsed = self.parser.parse(&docs)?;

        info!("Step 3: Detecting changes");
        let changes = change_detector::detect_changes(&self.db, &parsed.term).await?;
        let new_count = changes.iter().filter(|c| c.is_new()).count();
        info!(
            "{} new sections, {} changed sections",
            new_count,
            changes.len() - new_count
        );

        info!("Step 4: Storing fresh data");
        let sections_written = repository::upsert_term(&self.db, &parsed.term).await?;
        repository::upsert_catalogue_and_attributes(&self.db, &parsed.catalogue, &parsed.attributes)
            .await?;
        repository::save_term_documents(&self.db, &docs).await?;

        info!("Refresh of {} completed", term);
        Ok(RefreshReport {
            term,
            sections_written,
            changes,
        })
    }

    /// Re-parses every archived term document and writes the results, without fetching anything.
    ///
    /// All documents are parsed before the first write. Terms are written oldest first, so the
    /// newest catalogue wins.
    pub async fn rebuild_from_stored(&self) -> Result<RebuildReport, AppError> {
        let archived = repository::fetch_all_term_documents(&self.db).await?;
        info!("Rebuilding from {} archived terms", archived.len());

        let mut parsed = Vec::with_capacity(archived.len());
        for docs in &archived {
            parsed.push(self.parser.parse(docs)?);
        }

        let mut terms = Vec::with_capacity(parsed.len());
        let mut sections_written = 0;
        for p in parsed.iter().rev() {
            info!("Rebuilding {} ({} sections)", p.term.id(), p.term.courses.len());
            sections_written += repository::upsert_term(&self.db, &p.term).await?;
            repository::upsert_catalogue_and_attributes(&self.db, &p.catalogue, &p.attributes)
                .await?;
            terms.push(p.term.id());
        }

        info!("Rebuild completed: {} sections written", sections_written);
        Ok(RebuildReport {
            terms,
            sections_written,
        })
    }
}
