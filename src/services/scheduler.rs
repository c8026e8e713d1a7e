use std::sync::Arc;
use std::time::Duration;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::services::refresh_service::{RefreshReport, RefreshService};
use crate::source::{TermParser, TermSource};

/// Re-runs the latest-term refresh on a fixed interval.
pub struct RefreshScheduler {
    db: SqlitePool,
    source: Arc<dyn TermSource>,
    parser: Arc<dyn TermParser>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(
        db: SqlitePool,
        source: Arc<dyn TermSource>,
        parser: Arc<dyn TermParser>,
        interval_secs: u64,
    ) -> Self {
        Self::with_interval(db, source, parser, Duration::from_secs(interval_secs))
    }

    pub fn with_interval(
        db: SqlitePool,
        source: Arc<dyn TermSource>,
        parser: Arc<dyn TermParser>,
        interval: Duration,
    ) -> Self {
        Self {
            db,
            source,
            parser,
            interval,
        }
    }

    pub async fn start(self) {
        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_refresh().await {
                Ok(report) => {
                    info!(
                        "Scheduled refresh of {} completed - {} sections written, {} changes",
                        report.term,
                        report.sections_written,
                        report.changes.len()
                    );
                }
                Err(e) => {
                    warn!("Scheduled refresh failed: {:?}", e);
                }
            }
        }
    }

    async fn run_refresh(&self) -> Result<RefreshReport, crate::error::AppError> {
        let service = RefreshService::new(self.db.clone(), self.source.clone(), self.parser.clone());
        service.refresh_latest_term().await
    }
}
