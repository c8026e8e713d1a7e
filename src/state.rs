use std::sync::Arc;

use sqlx::SqlitePool;

use crate::source::{TermParser, TermSource};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub source: Arc<dyn TermSource>,
    pub parser: Arc<dyn TermParser>,
}
