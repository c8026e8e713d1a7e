use sqlx::SqlitePool;
use tracing::debug;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, CourseChange, Term};

/// Compares a freshly parsed term against the stored view of the same term.
///
/// Returns at most one change per CRN, in the order of `fresh.courses`. Nothing is written.
pub async fn detect_changes(db: &SqlitePool, fresh: &Term) -> Result<Vec<CourseChange>, AppError> {
    fresh.ensure_unique_crns()?;

    let mut changes = Vec::new();

    for course in &fresh.courses {
        let stored = repository::get_stored_course(db, fresh.year, fresh.term, course.crn).await?;
        if let Some(change) = diff_course(stored, course) {
            changes.push(change);
        }
    }

    debug!(
        "{} of {} sections changed in {}",
        changes.len(),
        fresh.courses.len(),
        fresh.id()
    );
    Ok(changes)
}

/// Only meetings added in `current` count as a schedule change; a meeting that
/// disappears without a replacement is not reported.
pub fn diff_course(stored: Option<Course>, current: &Course) -> Option<CourseChange> {
    let stored = match stored {
        Some(s) => s,
        None => {
            return Some(CourseChange {
                previous: None,
                current: current.clone(),
            });
        }
    };

    let changed = !current.same_offering(&stored)
        || current.schedule.iter().any(|s| !s.is_in(&stored.schedule));

    if changed {
        Some(CourseChange {
            previous: Some(stored),
            current: current.clone(),
        })
    } else {
        None
    }
}
