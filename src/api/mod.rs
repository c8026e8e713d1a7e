use axum::Json;
use axum::extract::Path;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::db::repository::{self, StoreSummary};
use crate::error::AppError;
use crate::models::*;
use crate::services::{RebuildReport, RefreshReport, RefreshService};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/terms", get(list_terms))
        .route("/terms/latest", get(latest_term))
        .route("/terms/{year}/{term}/sections/{crn}", get(get_section))
        .route("/courses/{subject}/{course_code}", get(get_course_info))
        .route("/courses/{subject}/{course_code}/transfers", get(list_transfers))
        .route("/summary", get(summary))
        .route("/refresh", post(refresh_now))
        .route("/rebuild", post(rebuild_now))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_terms(State(state): State<AppState>) -> Result<Json<Vec<TermId>>, AppError> {
    let terms = repository::list_terms(&state.db).await?;
    Ok(Json(terms))
}

async fn latest_term(State(state): State<AppState>) -> Result<Json<TermId>, AppError> {
    let term = repository::get_most_recent_term(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(term))
}

async fn get_section(
    State(state): State<AppState>,
    Path((year, term, crn)): Path<(i64, i64, i64)>,
) -> Result<Json<Course>, AppError> {
    let course = repository::get_stored_course(&state.db, year, term, crn)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn get_course_info(
    State(state): State<AppState>,
    Path((subject, course_code)): Path<(String, i64)>,
) -> Result<Json<CourseInfo>, AppError> {
    let info = repository::get_course_info(&state.db, &subject, course_code)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(info))
}

async fn list_transfers(
    State(state): State<AppState>,
    Path((subject, course_code)): Path<(String, i64)>,
) -> Result<Json<Vec<TransferAgreement>>, AppError> {
    let agreements = repository::fetch_transfer_agreements(&state.db, &subject, course_code).await?;
    Ok(Json(agreements))
}

async fn summary(State(state): State<AppState>) -> Result<Json<StoreSummary>, AppError> {
    let summary = repository::summary(&state.db).await?;
    Ok(Json(summary))
}

async fn refresh_now(State(state): State<AppState>) -> Result<Json<RefreshReport>, AppError> {
    let service = RefreshService::new(state.db.clone(), state.source.clone(), state.parser.clone());
    let report = service.refresh_latest_term().await?;
    Ok(Json(report))
}

async fn rebuild_now(State(state): State<AppState>) -> Result<Json<RebuildReport>, AppError> {
    let service = RefreshService::new(state.db.clone(), state.source.clone(), state.parser.clone());
    let report = service.rebuild_from_stored().await?;
    Ok(Json(report))
}
