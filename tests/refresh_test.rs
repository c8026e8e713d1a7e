mod common;

use std::sync::Arc;

use course_info::db::{connect_in_memory, repository};
use course_info::error::AppError;
use course_info::models::{ScheduleType, TermDocuments, TermId};
use course_info::services::RefreshService;
use course_info::source::JsonTermParser;

use common::{
    StaticTermSource, UnpublishedTermSource, catalogue, course, documents, meeting, term,
};

#[tokio::test]
async fn test_refresh_without_baseline_fails() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    let fresh = term(2024, 30, vec![course(30001, 40, vec![])]);
    let source = Arc::new(StaticTermSource::new(documents(&fresh)));

    let service = RefreshService::new(pool.clone(), source.clone(), Arc::new(JsonTermParser));
    let result = service.refresh_latest_term().await;

    assert!(matches!(result, Err(AppError::NoBaselineTerm)));
    assert_eq!(source.calls(), 0);

    let summary = repository::summary(&pool).await.expect("Failed to summarize");
    assert_eq!(summary.sections, 0);
    assert_eq!(summary.term_documents, 0);
    assert_eq!(summary.course_info, 0);
}

#[tokio::test]
async fn test_refresh_reports_changes_and_stores_fresh_data() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    let lecture = meeting(ScheduleType::Lecture, "M-W----");
    let lab = meeting(ScheduleType::Lab, "----F--");

    repository::upsert_term(&pool, &term(2023, 30, vec![course(90001, 10, vec![])]))
        .await
        .expect("Failed to seed older term");
    repository::upsert_term(
        &pool,
        &term(
            2024,
            30,
            vec![
                course(30001, 40, vec![lecture.clone()]),
                course(30002, 40, vec![lecture.clone()]),
                course(30003, 40, vec![lecture.clone(), lab.clone()]),
            ],
        ),
    )
    .await
    .expect("Failed to seed store");

    let fresh = term(
        2024,
        30,
        vec![
            course(30001, 38, vec![lecture.clone()]),
            course(30002, 40, vec![lecture.clone()]),
            course(30003, 40, vec![lecture.clone()]),
            course(30004, 24, vec![lab.clone()]),
        ],
    );
    let source = Arc::new(StaticTermSource::new(documents(&fresh)));
    let service = RefreshService::new(pool.clone(), source.clone(), Arc::new(JsonTermParser));

    let report = service.refresh_latest_term().await.expect("Refresh failed");

    assert_eq!(source.calls(), 1);
    assert_eq!(report.term.year, 2024);
    assert_eq!(report.term.term, 30);
    assert_eq!(report.sections_written, 4);

    let crns: Vec<i64> = report.changes.iter().map(|c| c.current.crn).collect();
    assert_eq!(crns, vec![30001, 30004]);
    assert_eq!(
        report.changes[0].previous.as_ref().and_then(|c| c.seats),
        Some(40)
    );
    assert!(report.changes[1].is_new());

    let stored = repository::get_stored_course(&pool, 2024, 30, 30003)
        .await
        .expect("Failed to fetch")
        .expect("Course not found");
    assert_eq!(stored.schedule, vec![lecture]);

    let info = repository::get_course_info(&pool, "PHYS", 1125)
        .await
        .expect("Failed to fetch course info")
        .expect("Course info not found");
    assert_eq!(info.lsc, Some(true));

    let summary = repository::summary(&pool).await.expect("Failed to summarize");
    assert_eq!(summary.term_documents, 1);
    assert_eq!(summary.sections, 5);

    let again = service.refresh_latest_term().await.expect("Second refresh failed");
    assert!(again.changes.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_does_not_write() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    repository::upsert_term(&pool, &term(2024, 30, vec![course(30001, 40, vec![])]))
        .await
        .expect("Failed to seed store");
    let before = repository::summary(&pool).await.expect("Failed to summarize");

    let service = RefreshService::new(
        pool.clone(),
        Arc::new(UnpublishedTermSource),
        Arc::new(JsonTermParser),
    );
    let result = service.refresh_latest_term().await;

    assert!(matches!(result, Err(AppError::Source(_))));
    assert_eq!(repository::summary(&pool).await.unwrap(), before);
}

#[tokio::test]
async fn test_failed_parse_does_not_write() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    repository::upsert_term(&pool, &term(2024, 30, vec![course(30001, 40, vec![])]))
        .await
        .expect("Failed to seed store");
    let before = repository::summary(&pool).await.expect("Failed to summarize");

    let broken = TermDocuments {
        year: 2024,
        term: 30,
        sections: "<table><tr><td>30001</td></tr></table>".to_string(),
        catalogue: "[]".to_string(),
        attributes: "[]".to_string(),
    };
    let service = RefreshService::new(
        pool.clone(),
        Arc::new(StaticTermSource::new(broken)),
        Arc::new(JsonTermParser),
    );
    let result = service.refresh_latest_term().await;

    assert!(matches!(result, Err(AppError::Source(_))));
    assert_eq!(repository::summary(&pool).await.unwrap(), before);
}

#[tokio::test]
async fn test_duplicate_crn_in_fresh_term_aborts_refresh() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    repository::upsert_term(&pool, &term(2024, 30, vec![course(30001, 40, vec![])]))
        .await
        .expect("Failed to seed store");
    let before = repository::summary(&pool).await.expect("Failed to summarize");

    let fresh = term(2024, 30, vec![course(30001, 38, vec![]), course(30001, 37, vec![])]);
    let service = RefreshService::new(
        pool.clone(),
        Arc::new(StaticTermSource::new(documents(&fresh))),
        Arc::new(JsonTermParser),
    );
    let result = service.refresh_latest_term().await;

    assert!(matches!(result, Err(AppError::IntegrityViolation(_))));
    assert_eq!(repository::summary(&pool).await.unwrap(), before);
}

#[tokio::test]
async fn test_rebuild_from_stored_documents() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    let lecture = meeting(ScheduleType::Lecture, "M-W----");

    let older = term(2024, 10, vec![course(10001, 30, vec![lecture.clone()])]);
    let mut older_catalogue = catalogue();
    older_catalogue[0].title = "Physics I".to_string();
    let older_docs = TermDocuments {
        catalogue: serde_json::to_string(&older_catalogue).expect("Failed to encode catalogue"),
        ..documents(&older)
    };
    let newer = term(
        2024,
        20,
        vec![course(20001, 35, vec![lecture.clone()]), course(20002, 35, vec![])],
    );

    repository::save_term_documents(&pool, &older_docs).await.expect("Failed to archive");
    repository::save_term_documents(&pool, &documents(&newer)).await.expect("Failed to archive");

    let service = RefreshService::new(
        pool.clone(),
        Arc::new(UnpublishedTermSource),
        Arc::new(JsonTermParser),
    );
    let report = service.rebuild_from_stored().await.expect("Rebuild failed");

    assert_eq!(report.terms, vec![TermId::new(2024, 10), TermId::new(2024, 20)]);
    assert_eq!(report.sections_written, 3);

    let stored = repository::get_stored_course(&pool, 2024, 10, 10001)
        .await
        .expect("Failed to fetch")
        .expect("Course not found");
    assert_eq!(stored.schedule, vec![lecture]);
    assert_eq!(repository::count_sections(&pool, Some(2024), Some(20)).await.unwrap(), 2);

    let info = repository::get_course_info(&pool, "PHYS", 1125)
        .await
        .expect("Failed to fetch course info")
        .expect("Course info not found");
    assert_eq!(info.title, "Physics with Calculus I");
    assert_eq!(info.ut, Some(true));

    let again = service.rebuild_from_stored().await.expect("Second rebuild failed");
    assert_eq!(again.sections_written, 3);
    assert_eq!(repository::summary(&pool).await.unwrap().sections, 3);
}

#[tokio::test]
async fn test_rebuild_with_unparsable_document_does_not_write() {
    let pool = connect_in_memory().await.expect("Failed to create database");
    let good = term(2024, 10, vec![course(10001, 30, vec![])]);
    let broken = TermDocuments {
        sections: "<html>".to_string(),
        ..documents(&term(2024, 20, vec![]))
    };

    repository::save_term_documents(&pool, &documents(&good)).await.expect("Failed to archive");
    repository::save_term_documents(&pool, &broken).await.expect("Failed to archive");

    let service = RefreshService::new(
        pool.clone(),
        Arc::new(UnpublishedTermSource),
        Arc::new(JsonTermParser),
    );
    let result = service.rebuild_from_stored().await;

    assert!(matches!(result, Err(AppError::Source(_))));
    let summary = repository::summary(&pool).await.unwrap();
    assert_eq!(summary.sections, 0);
    assert_eq!(summary.course_info, 0);
}
