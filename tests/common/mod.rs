#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use chrono::NaiveDate;
use course_info::error::AppError;
use course_info::models::{
    AttributeEntry, CatalogueEntry, Course, ScheduleEntry, ScheduleType, Term, TermDocuments,
    TermId,
};
use course_info::source::TermSource;

/// Serves fixed documents and counts how often it was asked.
pub struct StaticTermSource {
    pub docs: TermDocuments,
    pub calls: AtomicUsize,
}

impl StaticTermSource {
    pub fn new(docs: TermDocuments) -> Self {
        Self {
            docs,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TermSource for StaticTermSource {
    async fn fetch_term(&self, _term: TermId) -> Result<TermDocuments, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.docs.clone())
    }
}

pub struct UnpublishedTermSource;

#[async_trait]
impl TermSource for UnpublishedTermSource {
    async fn fetch_term(&self, term: TermId) -> Result<TermDocuments, AppError> {
        Err(AppError::Source(format!("term {} is not published yet", term)))
    }
}

/// Sends a signal after every fetch attempt of the wrapped source, successful or not.
pub struct SignallingSource<S> {
    pub inner: S,
    pub fetched: mpsc::UnboundedSender<()>,
}

#[async_trait]
impl<S: TermSource> TermSource for SignallingSource<S> {
    async fn fetch_term(&self, term: TermId) -> Result<TermDocuments, AppError> {
        let result = self.inner.fetch_term(term).await;
        let _ = self.fetched.send(());
        result
    }
}

pub fn meeting(kind: ScheduleType, days: &str) -> ScheduleEntry {
    ScheduleEntry {
        kind,
        days: days.to_string(),
        time: "1230-1420".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 2).unwrap(),
        room: "A130".to_string(),
        instructor: "Moreau, Claire".to_string(),
    }
}

pub fn course(crn: i64, seats: i64, schedule: Vec<ScheduleEntry>) -> Course {
    Course {
        crn,
        rp: None,
        seats: Some(seats),
        waitlist: Some(0),
        subject: "PHYS".to_string(),
        course_code: 1125,
        section: "001".to_string(),
        credits: 5.0,
        title: "Physics with Calculus I".to_string(),
        add_fees: Some(45.0),
        rpt_limit: Some(2),
        notes: None,
        schedule,
    }
}

pub fn term(year: i64, term: i64, courses: Vec<Course>) -> Term {
    Term { year, term, courses }
}

pub fn catalogue() -> Vec<CatalogueEntry> {
    vec![CatalogueEntry {
        subject: "PHYS".to_string(),
        course_code: 1125,
        credits: 5.0,
        title: "Physics with Calculus I".to_string(),
        description: Some("Kinematics, dynamics and energy.".to_string()),
        lecture_hours: 4,
        seminar_hours: 0,
        lab_hours: 3,
    }]
}

pub fn attributes() -> Vec<AttributeEntry> {
    vec![AttributeEntry {
        subject: "PHYS".to_string(),
        course_code: 1125,
        ar: false,
        sc: true,
        hum: false,
        lsc: true,
        sci: true,
        soc: false,
        ut: true,
    }]
}

pub fn documents(fresh: &Term) -> TermDocuments {
    TermDocuments {
        year: fresh.year,
        term: fresh.term,
        sections: serde_json::to_string(fresh).expect("Failed to encode term"),
        catalogue: serde_json::to_string(&catalogue()).expect("Failed to encode catalogue"),
        attributes: serde_json::to_string(&attributes()).expect("Failed to encode attributes"),
    }
}
