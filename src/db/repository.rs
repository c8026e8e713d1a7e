use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{
    AttributeEntry, CatalogueEntry, Course, CourseInfo, ScheduleEntry, Term, TermDocuments,
    TermId, TransferAgreement,
};

#[derive(Debug, FromRow)]
struct SectionRow {
    crn: i64,
    rp: Option<String>,
    seats: Option<i64>,
    waitlist: Option<i64>,
    subject: String,
    course_code: i64,
    section: String,
    credits: f64,
    title: String,
    additional_fees: Option<f64>,
    repeat_limit: Option<i64>,
    notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct ScheduleRow {
    kind: String,
    days: String,
    time: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    room: String,
    instructor: String,
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = AppError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(ScheduleEntry {
            kind: row.kind.parse()?,
            days: row.days,
            time: row.time,
            start_date: row.start_date,
            end_date: row.end_date,
            room: row.room,
            instructor: row.instructor,
        })
    }
}

/// Row counts of every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub term_documents: i64,
    pub course_info: i64,
    pub sections: i64,
    pub schedules: i64,
    pub transfer_agreements: i64,
}

/// Writes every section of `term`, replacing the schedule of each one.
///
/// Runs in a single transaction: on any failure the previously stored state is left untouched.
pub async fn upsert_term(db: &SqlitePool, term: &Term) -> Result<usize, AppError> {
    term.ensure_unique_crns()?;

    let mut tx = db.begin().await?;

    for course in &term.courses {
        sqlx::query(
            r#"
            INSERT INTO Sections
                (year, term, crn, rp, seats, waitlist, subject, course_code, section,
                credits, title, additional_fees, repeat_limit, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT (year, term, crn) DO UPDATE SET
                rp = excluded.rp,
                seats = excluded.seats,
                waitlist = excluded.waitlist,
                subject = excluded.subject,
                course_code = excluded.course_code,
                section = excluded.section,
                credits = excluded.credits,
                title = excluded.title,
                additional_fees = excluded.additional_fees,
                repeat_limit = excluded.repeat_limit,
                notes = excluded.notes
            "#,
        )
        .bind(term.year)
        .bind(term.term)
        .bind(course.crn)
        .bind(&course.rp)
        .bind(course.seats)
        .bind(course.waitlist)
        .bind(&course.subject)
        .bind(course.course_code)
        .bind(&course.section)
        .bind(course.credits)
        .bind(&course.title)
        .bind(course.add_fees)
        .bind(course.rpt_limit)
        .bind(&course.notes)
        .execute(&mut *tx)
        .await?;

        // The source drops meetings between fetches, so the stored schedule is rebuilt from scratch.
        sqlx::query("DELETE FROM Schedules WHERE year = ? AND term = ? AND crn = ?")
            .bind(term.year)
            .bind(term.term)
            .bind(course.crn)
            .execute(&mut *tx)
            .await?;

        for entry in &course.schedule {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO Schedules
                    (year, term, crn, type, days, time, start_date, end_date, room, instructor)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(term.year)
            .bind(term.term)
            .bind(course.crn)
            .bind(entry.kind.as_str())
            .bind(&entry.days)
            .bind(&entry.time)
            .bind(entry.start_date)
            .bind(entry.end_date)
            .bind(&entry.room)
            .bind(&entry.instructor)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    info!("stored {} sections for {}", term.courses.len(), term.id());
    Ok(term.courses.len())
}

/// Replaces catalogue rows by `(subject, course_code)`, then patches attribute flags onto them.
pub async fn upsert_catalogue_and_attributes(
    db: &SqlitePool,
    catalogue: &[CatalogueEntry],
    attributes: &[AttributeEntry],
) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    for entry in catalogue {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO CourseInfo
                (subject, course_code, credits, title, description,
                lecture_hours, seminar_hours, lab_hours,
                AR, SC, HUM, LSC, SCI, SOC, UT)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL, NULL, NULL, NULL, NULL)
            "#,
        )
        .bind(&entry.subject)
        .bind(entry.course_code)
        .bind(entry.credits)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(entry.lecture_hours)
        .bind(entry.seminar_hours)
        .bind(entry.lab_hours)
        .execute(&mut *tx)
        .await?;
    }

    let mut unmatched = 0;
    for attr in attributes {
        let affected = sqlx::query(
            r#"
            UPDATE CourseInfo
            SET AR = ?, SC = ?, HUM = ?, LSC = ?, SCI = ?, SOC = ?, UT = ?
            WHERE subject = ? AND course_code = ?
            "#,
        )
        .bind(attr.ar)
        .bind(attr.sc)
        .bind(attr.hum)
        .bind(attr.lsc)
        .bind(attr.sci)
        .bind(attr.soc)
        .bind(attr.ut)
        .bind(&attr.subject)
        .bind(attr.course_code)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            unmatched += 1;
        }
    }

    tx.commit().await?;

    if unmatched > 0 {
        debug!("{} attribute entries had no catalogue row", unmatched);
    }
    info!(
        "stored {} catalogue entries and {} attribute entries",
        catalogue.len(),
        attributes.len()
    );
    Ok(())
}

pub async fn upsert_transfer_agreements(
    db: &SqlitePool,
    agreements: &[TransferAgreement],
) -> Result<usize, AppError> {
    let mut tx = db.begin().await?;

    for t in agreements {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO TransferInformation
                (subject, course_code, source, destination, credit, effective_start, effective_end)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&t.subject)
        .bind(t.course_code)
        .bind(&t.source)
        .bind(&t.destination)
        .bind(&t.credit)
        .bind(&t.effective_start)
        .bind(&t.effective_end)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!("stored {} transfer agreements", agreements.len());
    Ok(agreements.len())
}

/// Archives the raw documents a term was parsed from.
pub async fn save_term_documents(db: &SqlitePool, docs: &TermDocuments) -> Result<(), AppError> {
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT OR REPLACE INTO TermDocuments
            (year, term, sections, catalogue, attributes, fetched_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(docs.year)
    .bind(docs.term)
    .bind(&docs.sections)
    .bind(&docs.catalogue)
    .bind(&docs.attributes)
    .bind(now)
    .execute(db)
    .await?;

    Ok(())
}

/// Every archived term document, newest first.
pub async fn fetch_all_term_documents(db: &SqlitePool) -> Result<Vec<TermDocuments>, AppError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String, String)>(
        r#"
        SELECT year, term, sections, catalogue, attributes
        FROM TermDocuments
        ORDER BY year DESC, term DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(year, term, sections, catalogue, attributes)| TermDocuments {
            year,
            term,
            sections,
            catalogue,
            attributes,
        })
        .collect())
}

/// Reconstructs a stored section with its full schedule.
pub async fn get_stored_course(
    db: &SqlitePool,
    year: i64,
    term: i64,
    crn: i64,
) -> Result<Option<Course>, AppError> {
    let row = sqlx::query_as::<_, SectionRow>(
        r#"
        SELECT crn, rp, seats, waitlist, subject, course_code, section, credits, title,
            additional_fees, repeat_limit, notes
        FROM Sections
        WHERE year = ? AND term = ? AND crn = ?
        "#,
    )
    .bind(year)
    .bind(term)
    .bind(crn)
    .fetch_optional(db)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Ok(None),
    };

    let schedule = get_schedules(db, year, term, crn).await?;

    Ok(Some(Course {
        crn: row.crn,
        rp: row.rp,
        seats: row.seats,
        waitlist: row.waitlist,
        subject: row.subject,
        course_code: row.course_code,
        section: row.section,
        credits: row.credits,
        title: row.title,
        add_fees: row.additional_fees,
        rpt_limit: row.repeat_limit,
        notes: row.notes,
        schedule,
    }))
}

async fn get_schedules(
    db: &SqlitePool,
    year: i64,
    term: i64,
    crn: i64,
) -> Result<Vec<ScheduleEntry>, AppError> {
    let rows = sqlx::query_as::<_, ScheduleRow>(
        r#"
        SELECT type AS kind, days, time, start_date, end_date, room, instructor
        FROM Schedules
        WHERE year = ? AND term = ? AND crn = ?
        ORDER BY rowid
        "#,
    )
    .bind(year)
    .bind(term)
    .bind(crn)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(ScheduleEntry::try_from).collect()
}

/// Every term the store knows about, newest first.
pub async fn list_terms(db: &SqlitePool) -> Result<Vec<TermId>, AppError> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT year, term FROM Sections
        UNION
        SELECT year, term FROM TermDocuments
        ORDER BY year DESC, term DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(|(year, term)| TermId::new(year, term)).collect())
}

pub async fn get_most_recent_term(db: &SqlitePool) -> Result<Option<TermId>, AppError> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT year, term FROM Sections
        UNION
        SELECT year, term FROM TermDocuments
        ORDER BY year DESC, term DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(year, term)| TermId::new(year, term)))
}

pub async fn count_sections(
    db: &SqlitePool,
    year: Option<i64>,
    term: Option<i64>,
) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM Sections
        WHERE (?1 IS NULL OR year = ?1) AND (?2 IS NULL OR term = ?2)
        "#,
    )
    .bind(year)
    .bind(term)
    .fetch_one(db)
    .await?;

    Ok(count)
}

pub async fn summary(db: &SqlitePool) -> Result<StoreSummary, AppError> {
    let (term_documents, course_info, sections, schedules, transfer_agreements) =
        sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM TermDocuments),
                (SELECT COUNT(*) FROM CourseInfo),
                (SELECT COUNT(*) FROM Sections),
                (SELECT COUNT(*) FROM Schedules),
                (SELECT COUNT(*) FROM TransferInformation)
            "#,
        )
        .fetch_one(db)
        .await?;

    Ok(StoreSummary {
        term_documents,
        course_info,
        sections,
        schedules,
        transfer_agreements,
    })
}

pub async fn get_course_info(
    db: &SqlitePool,
    subject: &str,
    course_code: i64,
) -> Result<Option<CourseInfo>, AppError> {
    let info = sqlx::query_as::<_, CourseInfo>(
        r#"
        SELECT subject, course_code, credits, title, description,
            lecture_hours, seminar_hours, lab_hours,
            AR AS ar, SC AS sc, HUM AS hum, LSC AS lsc, SCI AS sci, SOC AS soc, UT AS ut
        FROM CourseInfo
        WHERE subject = ? AND course_code = ?
        "#,
    )
    .bind(subject)
    .bind(course_code)
    .fetch_optional(db)
    .await?;

    Ok(info)
}

pub async fn fetch_transfer_agreements(
    db: &SqlitePool,
    subject: &str,
    course_code: i64,
) -> Result<Vec<TransferAgreement>, AppError> {
    let agreements = sqlx::query_as::<_, TransferAgreement>(
        r#"
        SELECT subject, course_code, source, destination, credit, effective_start, effective_end
        FROM TransferInformation
        WHERE subject = ? AND course_code = ?
        ORDER BY destination, effective_start
        "#,
    )
    .bind(subject)
    .bind(course_code)
    .fetch_all(db)
    .await?;

    Ok(agreements)
}
