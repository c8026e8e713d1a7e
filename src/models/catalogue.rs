use serde::{Deserialize, Serialize};

/// Catalogue description of a course, independent of any term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub subject: String,
    pub course_code: i64,
    pub credits: f64,
    pub title: String,
    pub description: Option<String>,
    pub lecture_hours: i64,
    pub seminar_hours: i64,
    pub lab_hours: i64,
}

/// Education requirement flags for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub subject: String,
    pub course_code: i64,
    pub ar: bool,
    pub sc: bool,
    pub hum: bool,
    pub lsc: bool,
    pub sci: bool,
    pub soc: bool,
    pub ut: bool,
}

/// A stored `CourseInfo` row. Attribute flags stay `None` until an attribute entry is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseInfo {
    pub subject: String,
    pub course_code: i64,
    pub credits: f64,
    pub title: String,
    pub description: Option<String>,
    pub lecture_hours: i64,
    pub seminar_hours: i64,
    pub lab_hours: i64,
    pub ar: Option<bool>,
    pub sc: Option<bool>,
    pub hum: Option<bool>,
    pub lsc: Option<bool>,
    pub sci: Option<bool>,
    pub soc: Option<bool>,
    pub ut: Option<bool>,
}
