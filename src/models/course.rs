use serde::{Deserialize, Serialize};

use super::ScheduleEntry;

/// A single offered section within a term, identified by `(year, term, crn)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub crn: i64,
    pub rp: Option<String>,
    pub seats: Option<i64>,
    pub waitlist: Option<i64>,
    pub subject: String,
    pub course_code: i64,
    pub section: String,
    pub credits: f64,
    pub title: String,
    pub add_fees: Option<f64>,
    pub rpt_limit: Option<i64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

impl Course {
    /// Compares every tracked field except the schedule.
    pub fn same_offering(&self, other: &Course) -> bool {
        self.crn == other.crn
            && self.rp == other.rp
            && self.seats == other.seats
            && self.waitlist == other.waitlist
            && self.subject == other.subject
            && self.course_code == other.course_code
            && self.section == other.section
            && self.credits == other.credits
            && self.title == other.title
            && self.add_fees == other.add_fees
            && self.rpt_limit == other.rpt_limit
            && self.notes == other.notes
    }
}

/// One entry of a change report: `previous` is `None` for a course never seen before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChange {
    pub previous: Option<Course>,
    pub current: Course,
}

impl CourseChange {
    pub fn is_new(&self) -> bool {
        self.previous.is_none()
    }
}
