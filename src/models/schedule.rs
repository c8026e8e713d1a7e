use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleType {
    Lecture,
    Lab,
    Seminar,
    Exam,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Lecture => "Lecture",
            ScheduleType::Lab => "Lab",
            ScheduleType::Seminar => "Seminar",
            ScheduleType::Exam => "Exam",
        }
    }
}

impl FromStr for ScheduleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lecture" => Ok(ScheduleType::Lecture),
            "Lab" => Ok(ScheduleType::Lab),
            "Seminar" => Ok(ScheduleType::Seminar),
            "Exam" => Ok(ScheduleType::Exam),
            other => Err(AppError::IntegrityViolation(format!(
                "unknown schedule type: {}",
                other
            ))),
        }
    }
}

/// One meeting of a section. Two entries are the same meeting iff every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "type")]
    pub kind: ScheduleType,
    pub days: String,
    pub time: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub room: String,
    pub instructor: String,
}

impl ScheduleEntry {
    pub fn is_in(&self, schedule: &[ScheduleEntry]) -> bool {
        schedule.iter().any(|s| s == self)
    }
}
