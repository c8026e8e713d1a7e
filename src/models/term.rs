use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Course;
use crate::error::AppError;

/// Identifies one academic term. Ordering is by year, then term code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermId {
    pub year: i64,
    pub term: i64,
}

impl TermId {
    pub fn new(year: i64, term: i64) -> Self {
        Self { year, term }
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:02}", self.year, self.term)
    }
}

/// All sections offered in one term, as produced by the section parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub year: i64,
    pub term: i64,
    pub courses: Vec<Course>,
}

impl Term {
    pub fn id(&self) -> TermId {
        TermId::new(self.year, self.term)
    }

    /// A CRN may appear at most once per term.
    pub fn ensure_unique_crns(&self) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.crn) {
                return Err(AppError::IntegrityViolation(format!(
                    "duplicate crn {} in term {}",
                    course.crn,
                    self.id()
                )));
            }
        }
        Ok(())
    }
}

/// Raw documents of one term as returned by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDocuments {
    pub year: i64,
    pub term: i64,
    pub sections: String,
    pub catalogue: String,
    pub attributes: String,
}

impl TermDocuments {
    pub fn id(&self) -> TermId {
        TermId::new(self.year, self.term)
    }
}
