use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credit-transfer equivalence for a course to or from another institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TransferAgreement {
    pub subject: String,
    pub course_code: i64,
    pub source: String,
    pub destination: String,
    pub credit: String,
    pub effective_start: String,
    pub effective_end: String,
}
