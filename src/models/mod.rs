pub mod catalogue;
pub mod course;
pub mod schedule;
pub mod term;
pub mod transfer;

pub use catalogue::{AttributeEntry, CatalogueEntry, CourseInfo};
pub use course::{Course, CourseChange};
pub use schedule::{ScheduleEntry, ScheduleType};
pub use term::{Term, TermDocuments, TermId};
pub use transfer::TransferAgreement;
