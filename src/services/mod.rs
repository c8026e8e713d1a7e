pub mod change_detector;
pub mod refresh_service;
pub mod scheduler;

pub use change_detector::{detect_changes, diff_course};
pub use refresh_service::{RebuildReport, RefreshReport, RefreshService};
pub use scheduler::RefreshScheduler;
