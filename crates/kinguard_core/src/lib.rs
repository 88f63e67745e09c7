//! Core engine for kinguard.
//!
//! Classifies every person of a genealogical record graph as living or dead,
//! flags branches that predate a publication cutoff and decides what a
//! renderer may print. Storage of the resulting reports lives in `db` and
//! `repo`.

pub mod classify;
pub mod config;
pub mod dates;
pub mod db;
pub mod diagnostics;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use classify::visibility::VisibilityResolver;
pub use config::{ClassifierConfig, ConfigError};
pub use dates::{AgeClock, DateIntervals, DayRange, GedcomDateParser};
pub use diagnostics::{DanglingReference, DanglingTarget, Diagnostics, RefOrigin};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{EventFact, EventType};
pub use model::family::{ChildRef, Family, FamilyId};
pub use model::graph::RecordGraph;
pub use model::person::{Gender, Name, Person, PersonId, VitalStatus};
pub use report::{ClassificationReport, FamilyOutcome, PersonOutcome, ReportSummary};
pub use repo::report_repo::{
    ReportRepoError, ReportRepoResult, ReportRepository, RunSummary, SqliteReportRepository,
};
pub use service::classification_service::{
    ClassificationService, ClassifyError, ClassifyResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
