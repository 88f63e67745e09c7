//! Persistence of classification results.
//!
//! # Responsibility
//! - Define the report storage contract used by callers.
//! - Keep SQLite query details out of the classification service.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`RunNotFound`, `DuplicateRun`)
//!   in addition to DB transport errors.

pub mod report_repo;
