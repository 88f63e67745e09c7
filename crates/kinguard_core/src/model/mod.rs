//! Record graph data model.
//!
//! # Responsibility
//! - Define people, families and event facts as produced by the importer.
//! - Keep relationships as ids inside one arena (`RecordGraph`) so malformed
//!   or cyclic references never become ownership cycles.
//!
//! # Invariants
//! - Every node is identified by a stable source id.
//! - Classification state only moves up the lattice; see `person`.

pub mod event;
pub mod family;
pub mod graph;
pub mod person;
