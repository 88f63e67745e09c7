//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the classification passes into one run.
//! - Keep CLI and storage layers decoupled from the passes.

pub mod classification_service;
