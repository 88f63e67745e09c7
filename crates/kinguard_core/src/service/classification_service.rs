//! Classification use-case service.
//!
//! # Responsibility
//! - Run every stage over one record graph in the required order.
//! - Log per-stage counts and timings, and assemble the report.
//!
//! # Invariants
//! - The closed-world default runs strictly after propagation reached its
//!   fixed point.
//! - Name masking runs only after both passes; it never feeds back into
//!   classification.
//! - Running twice on the same graph yields the same statuses and flags.

use crate::classify::cutoff::mark_all_born_before_cutoff;
use crate::classify::names::mask_unconfirmed_living_names;
use crate::classify::propagate::propagate_living;
use crate::classify::visibility::mark_always_print;
use crate::classify::{classify_first_pass, default_unknown_to_dead, scan_order};
use crate::config::{ClassifierConfig, ConfigError};
use crate::dates::{DateIntervals, GedcomDateParser};
use crate::diagnostics::Diagnostics;
use crate::model::graph::RecordGraph;
use crate::model::person::PersonId;
use crate::report::{ClassificationReport, StageCounts};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ClassifyResult<T> = Result<T, ClassifyError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    Config(ConfigError),
}

impl Display for ClassifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid classifier config: {err}"),
        }
    }
}

impl Error for ClassifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ClassifyError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Runs the classification pipeline with a fixed config and date service.
pub struct ClassificationService<D: DateIntervals> {
    config: ClassifierConfig,
    dates: D,
}

impl ClassificationService<GedcomDateParser> {
    /// Service using the built-in GEDCOM date parser.
    pub fn with_default_dates(config: ClassifierConfig) -> Self {
        Self::new(config, GedcomDateParser::new())
    }
}

impl<D: DateIntervals> ClassificationService<D> {
    pub fn new(config: ClassifierConfig, dates: D) -> Self {
        Self { config, dates }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies `graph` in id order.
    pub fn run(&self, graph: &mut RecordGraph) -> ClassifyResult<ClassificationReport> {
        self.run_with_order(graph, &[])
    }

    /// Classifies `graph`, scanning people in `order` first; ids missing from
    /// `order` follow in id order. The outcome does not depend on `order`.
    ///
    /// # Errors
    /// - `ClassifyError::Config` when the config fails validation; the graph
    ///   is left untouched.
    pub fn run_with_order(
        &self,
        graph: &mut RecordGraph,
        order: &[PersonId],
    ) -> ClassifyResult<ClassificationReport> {
        let started_at = Instant::now();
        if let Err(err) = self.config.validate() {
            error!(
                "event=classify_run module=service status=error error_code=invalid_config error={}",
                err
            );
            return Err(err.into());
        }
        info!(
            "event=classify_run module=service status=start people={} families={}",
            graph.person_count(),
            graph.family_count()
        );

        let clock = self.config.age_clock();
        let mut diagnostics = Diagnostics::new();
        let mut stages = StageCounts::default();

        let stage_at = Instant::now();
        graph.resolve_dates(&self.dates);
        log_stage("resolve_dates", stage_at, graph.person_count());

        let order = scan_order(graph, order);

        let stage_at = Instant::now();
        let first_pass = classify_first_pass(graph, &order, &clock, &mut diagnostics);
        stages.first_pass_dead = first_pass.dead;
        stages.first_pass_living = first_pass.living;
        log_stage("first_pass", stage_at, first_pass.dead + first_pass.living);

        let stage_at = Instant::now();
        stages.propagated_living = propagate_living(graph, &order, &mut diagnostics);
        log_stage("propagate_living", stage_at, stages.propagated_living);

        let stage_at = Instant::now();
        stages.defaulted_dead = default_unknown_to_dead(graph);
        log_stage("default_dead", stage_at, stages.defaulted_dead);

        let stage_at = Instant::now();
        stages.born_before_cutoff =
            mark_all_born_before_cutoff(graph, self.config.cutoff_day, &mut diagnostics);
        log_stage("cutoff", stage_at, stages.born_before_cutoff);

        let stage_at = Instant::now();
        let always_print =
            mark_always_print(graph, self.config.ancestor_generations, &mut diagnostics);
        stages.always_print_people = always_print.people;
        stages.always_print_families = always_print.families;
        log_stage("always_print", stage_at, always_print.people);

        if self.config.mask_unconfirmed_living_names {
            let stage_at = Instant::now();
            stages.masked_names = mask_unconfirmed_living_names(graph);
            log_stage("mask_names", stage_at, stages.masked_names);
        }

        let report = ClassificationReport::build(
            graph,
            &self.config,
            clock.current_year(),
            &diagnostics,
            stages,
        );
        info!(
            "event=classify_run module=service status=ok run_id={} living={} dead={} printed={} warnings={} duration_ms={}",
            report.run_id,
            report.summary.living,
            report.summary.dead,
            report.summary.printed,
            report.summary.warnings,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }
}

fn log_stage(stage: &str, started_at: Instant, count: usize) {
    info!(
        "event=classify_stage module=service status=ok stage={} count={} duration_ms={}",
        stage,
        count,
        started_at.elapsed().as_millis()
    );
}
