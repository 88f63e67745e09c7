//! Classification report handed to renderers and persisted by
//! `repo::report_repo`.
//!
//! # Invariants
//! - Person rows are in birth order (undated last, ties by id).
//! - Family rows, warnings and problems are in id order.

use crate::classify::problems::{find_problems, DataProblem};
use crate::classify::visibility::VisibilityResolver;
use crate::config::ClassifierConfig;
use crate::diagnostics::{DanglingReference, Diagnostics};
use crate::model::family::FamilyId;
use crate::model::graph::RecordGraph;
use crate::model::person::{Person, PersonId, VitalStatus};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonOutcome {
    pub id: PersonId,
    pub title: String,
    pub vital_status: VitalStatus,
    pub born_before_cutoff: bool,
    pub before_cutoff: bool,
    pub included: bool,
    pub always_print: bool,
    pub should_print: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyOutcome {
    pub id: FamilyId,
    pub before_cutoff: bool,
    pub always_print: bool,
}

/// Per-stage counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub first_pass_dead: usize,
    pub first_pass_living: usize,
    pub propagated_living: usize,
    pub defaulted_dead: usize,
    pub born_before_cutoff: usize,
    pub always_print_people: usize,
    pub always_print_families: usize,
    pub masked_names: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub people: usize,
    pub families: usize,
    pub living: usize,
    pub dead: usize,
    pub unknown: usize,
    pub before_cutoff: usize,
    pub included: usize,
    pub printed: usize,
    pub warnings: usize,
    pub problems: usize,
    pub stages: StageCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub run_id: Uuid,
    pub current_year: i64,
    pub config: ClassifierConfig,
    pub people: Vec<PersonOutcome>,
    pub families: Vec<FamilyOutcome>,
    pub warnings: Vec<DanglingReference>,
    pub problems: Vec<DataProblem>,
    pub summary: ReportSummary,
}

impl ClassificationReport {
    /// Snapshots the classified graph.
    pub fn build(
        graph: &RecordGraph,
        config: &ClassifierConfig,
        current_year: i64,
        diagnostics: &Diagnostics,
        stages: StageCounts,
    ) -> Self {
        let resolver = VisibilityResolver::new(graph);

        let mut ordered: Vec<&Person> = graph.people().collect();
        ordered.sort_by(|left, right| left.cmp_by_birth(right));
        let people: Vec<PersonOutcome> = ordered
            .into_iter()
            .map(|person| person_outcome(&resolver, person))
            .collect();

        let families: Vec<FamilyOutcome> = graph
            .families()
            .map(|family| FamilyOutcome {
                id: family.id.clone(),
                before_cutoff: resolver.family_is_before_cutoff(&family.id).unwrap_or(false),
                always_print: family.always_print(),
            })
            .collect();

        let warnings: Vec<DanglingReference> =
            diagnostics.dangling_references().cloned().collect();
        let problems: Vec<DataProblem> = graph.people().flat_map(find_problems).collect();

        let count = |predicate: &dyn Fn(&PersonOutcome) -> bool| {
            people.iter().filter(|row| predicate(row)).count()
        };
        let summary = ReportSummary {
            people: people.len(),
            families: families.len(),
            living: count(&|row| row.vital_status == VitalStatus::Living),
            dead: count(&|row| row.vital_status == VitalStatus::Dead),
            unknown: count(&|row| row.vital_status == VitalStatus::Unknown),
            before_cutoff: count(&|row| row.before_cutoff),
            included: count(&|row| row.included),
            printed: count(&|row| row.should_print),
            warnings: warnings.len(),
            problems: problems.len(),
            stages,
        };

        Self {
            run_id: Uuid::new_v4(),
            current_year,
            config: config.clone(),
            people,
            families,
            warnings,
            problems,
            summary,
        }
    }

    pub fn person(&self, id: &PersonId) -> Option<&PersonOutcome> {
        self.people.iter().find(|row| &row.id == id)
    }
}

fn person_outcome(resolver: &VisibilityResolver<'_>, person: &Person) -> PersonOutcome {
    let id = &person.id;
    PersonOutcome {
        id: id.clone(),
        title: person.display_title(),
        vital_status: person.vital_status(),
        born_before_cutoff: person.is_born_before_cutoff(),
        before_cutoff: resolver.is_before_cutoff(id).unwrap_or(false),
        included: resolver.is_included(id).unwrap_or(false),
        always_print: person.always_print(),
        should_print: resolver.should_print(id).unwrap_or(false),
    }
}
