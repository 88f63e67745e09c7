//! Vital-status inference over the record graph.
//!
//! # Responsibility
//! - First pass: per-person death/living heuristics (`death`, `living`).
//! - Second pass: household flood-fill of `Living` to a fixed point
//!   (`propagate`), then the closed-world `Dead` default.
//! - Independent cutoff pass (`cutoff`) and the print decisions
//!   (`visibility`).
//!
//! # Invariants
//! - First-pass decisions read only static event data, so they do not depend
//!   on scan order.
//! - Status and flag writes are upgrade-only; already classified people are
//!   never reclassified.
//! - Dangling references are recorded in `Diagnostics` and skipped.

pub mod cutoff;
pub mod death;
pub mod living;
pub mod names;
pub mod problems;
pub mod propagate;
pub mod visibility;

use crate::dates::AgeClock;
use crate::diagnostics::{DanglingTarget, Diagnostics, RefOrigin};
use crate::model::event::{EventFact, EventType};
use crate::model::family::{Family, FamilyId};
use crate::model::graph::RecordGraph;
use crate::model::person::{Person, PersonId, VitalStatus};
use log::debug;
use std::collections::BTreeSet;

pub(crate) const DEAD_IF_OLDER_THAN: i64 = 110;
pub(crate) const DEAD_IF_MARRIED: i64 = 90;
pub(crate) const LIVING_IF_SPOUSE_YOUNGER_THAN: i64 = 110;
pub(crate) const LIVING_IF_CHILD_YOUNGER_THAN: i64 = 90;
pub(crate) const LIVING_IF_PARENTS_MARRIED: i64 = 110;
pub(crate) const LIVING_IF_PARENTS_YOUNGER_THAN: i64 = 130;
pub(crate) const LIVING_IF_SIBLING_YOUNGER_THAN: i64 = 110;

/// Date/place tokens a source uses to withhold data about a living person.
pub const LIVING_MARKER_WORDS: &[&str] = &["living", "private", "alive", "details withheld"];

const NO_DEATH_TOKEN: &str = "n";

pub(crate) fn is_living_marker(text: &str) -> bool {
    LIVING_MARKER_WORDS.contains(&text.trim().to_lowercase().as_str())
}

/// Death/burial text that asserts a death: non-empty, not a living marker
/// and not the "no death" token `n`.
pub(crate) fn is_dead_text(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    !lowered.is_empty() && !is_living_marker(&lowered) && lowered != NO_DEATH_TOKEN
}

pub(crate) fn is_no_death_text(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(NO_DEATH_TOKEN)
}

/// A person's own events point to them being alive: a living-marker date, a
/// birth-like event fewer than `years` ago, or a death recorded as `n`.
pub(crate) fn has_living_evidence(clock: &AgeClock, events: &[EventFact], years: i64) -> bool {
    events.iter().any(|event| {
        let dated_evidence = event.normalized_date().is_some_and(|date| {
            is_living_marker(&date)
                || (event.kind.is_any_birth_like() && clock.age_is_less_than(event, years))
        });
        dated_evidence
            || (event.kind == EventType::Death
                && event.text_fields().iter().any(|text| is_no_death_text(text)))
    })
}

/// A birth, christening or baptism at least `years` ago.
pub(crate) fn has_old_birth(clock: &AgeClock, events: &[EventFact], years: i64) -> bool {
    events.iter().any(|event| {
        event.kind.is_birth_like() && event.has_date() && clock.age_is_at_least(event, years)
    })
}

/// Role in which a person is linked to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FamilyRole {
    Spouse,
    Child,
}

/// Resolves a family referenced by a person, recording a dangling reference
/// when it does not exist.
pub(crate) fn lookup_family<'g>(
    graph: &'g RecordGraph,
    person_id: &PersonId,
    family_id: &FamilyId,
    role: FamilyRole,
    diagnostics: &mut Diagnostics,
) -> Option<&'g Family> {
    let family = graph.family(family_id);
    if family.is_none() {
        let target = match role {
            FamilyRole::Spouse => DanglingTarget::SpouseOfFamily(family_id.clone()),
            FamilyRole::Child => DanglingTarget::ChildOfFamily(family_id.clone()),
        };
        diagnostics.dangling(RefOrigin::Person(person_id.clone()), target);
    }
    family
}

/// Resolves a member referenced by a family, recording a dangling reference
/// when it does not exist.
pub(crate) fn lookup_member<'g>(
    graph: &'g RecordGraph,
    family_id: &FamilyId,
    member_id: &PersonId,
    role: FamilyRole,
    diagnostics: &mut Diagnostics,
) -> Option<&'g Person> {
    let member = graph.person(member_id);
    if member.is_none() {
        let target = match role {
            FamilyRole::Spouse => DanglingTarget::Spouse(member_id.clone()),
            FamilyRole::Child => DanglingTarget::Child(member_id.clone()),
        };
        diagnostics.dangling(RefOrigin::Family(family_id.clone()), target);
    }
    member
}

/// Normalizes a requested scan order: unknown and repeated ids are dropped,
/// people missing from the request are appended in id order.
pub fn scan_order(graph: &RecordGraph, requested: &[PersonId]) -> Vec<PersonId> {
    let mut seen = BTreeSet::new();
    let mut order = Vec::with_capacity(graph.person_count());
    for id in requested {
        if graph.person(id).is_some() && seen.insert(id.clone()) {
            order.push(id.clone());
        }
    }
    for id in graph.person_ids() {
        if seen.insert(id.clone()) {
            order.push(id);
        }
    }
    order
}

/// Counts of first-pass decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstPassOutcome {
    pub dead: usize,
    pub living: usize,
    pub undecided: usize,
}

/// Applies the death classifier, then the living classifier, to every person
/// still `Unknown`.
///
/// Decisions are computed against the unmodified graph and applied
/// afterwards, so the outcome is independent of `order`.
pub fn classify_first_pass(
    graph: &mut RecordGraph,
    order: &[PersonId],
    clock: &AgeClock,
    diagnostics: &mut Diagnostics,
) -> FirstPassOutcome {
    let mut decisions = Vec::new();
    let mut outcome = FirstPassOutcome::default();

    for id in order {
        let Some(person) = graph.person(id) else {
            continue;
        };
        if person.vital_status().is_known() {
            continue;
        }
        if death::is_definitely_dead(graph, clock, person, diagnostics) {
            decisions.push((id.clone(), VitalStatus::Dead));
            outcome.dead += 1;
        } else if living::is_definitely_living(graph, clock, person, diagnostics) {
            decisions.push((id.clone(), VitalStatus::Living));
            outcome.living += 1;
        } else {
            outcome.undecided += 1;
        }
    }

    for (id, status) in decisions {
        if let Some(person) = graph.person_mut(&id) {
            person.mark_vital_status(status);
        }
    }

    debug!(
        "event=first_pass module=classify status=ok dead={} living={} undecided={}",
        outcome.dead, outcome.living, outcome.undecided
    );
    outcome
}

/// Closed-world default: every person still `Unknown` becomes `Dead`.
///
/// Must run strictly after `propagate::propagate_living` reached its fixed
/// point.
pub fn default_unknown_to_dead(graph: &mut RecordGraph) -> usize {
    let unknown: Vec<PersonId> = graph
        .people()
        .filter(|person| !person.vital_status().is_known())
        .map(|person| person.id.clone())
        .collect();
    for id in &unknown {
        if let Some(person) = graph.person_mut(id) {
            person.mark_vital_status(VitalStatus::Dead);
        }
    }
    unknown.len()
}
