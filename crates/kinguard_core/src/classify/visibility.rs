//! Print decisions consumed by renderers.
//!
//! # Responsibility
//! - Answer emptiness, before-cutoff, included and should-print per person.
//! - Answer before-cutoff per family.
//! - Seed `always_print` with a bounded ancestor walk from living people.
//!
//! # Invariants
//! - Predicates are read-only and never record diagnostics; dangling family
//!   and member ids are ignored here (the passes already reported them).
//! - A family is before cutoff iff every resolvable spouse and child is
//!   flagged born-before-cutoff. This never recurses back into persons.

use super::{lookup_family, lookup_member, FamilyRole};
use crate::diagnostics::Diagnostics;
use crate::model::family::{Family, FamilyId};
use crate::model::graph::RecordGraph;
use crate::model::person::{Person, PersonId, VitalStatus};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// No alternate names, events, notes, citations or family memberships.
pub fn is_empty(person: &Person) -> bool {
    person.alt_names.is_empty()
        && person.events.is_empty()
        && person.notes.is_empty()
        && person.citations.is_empty()
        && !person.has_families()
}

pub fn family_is_before_cutoff(graph: &RecordGraph, family: &Family) -> bool {
    family
        .members()
        .filter_map(|id| graph.person(id))
        .all(Person::is_born_before_cutoff)
}

/// Born before cutoff and every family the person belongs to is before
/// cutoff too.
pub fn is_before_cutoff(graph: &RecordGraph, person: &Person) -> bool {
    person.is_born_before_cutoff()
        && person
            .families()
            .filter_map(|id| graph.family(id))
            .all(|family| family_is_before_cutoff(graph, family))
}

pub fn is_included(graph: &RecordGraph, person: &Person) -> bool {
    !person.is_living() && !is_empty(person) && !is_before_cutoff(graph, person)
}

pub fn should_print(graph: &RecordGraph, person: &Person) -> bool {
    person.always_print() || is_included(graph, person)
}

/// Read-only view answering renderer queries by id. Unknown ids answer
/// `None`.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'g> {
    graph: &'g RecordGraph,
}

impl<'g> VisibilityResolver<'g> {
    pub fn new(graph: &'g RecordGraph) -> Self {
        Self { graph }
    }

    pub fn vital_status(&self, id: &PersonId) -> Option<VitalStatus> {
        self.graph.person(id).map(Person::vital_status)
    }

    pub fn is_born_before_cutoff(&self, id: &PersonId) -> Option<bool> {
        self.graph.person(id).map(Person::is_born_before_cutoff)
    }

    pub fn is_before_cutoff(&self, id: &PersonId) -> Option<bool> {
        self.graph
            .person(id)
            .map(|person| is_before_cutoff(self.graph, person))
    }

    pub fn is_included(&self, id: &PersonId) -> Option<bool> {
        self.graph
            .person(id)
            .map(|person| is_included(self.graph, person))
    }

    pub fn should_print(&self, id: &PersonId) -> Option<bool> {
        self.graph
            .person(id)
            .map(|person| should_print(self.graph, person))
    }

    pub fn family_is_before_cutoff(&self, id: &FamilyId) -> Option<bool> {
        self.graph
            .family(id)
            .map(|family| family_is_before_cutoff(self.graph, family))
    }
}

/// People and families newly marked by the always-print walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysPrintOutcome {
    pub people: usize,
    pub families: usize,
}

/// Walks up from every living person, marking each person expanded with a
/// positive budget and that person's child-of families as always-print,
/// whatever the person's own status. Parents are expanded with one less.
///
/// `generations == 1` marks the living people and their parent families
/// only; `2` adds the parents, `3` the grandparents. `0` disables the walk.
pub fn mark_always_print(
    graph: &mut RecordGraph,
    generations: u32,
    diagnostics: &mut Diagnostics,
) -> AlwaysPrintOutcome {
    if generations == 0 {
        return AlwaysPrintOutcome::default();
    }

    let mut people: BTreeSet<PersonId> = BTreeSet::new();
    let mut families: BTreeSet<FamilyId> = BTreeSet::new();
    // Highest remaining budget a person has been expanded with.
    let mut best: BTreeMap<PersonId, u32> = BTreeMap::new();
    let mut stack: Vec<(PersonId, u32)> = graph
        .people()
        .filter(|person| person.is_living())
        .map(|person| (person.id.clone(), generations))
        .collect();

    while let Some((id, remaining)) = stack.pop() {
        if remaining == 0 || best.get(&id).is_some_and(|seen| *seen >= remaining) {
            continue;
        }
        best.insert(id.clone(), remaining);
        let Some(person) = graph.person(&id) else {
            continue;
        };
        people.insert(id.clone());
        for family_id in person.child_of_families() {
            let Some(family) =
                lookup_family(graph, &id, family_id, FamilyRole::Child, diagnostics)
            else {
                continue;
            };
            families.insert(family_id.clone());
            for parent_id in family.spouses() {
                if lookup_member(graph, family_id, parent_id, FamilyRole::Spouse, diagnostics)
                    .is_none()
                {
                    continue;
                }
                stack.push((parent_id.clone(), remaining - 1));
            }
        }
    }

    let mut outcome = AlwaysPrintOutcome::default();
    for id in &people {
        if graph.person_mut(id).is_some_and(|person| person.mark_always_print()) {
            outcome.people += 1;
        }
    }
    for id in &families {
        if graph.family_mut(id).is_some_and(|family| family.mark_always_print()) {
            outcome.families += 1;
        }
    }
    debug!(
        "event=always_print module=classify status=ok generations={} people={} families={}",
        generations, outcome.people, outcome.families
    );
    outcome
}
