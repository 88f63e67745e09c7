//! Born-before-cutoff propagation.
//!
//! # Responsibility
//! - Seed the flag on people with any event entirely before the cutoff day.
//! - Spread it to parents, co-spouses and children that have no birth-like
//!   event after the cutoff.
//!
//! # Invariants
//! - Independent of vital status.
//! - The flag only flips false -> true; traversal uses an explicit stack and
//!   a visited set, so cyclic family references terminate.
//! - The flagged set is a reachability closure, independent of seed order.

use super::{lookup_family, lookup_member, FamilyRole};
use crate::diagnostics::Diagnostics;
use crate::model::graph::RecordGraph;
use crate::model::person::{Person, PersonId};
use log::debug;
use std::collections::BTreeSet;

/// Some event of the person resolves entirely before `cutoff_day`.
pub fn has_events_before_cutoff(person: &Person, cutoff_day: i64) -> bool {
    person
        .events
        .iter()
        .any(|event| event.has_date() && event.max_day != 0 && event.max_day < cutoff_day)
}

/// Some birth-like event of the person may fall after `cutoff_day`.
pub fn has_birth_event_after_cutoff(person: &Person, cutoff_day: i64) -> bool {
    person
        .events
        .iter()
        .any(|event| event.kind.is_any_birth_like() && event.has_date() && event.max_day > cutoff_day)
}

/// Flags every person whose own events predate the cutoff, then propagates.
///
/// Returns the number of newly flagged people.
pub fn mark_all_born_before_cutoff(
    graph: &mut RecordGraph,
    cutoff_day: i64,
    diagnostics: &mut Diagnostics,
) -> usize {
    let seeds: Vec<PersonId> = graph
        .people()
        .filter(|person| has_events_before_cutoff(person, cutoff_day))
        .map(|person| person.id.clone())
        .collect();
    let flagged = propagate_from(graph, &seeds, cutoff_day, diagnostics);
    debug!(
        "event=cutoff_propagation module=classify status=ok cutoff_day={} seeds={} flagged={}",
        cutoff_day,
        seeds.len(),
        flagged
    );
    flagged
}

/// Flags one person and propagates from them. The person itself is flagged
/// unconditionally.
pub fn mark_born_before_cutoff(
    graph: &mut RecordGraph,
    id: &PersonId,
    cutoff_day: i64,
    diagnostics: &mut Diagnostics,
) -> usize {
    propagate_from(graph, std::slice::from_ref(id), cutoff_day, diagnostics)
}

fn propagate_from(
    graph: &mut RecordGraph,
    seeds: &[PersonId],
    cutoff_day: i64,
    diagnostics: &mut Diagnostics,
) -> usize {
    // Already flagged people count as visited; seeds are always expanded.
    let mut visited: BTreeSet<PersonId> = graph
        .people()
        .filter(|person| person.is_born_before_cutoff())
        .map(|person| person.id.clone())
        .collect();
    let mut stack: Vec<PersonId> = Vec::new();
    let mut flagged = 0usize;

    for seed in seeds.iter().rev() {
        let Some(person) = graph.person_mut(seed) else {
            continue;
        };
        if person.mark_born_before_cutoff() {
            flagged += 1;
        }
        visited.insert(seed.clone());
        stack.push(seed.clone());
    }

    while let Some(id) = stack.pop() {
        for candidate in cutoff_neighbours(graph, &id, diagnostics) {
            if visited.contains(&candidate) {
                continue;
            }
            let Some(person) = graph.person_mut(&candidate) else {
                continue;
            };
            if has_birth_event_after_cutoff(person, cutoff_day) {
                continue;
            }
            if person.mark_born_before_cutoff() {
                flagged += 1;
            }
            visited.insert(candidate.clone());
            stack.push(candidate);
        }
    }
    flagged
}

/// Parents from child-of families, then co-spouses and children from
/// spouse-of families.
fn cutoff_neighbours(
    graph: &RecordGraph,
    id: &PersonId,
    diagnostics: &mut Diagnostics,
) -> Vec<PersonId> {
    let mut neighbours = Vec::new();
    let Some(person) = graph.person(id) else {
        return neighbours;
    };

    for family_id in person.child_of_families() {
        let Some(family) = lookup_family(graph, id, family_id, FamilyRole::Child, diagnostics)
        else {
            continue;
        };
        for parent_id in family.spouses() {
            if lookup_member(graph, family_id, parent_id, FamilyRole::Spouse, diagnostics)
                .is_some()
            {
                neighbours.push(parent_id.clone());
            }
        }
    }

    for family_id in person.spouse_of_families() {
        let Some(family) = lookup_family(graph, id, family_id, FamilyRole::Spouse, diagnostics)
        else {
            continue;
        };
        for child_id in family.child_ids() {
            if lookup_member(graph, family_id, child_id, FamilyRole::Child, diagnostics).is_some() {
                neighbours.push(child_id.clone());
            }
        }
        for spouse_id in family.spouses() {
            if spouse_id != id
                && lookup_member(graph, family_id, spouse_id, FamilyRole::Spouse, diagnostics)
                    .is_some()
            {
                neighbours.push(spouse_id.clone());
            }
        }
    }
    neighbours
}
