//! Second pass: household flood-fill of `Living`.
//!
//! # Invariants
//! - Only `Unknown` relatives are upgraded; known statuses are fixed.
//! - Every living person is expanded at most once, so the loop terminates
//!   after at most `person_count + 1` scans.
//! - The final living set is the closure of the first-pass living set over
//!   the household relation and does not depend on scan order.

use super::{lookup_family, lookup_member, FamilyRole};
use crate::diagnostics::Diagnostics;
use crate::model::graph::RecordGraph;
use crate::model::person::{PersonId, VitalStatus};
use log::debug;
use std::collections::BTreeSet;

/// Spreads `Living` from every living person to the siblings, co-spouses and
/// children in their households until a fixed point is reached.
///
/// Returns the number of people upgraded to `Living`.
pub fn propagate_living(
    graph: &mut RecordGraph,
    order: &[PersonId],
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut expanded: BTreeSet<PersonId> = BTreeSet::new();
    let mut upgraded = 0usize;
    let mut scans = 0usize;

    loop {
        scans += 1;
        let mut expanded_this_scan = 0usize;
        for id in order {
            let is_living = graph.person(id).is_some_and(|person| person.is_living());
            if !is_living || !expanded.insert(id.clone()) {
                continue;
            }
            expanded_this_scan += 1;

            for relative in household_of(graph, id, diagnostics) {
                if let Some(person) = graph.person_mut(&relative) {
                    if person.mark_vital_status(VitalStatus::Living) {
                        upgraded += 1;
                    }
                }
            }
        }
        if expanded_this_scan == 0 {
            break;
        }
    }

    debug!(
        "event=propagate_living module=classify status=ok scans={} expanded={} upgraded={}",
        scans,
        expanded.len(),
        upgraded
    );
    upgraded
}

/// Relatives whose status follows a living person: children of the person's
/// child-of families (siblings), spouses and children of the person's
/// spouse-of families.
fn household_of(
    graph: &RecordGraph,
    id: &PersonId,
    diagnostics: &mut Diagnostics,
) -> BTreeSet<PersonId> {
    let mut household = BTreeSet::new();
    let Some(person) = graph.person(id) else {
        return household;
    };

    for family_id in person.child_of_families() {
        let Some(family) = lookup_family(graph, id, family_id, FamilyRole::Child, diagnostics)
        else {
            continue;
        };
        for child_id in family.child_ids() {
            if lookup_member(graph, family_id, child_id, FamilyRole::Child, diagnostics).is_some() {
                household.insert(child_id.clone());
            }
        }
    }

    for family_id in person.spouse_of_families() {
        let Some(family) = lookup_family(graph, id, family_id, FamilyRole::Spouse, diagnostics)
        else {
            continue;
        };
        for spouse_id in family.spouses() {
            if lookup_member(graph, family_id, spouse_id, FamilyRole::Spouse, diagnostics)
                .is_some()
            {
                household.insert(spouse_id.clone());
            }
        }
        for child_id in family.child_ids() {
            if lookup_member(graph, family_id, child_id, FamilyRole::Child, diagnostics).is_some() {
                household.insert(child_id.clone());
            }
        }
    }

    household.remove(id);
    household
}

#[cfg(test)]
mod tests {
    use super::propagate_living;
    use crate::classify::scan_order;
    use crate::diagnostics::Diagnostics;
    use crate::model::family::Family;
    use crate::model::graph::RecordGraph;
    use crate::model::person::{Person, PersonId, VitalStatus};

    fn child_of(id: &str, family: &str) -> Person {
        let mut person = Person::new(id);
        person.add_child_of_family(family, false, None);
        person
    }

    fn status(graph: &RecordGraph, id: &str) -> VitalStatus {
        graph
            .person(&PersonId::new(id))
            .expect("person exists")
            .vital_status()
    }

    fn run(graph: &mut RecordGraph) -> (usize, Diagnostics) {
        let order = scan_order(graph, &[]);
        let mut diagnostics = Diagnostics::new();
        let upgraded = propagate_living(graph, &order, &mut diagnostics);
        (upgraded, diagnostics)
    }

    #[test]
    fn living_sibling_makes_unknown_sibling_living() {
        let mut graph = RecordGraph::new();
        let mut living = child_of("I2", "F1");
        living.mark_vital_status(VitalStatus::Living);
        graph.insert_person(child_of("I1", "F1"));
        graph.insert_person(living);
        graph.insert_family(Family::new("F1").with_child("I1").with_child("I2"));

        let (upgraded, diagnostics) = run(&mut graph);
        assert_eq!(upgraded, 1);
        assert!(diagnostics.is_empty());
        assert_eq!(status(&graph, "I1"), VitalStatus::Living);
    }

    #[test]
    fn living_never_reaches_parents_or_known_people() {
        let mut graph = RecordGraph::new();
        let mut child = child_of("I3", "F1");
        child.mark_vital_status(VitalStatus::Living);
        let mut dead_sibling = child_of("I4", "F1");
        dead_sibling.mark_vital_status(VitalStatus::Dead);
        let mut father = Person::new("I1");
        father.add_spouse_of_family("F1");
        graph.insert_person(father);
        graph.insert_person(child);
        graph.insert_person(dead_sibling);
        graph.insert_family(
            Family::new("F1")
                .with_husband("I1")
                .with_child("I3")
                .with_child("I4"),
        );

        let (upgraded, _) = run(&mut graph);
        assert_eq!(upgraded, 0);
        assert_eq!(status(&graph, "I1"), VitalStatus::Unknown);
        assert_eq!(status(&graph, "I4"), VitalStatus::Dead);
    }

    #[test]
    fn flood_fill_crosses_households_until_fixed_point() {
        // I1 living spouse in F1 -> I2 co-spouse -> I2's child I3 in F2 ->
        // I3's sibling I4.
        let mut graph = RecordGraph::new();
        let mut first = Person::new("I1");
        first.add_spouse_of_family("F1");
        first.mark_vital_status(VitalStatus::Living);
        let mut second = Person::new("I2");
        second.add_spouse_of_family("F1");
        second.add_spouse_of_family("F2");
        graph.insert_person(first);
        graph.insert_person(second);
        graph.insert_person(child_of("I3", "F2"));
        graph.insert_person(child_of("I4", "F2"));
        graph.insert_family(Family::new("F1").with_husband("I1").with_wife("I2"));
        graph.insert_family(
            Family::new("F2")
                .with_wife("I2")
                .with_child("I3")
                .with_child("I4"),
        );

        let (upgraded, _) = run(&mut graph);
        assert_eq!(upgraded, 3);
        for id in ["I2", "I3", "I4"] {
            assert_eq!(status(&graph, id), VitalStatus::Living, "{id}");
        }
    }

    #[test]
    fn dangling_members_are_reported_and_skipped() {
        let mut graph = RecordGraph::new();
        let mut living = Person::new("I1");
        living.add_spouse_of_family("F1");
        living.add_spouse_of_family("F404");
        living.mark_vital_status(VitalStatus::Living);
        graph.insert_person(living);
        graph.insert_family(Family::new("F1").with_husband("I1").with_wife("I404"));

        let (upgraded, diagnostics) = run(&mut graph);
        assert_eq!(upgraded, 0);
        assert_eq!(diagnostics.len(), 2);
    }
}
