//! Post-classification renaming of unconfirmed "Living" placeholders.

use crate::model::graph::RecordGraph;
use crate::model::person::PersonId;
use log::debug;

const UNKNOWN_GIVEN: &str = "Unknown";

/// Renames every non-living person whose name is a "Living" placeholder.
///
/// A given name "living" becomes `Unknown`; an empty given name with surname
/// "living" becomes given `Unknown` with the surname cleared. Returns the
/// number of renamed people.
pub fn mask_unconfirmed_living_names(graph: &mut RecordGraph) -> usize {
    let targets: Vec<PersonId> = graph
        .people()
        .filter(|person| !person.is_living())
        .filter(|person| {
            person
                .name
                .as_ref()
                .is_some_and(|name| name.is_living_placeholder())
        })
        .map(|person| person.id.clone())
        .collect();

    for id in &targets {
        let Some(name) = graph.person_mut(id).and_then(|person| person.name.as_mut()) else {
            continue;
        };
        if name.given.trim().is_empty() {
            name.surname.clear();
        }
        name.given = UNKNOWN_GIVEN.to_string();
    }

    if !targets.is_empty() {
        debug!(
            "event=mask_living_names module=classify status=ok renamed={}",
            targets.len()
        );
    }
    targets.len()
}

#[cfg(test)]
mod tests {
    use super::mask_unconfirmed_living_names;
    use crate::model::graph::RecordGraph;
    use crate::model::person::{Name, Person, PersonId, VitalStatus};

    fn person(id: &str, given: &str, surname: &str, status: VitalStatus) -> Person {
        let mut person = Person::new(id).with_name(given, surname);
        person.mark_vital_status(status);
        person
    }

    fn name_of(graph: &RecordGraph, id: &str) -> Name {
        graph
            .person(&PersonId::new(id))
            .and_then(|person| person.name.clone())
            .expect("named person")
    }

    #[test]
    fn renames_only_unconfirmed_placeholders() {
        let mut graph = RecordGraph::new();
        graph.insert_person(person("I1", "Living", "Smith", VitalStatus::Dead));
        graph.insert_person(person("I2", "", "LIVING", VitalStatus::Dead));
        graph.insert_person(person("I3", "Living", "Jones", VitalStatus::Living));
        graph.insert_person(person("I4", "Ann", "Living", VitalStatus::Dead));

        assert_eq!(mask_unconfirmed_living_names(&mut graph), 2);
        assert_eq!(name_of(&graph, "I1"), Name::new("Unknown", "Smith"));
        assert_eq!(name_of(&graph, "I2"), Name::new("Unknown", ""));
        assert_eq!(name_of(&graph, "I3"), Name::new("Living", "Jones"));
        assert_eq!(name_of(&graph, "I4"), Name::new("Ann", "Living"));
    }

    #[test]
    fn masking_twice_is_a_no_op() {
        let mut graph = RecordGraph::new();
        graph.insert_person(person("I1", "living", "", VitalStatus::Dead));
        assert_eq!(mask_unconfirmed_living_names(&mut graph), 1);
        assert_eq!(mask_unconfirmed_living_names(&mut graph), 0);
    }
}
