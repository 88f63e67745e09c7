//! Death classifier.
//!
//! Rules, first match wins:
//! 1. a death or burial event carrying dead text in its date, place, content
//!    or description;
//! 2. a birth, christening or baptism at least 110 years ago;
//! 3. a union event of any spouse-of family at least 90 years ago.

use super::{
    has_old_birth, is_dead_text, lookup_family, FamilyRole, DEAD_IF_MARRIED, DEAD_IF_OLDER_THAN,
};
use crate::dates::AgeClock;
use crate::diagnostics::Diagnostics;
use crate::model::graph::RecordGraph;
use crate::model::person::Person;

pub fn is_definitely_dead(
    graph: &RecordGraph,
    clock: &AgeClock,
    person: &Person,
    diagnostics: &mut Diagnostics,
) -> bool {
    let has_death_record = person.events.iter().any(|event| {
        event.kind.is_death_or_burial() && event.text_fields().iter().any(|text| is_dead_text(text))
    });
    if has_death_record {
        return true;
    }

    if has_old_birth(clock, &person.events, DEAD_IF_OLDER_THAN) {
        return true;
    }

    // Every union of every spouse-of family is considered; any old one decides.
    for family_id in person.spouse_of_families() {
        let Some(family) = lookup_family(
            graph,
            &person.id,
            family_id,
            FamilyRole::Spouse,
            diagnostics,
        ) else {
            continue;
        };
        let married_long_ago = family.events.iter().any(|event| {
            event.kind.is_union_event()
                && event.has_date()
                && clock.age_is_at_least(event, DEAD_IF_MARRIED)
        });
        if married_long_ago {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::is_definitely_dead;
    use crate::dates::{AgeClock, GedcomDateParser};
    use crate::diagnostics::Diagnostics;
    use crate::model::event::{EventFact, EventType};
    use crate::model::family::Family;
    use crate::model::graph::RecordGraph;
    use crate::model::person::{Person, PersonId};

    const NOW: i64 = 2020;

    fn check(graph: &mut RecordGraph, id: &str) -> (bool, Diagnostics) {
        graph.resolve_dates(&GedcomDateParser::new());
        let mut diagnostics = Diagnostics::new();
        let person = graph.person(&PersonId::new(id)).expect("person exists");
        let dead = is_definitely_dead(graph, &AgeClock::new(NOW), person, &mut diagnostics);
        (dead, diagnostics)
    }

    #[test]
    fn dated_death_is_dead() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1").with_event(EventFact::dated(EventType::Death, "1990")),
        );
        assert!(check(&mut graph, "I1").0);
    }

    #[test]
    fn burial_place_alone_is_dead_text() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1").with_event(EventFact::new(EventType::Burial).with_place("Oak Hill")),
        );
        assert!(check(&mut graph, "I1").0);
    }

    #[test]
    fn withheld_or_n_death_is_not_dead() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1")
                .with_event(EventFact::dated(EventType::Death, "Private"))
                .with_event(EventFact::new(EventType::Death).with_content("n")),
        );
        assert!(!check(&mut graph, "I1").0);
    }

    #[test]
    fn birth_110_years_ago_is_dead() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1").with_event(EventFact::dated(EventType::Christening, "1910")),
        );
        graph.insert_person(
            Person::new("I2").with_event(EventFact::dated(EventType::Birth, "1911")),
        );
        assert!(check(&mut graph, "I1").0);
        assert!(!check(&mut graph, "I2").0);
    }

    #[test]
    fn alternate_birth_does_not_trigger_age_rule() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1").with_event(EventFact::dated(EventType::AltBirth, "1700")),
        );
        assert!(!check(&mut graph, "I1").0);
    }

    #[test]
    fn any_old_union_in_any_spouse_family_is_dead() {
        let mut graph = RecordGraph::new();
        let mut person = Person::new("I1");
        person.add_spouse_of_family("F1");
        person.add_spouse_of_family("F2");
        graph.insert_person(person);
        graph.insert_family(
            Family::new("F1")
                .with_husband("I1")
                .with_event(EventFact::dated(EventType::Marriage, "1900")),
        );
        graph.insert_family(
            Family::new("F2")
                .with_husband("I1")
                .with_event(EventFact::dated(EventType::Marriage, "2000")),
        );
        assert!(check(&mut graph, "I1").0);
    }

    #[test]
    fn divorce_counts_as_union_event() {
        let mut graph = RecordGraph::new();
        let mut person = Person::new("I1");
        person.add_spouse_of_family("F1");
        graph.insert_person(person);
        graph.insert_family(
            Family::new("F1").with_event(EventFact::dated(EventType::Divorce, "1925")),
        );
        assert!(check(&mut graph, "I1").0);
    }

    #[test]
    fn missing_spouse_family_is_reported_and_skipped() {
        let mut graph = RecordGraph::new();
        let mut person = Person::new("I1");
        person.add_spouse_of_family("F404");
        graph.insert_person(person);
        let (dead, diagnostics) = check(&mut graph, "I1");
        assert!(!dead);
        assert_eq!(diagnostics.len(), 1);
    }
}
