//! Arena of people and families addressed by id.
//!
//! # Responsibility
//! - Own every `Person` and `Family` node of one import.
//! - Provide miss-tolerant lookups; relationships are traversed by id only.
//!
//! # Invariants
//! - Relationship sets are fixed once the graph is built. Classification
//!   mutates only status/flag fields through `person_mut`/`family_mut`.
//! - Iteration is in id order.

use crate::dates::DateIntervals;
use crate::model::family::{Family, FamilyId};
use crate::model::person::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordGraph {
    #[serde(default)]
    people: BTreeMap<PersonId, Person>,
    #[serde(default)]
    families: BTreeMap<FamilyId, Family>,
}

impl RecordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a person keyed by its id.
    pub fn insert_person(&mut self, person: Person) -> Option<Person> {
        self.people.insert(person.id.clone(), person)
    }

    /// Inserts or replaces a family keyed by its id.
    pub fn insert_family(&mut self, family: Family) -> Option<Family> {
        self.families.insert(family.id.clone(), family)
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn family(&self, id: &FamilyId) -> Option<&Family> {
        self.families.get(id)
    }

    pub(crate) fn person_mut(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.people.get_mut(id)
    }

    pub(crate) fn family_mut(&mut self, id: &FamilyId) -> Option<&mut Family> {
        self.families.get_mut(id)
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.families.values()
    }

    pub fn person_ids(&self) -> Vec<PersonId> {
        self.people.keys().cloned().collect()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.families.is_empty()
    }

    /// Derives `min_day`/`max_day` for every person and family event.
    pub fn resolve_dates(&mut self, intervals: &impl DateIntervals) {
        let person_events = self.people.values_mut().flat_map(|p| p.events.iter_mut());
        let family_events = self.families.values_mut().flat_map(|f| f.events.iter_mut());
        for event in person_events.chain(family_events) {
            let range = intervals.parse(&event.date);
            event.min_day = range.min_day;
            event.max_day = range.max_day;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordGraph;
    use crate::dates::{DayRange, GedcomDateParser, DAYS_PER_YEAR};
    use crate::model::event::{EventFact, EventType};
    use crate::model::family::{Family, FamilyId};
    use crate::model::person::{Person, PersonId};

    #[test]
    fn lookups_tolerate_missing_ids() {
        let mut graph = RecordGraph::new();
        graph.insert_person(Person::new("I1"));
        assert!(graph.person(&PersonId::new("I1")).is_some());
        assert!(graph.person(&PersonId::new("I404")).is_none());
        assert!(graph.family(&FamilyId::new("F404")).is_none());
    }

    #[test]
    fn resolve_dates_fills_person_and_family_events() {
        let mut graph = RecordGraph::new();
        graph.insert_person(
            Person::new("I1").with_event(EventFact::dated(EventType::Birth, "1900")),
        );
        graph.insert_family(
            Family::new("F1").with_event(EventFact::dated(EventType::Marriage, "nonsense")),
        );
        graph.resolve_dates(&GedcomDateParser::new());

        let birth = &graph.person(&PersonId::new("I1")).unwrap().events[0];
        assert_eq!(birth.min_day, 1900 * DAYS_PER_YEAR);
        let marriage = &graph.family(&FamilyId::new("F1")).unwrap().events[0];
        assert_eq!((marriage.min_day, marriage.max_day), (0, 0));

        graph.resolve_dates(&|_: &str| DayRange::new(1, 2));
        let birth = &graph.person(&PersonId::new("I1")).unwrap().events[0];
        assert_eq!(birth.max_day, 2);
    }
}
