//! Non-fatal diagnostics collected during classification.
//!
//! # Responsibility
//! - Record every dangling person/family reference met by a pass.
//! - Mirror each new record to the `log` facade as a warn event.
//!
//! # Invariants
//! - Recording never fails and never aborts the calling pass.
//! - Records are deduplicated and iterate in a stable order.

use crate::model::family::FamilyId;
use crate::model::person::PersonId;
use log::warn;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Node whose reference failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RefOrigin {
    Person(PersonId),
    Family(FamilyId),
}

impl Display for RefOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person:{id}"),
            Self::Family(id) => write!(f, "family:{id}"),
        }
    }
}

/// The reference that did not resolve, tagged by relationship.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DanglingTarget {
    SpouseOfFamily(FamilyId),
    ChildOfFamily(FamilyId),
    Spouse(PersonId),
    Child(PersonId),
}

impl Display for DanglingTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpouseOfFamily(id) => write!(f, "spouse_of_family:{id}"),
            Self::ChildOfFamily(id) => write!(f, "child_of_family:{id}"),
            Self::Spouse(id) => write!(f, "spouse:{id}"),
            Self::Child(id) => write!(f, "child:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DanglingReference {
    pub origin: RefOrigin,
    pub reference: DanglingTarget,
}

/// Collected warnings of one classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    dangling: BTreeSet<DanglingReference>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dangling(&mut self, origin: RefOrigin, reference: DanglingTarget) {
        let record = DanglingReference { origin, reference };
        if self.dangling.contains(&record) {
            return;
        }
        warn!(
            "event=dangling_reference module=classify status=warn origin={} reference={}",
            record.origin, record.reference
        );
        self.dangling.insert(record);
    }

    pub fn dangling_references(&self) -> impl Iterator<Item = &DanglingReference> {
        self.dangling.iter()
    }

    pub fn len(&self) -> usize {
        self.dangling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dangling.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DanglingTarget, Diagnostics, RefOrigin};
    use crate::model::family::FamilyId;
    use crate::model::person::PersonId;

    #[test]
    fn duplicate_records_collapse() {
        let mut diagnostics = Diagnostics::new();
        for _ in 0..3 {
            diagnostics.dangling(
                RefOrigin::Person(PersonId::new("I1")),
                DanglingTarget::SpouseOfFamily(FamilyId::new("F9")),
            );
        }
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn records_iterate_in_stable_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.dangling(
            RefOrigin::Person(PersonId::new("I2")),
            DanglingTarget::ChildOfFamily(FamilyId::new("F1")),
        );
        diagnostics.dangling(
            RefOrigin::Family(FamilyId::new("F1")),
            DanglingTarget::Child(PersonId::new("I9")),
        );
        diagnostics.dangling(
            RefOrigin::Person(PersonId::new("I1")),
            DanglingTarget::ChildOfFamily(FamilyId::new("F1")),
        );

        let origins: Vec<String> = diagnostics
            .dangling_references()
            .map(|record| record.origin.to_string())
            .collect();
        assert_eq!(origins, vec!["person:I1", "person:I2", "family:F1"]);
    }
}
