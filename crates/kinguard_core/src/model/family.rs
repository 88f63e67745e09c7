//! Family node of the record graph.
//!
//! A family connects spouses and children and carries its own events
//! (principally marriages). Member references are ids and may dangle.

use crate::model::event::EventFact;
use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Source identifier of a family, unique among families.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub String);

impl FamilyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for FamilyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FamilyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Child reference in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: PersonId,
    #[serde(default)]
    pub pedigree: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    #[serde(default)]
    pub husbands: BTreeSet<PersonId>,
    #[serde(default)]
    pub wives: BTreeSet<PersonId>,
    #[serde(default)]
    pub children: Vec<ChildRef>,
    #[serde(default)]
    pub events: Vec<EventFact>,
    #[serde(default)]
    always_print: bool,
}

impl Family {
    pub fn new(id: impl Into<FamilyId>) -> Self {
        Self {
            id: id.into(),
            husbands: BTreeSet::new(),
            wives: BTreeSet::new(),
            children: Vec::new(),
            events: Vec::new(),
            always_print: false,
        }
    }

    pub fn with_husband(mut self, id: impl Into<PersonId>) -> Self {
        self.husbands.insert(id.into());
        self
    }

    pub fn with_wife(mut self, id: impl Into<PersonId>) -> Self {
        self.wives.insert(id.into());
        self
    }

    pub fn with_child(mut self, id: impl Into<PersonId>) -> Self {
        self.children.push(ChildRef {
            id: id.into(),
            pedigree: None,
        });
        self
    }

    pub fn with_event(mut self, event: EventFact) -> Self {
        self.events.push(event);
        self
    }

    /// Husbands followed by wives.
    pub fn spouses(&self) -> impl Iterator<Item = &PersonId> {
        self.husbands.iter().chain(self.wives.iter())
    }

    pub fn child_ids(&self) -> impl Iterator<Item = &PersonId> {
        self.children.iter().map(|child| &child.id)
    }

    /// Spouses followed by children.
    pub fn members(&self) -> impl Iterator<Item = &PersonId> {
        self.spouses().chain(self.child_ids())
    }

    pub fn always_print(&self) -> bool {
        self.always_print
    }

    pub fn mark_always_print(&mut self) -> bool {
        !std::mem::replace(&mut self.always_print, true)
    }
}

#[cfg(test)]
mod tests {
    use super::Family;
    use crate::model::person::PersonId;

    #[test]
    fn members_list_spouses_then_children() {
        let family = Family::new("F1")
            .with_wife("I2")
            .with_husband("I1")
            .with_child("I3");
        let members: Vec<&PersonId> = family.members().collect();
        assert_eq!(
            members,
            vec![
                &PersonId::new("I1"),
                &PersonId::new("I2"),
                &PersonId::new("I3")
            ]
        );
    }
}
