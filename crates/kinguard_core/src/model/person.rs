//! Person node of the record graph.
//!
//! # Responsibility
//! - Hold identity, names, family memberships and life events of one person.
//! - Own the three classification outputs: vital status, born-before-cutoff
//!   and always-print.
//!
//! # Invariants
//! - `vital_status` starts `Unknown` and is set at most once.
//! - `born_before_cutoff` and `always_print` only flip from false to true.
//! - Family memberships are ids; they may dangle and are never dereferenced
//!   here.

use crate::model::event::{EventFact, EventType};
use crate::model::family::FamilyId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Source identifier of a person, unique among people.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Vital status lattice: `Unknown` below, `Living`/`Dead` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Living,
    Dead,
    #[default]
    Unknown,
}

impl VitalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Living => "living",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Parses the single-letter `SEX` code; anything but `M`/`F` is unknown.
    pub fn from_code(code: &str) -> Self {
        match code {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "",
        }
    }
}

/// Primary or alternate personal name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub given: String,
    #[serde(default)]
    pub surname: String,
}

impl Name {
    pub fn new(given: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            given: given.into(),
            surname: surname.into(),
        }
    }

    /// First whitespace-separated token of the given name.
    pub fn first_given(&self) -> &str {
        self.given.split_whitespace().next().unwrap_or("")
    }

    /// True when the source marked this record as a withheld living person:
    /// given name "living", or an empty given name with surname "living".
    pub fn is_living_placeholder(&self) -> bool {
        let given = self.given.trim();
        let surname = self.surname.trim();
        if !given.is_empty() {
            given.eq_ignore_ascii_case("living")
        } else {
            surname.eq_ignore_ascii_case("living")
        }
    }

    pub fn is_empty(&self) -> bool {
        self.given.trim().is_empty() && self.surname.trim().is_empty()
    }
}

/// Non-biological parentage annotation for one child-of family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pedigree {
    pub family: FamilyId,
    pub word: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub name: Option<Name>,
    #[serde(default)]
    pub alt_names: Vec<Name>,
    #[serde(default)]
    child_of_families: BTreeSet<FamilyId>,
    #[serde(default)]
    primary_child_of: Option<FamilyId>,
    #[serde(default)]
    pedigree: Option<Pedigree>,
    #[serde(default)]
    spouse_of_families: BTreeSet<FamilyId>,
    #[serde(default)]
    pub events: Vec<EventFact>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    vital_status: VitalStatus,
    #[serde(default)]
    born_before_cutoff: bool,
    #[serde(default)]
    always_print: bool,
}

impl Person {
    pub fn new(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            gender: Gender::Unknown,
            name: None,
            alt_names: Vec::new(),
            child_of_families: BTreeSet::new(),
            primary_child_of: None,
            pedigree: None,
            spouse_of_families: BTreeSet::new(),
            events: Vec::new(),
            notes: Vec::new(),
            citations: Vec::new(),
            vital_status: VitalStatus::Unknown,
            born_before_cutoff: false,
            always_print: false,
        }
    }

    pub fn with_name(mut self, given: &str, surname: &str) -> Self {
        self.name = Some(Name::new(given, surname));
        self
    }

    pub fn with_event(mut self, event: EventFact) -> Self {
        self.events.push(event);
        self
    }

    /// Records membership as a child of `family`.
    ///
    /// The first family added, or any family added with `is_primary`, becomes
    /// the primary child-of family. A non-empty pedigree word is kept together
    /// with the family it describes.
    pub fn add_child_of_family(
        &mut self,
        family: impl Into<FamilyId>,
        is_primary: bool,
        pedigree: Option<&str>,
    ) {
        let family = family.into();
        if is_primary || self.child_of_families.is_empty() {
            self.primary_child_of = Some(family.clone());
        }
        if let Some(word) = pedigree.map(str::trim).filter(|word| !word.is_empty()) {
            self.pedigree = Some(Pedigree {
                family: family.clone(),
                word: word.to_string(),
            });
        }
        self.child_of_families.insert(family);
    }

    pub fn add_spouse_of_family(&mut self, family: impl Into<FamilyId>) {
        self.spouse_of_families.insert(family.into());
    }

    pub fn child_of_families(&self) -> &BTreeSet<FamilyId> {
        &self.child_of_families
    }

    pub fn spouse_of_families(&self) -> &BTreeSet<FamilyId> {
        &self.spouse_of_families
    }

    /// Spouse-of families followed by child-of families.
    pub fn families(&self) -> impl Iterator<Item = &FamilyId> {
        self.spouse_of_families
            .iter()
            .chain(self.child_of_families.iter())
    }

    pub fn has_families(&self) -> bool {
        !self.spouse_of_families.is_empty() || !self.child_of_families.is_empty()
    }

    pub fn primary_child_of(&self) -> Option<&FamilyId> {
        self.primary_child_of.as_ref()
    }

    pub fn pedigree(&self) -> Option<&Pedigree> {
        self.pedigree.as_ref()
    }

    pub fn vital_status(&self) -> VitalStatus {
        self.vital_status
    }

    pub fn is_living(&self) -> bool {
        self.vital_status == VitalStatus::Living
    }

    /// Sets the vital status if it is still `Unknown`.
    ///
    /// Returns `true` when the status changed. Known statuses are never
    /// overwritten and `Unknown` is never written.
    pub fn mark_vital_status(&mut self, status: VitalStatus) -> bool {
        if self.vital_status.is_known() || !status.is_known() {
            return false;
        }
        self.vital_status = status;
        true
    }

    pub fn is_born_before_cutoff(&self) -> bool {
        self.born_before_cutoff
    }

    /// Returns `true` when the flag was newly set.
    pub fn mark_born_before_cutoff(&mut self) -> bool {
        !std::mem::replace(&mut self.born_before_cutoff, true)
    }

    pub fn always_print(&self) -> bool {
        self.always_print
    }

    pub fn mark_always_print(&mut self) -> bool {
        !std::mem::replace(&mut self.always_print, true)
    }

    /// Date of the first dated birth, falling back to the first dated
    /// christening or baptism when `use_christening` is set.
    pub fn birth_date(&self, use_christening: bool) -> Option<&EventFact> {
        self.first_dated(|kind| kind == EventType::Birth).or_else(|| {
            if use_christening {
                self.first_dated(|kind| matches!(kind, EventType::Christening | EventType::Baptism))
            } else {
                None
            }
        })
    }

    /// Date of the first dated death, falling back to the first dated burial.
    pub fn death_date(&self) -> Option<&EventFact> {
        self.first_dated(|kind| kind == EventType::Death)
            .or_else(|| self.first_dated(|kind| kind == EventType::Burial))
    }

    /// Earliest possible birth day, `None` when no usable birth date exists.
    pub fn birth_sort_key(&self) -> Option<i64> {
        self.birth_date(true)
            .map(|event| event.min_day)
            .filter(|day| *day > 0)
    }

    /// Orders by birth sort key (undated last), then by id.
    pub fn cmp_by_birth(&self, other: &Self) -> Ordering {
        let by_birth = match (self.birth_sort_key(), other.birth_sort_key()) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_birth.then_with(|| self.id.cmp(&other.id))
    }

    /// Wiki-style display title `Given Surname`, substituting `Unknown` for
    /// placeholder name parts. A person without a name is `Unknown`.
    pub fn display_title(&self) -> String {
        let Some(name) = self.name.as_ref() else {
            return "Unknown".to_string();
        };
        let given = name.first_given();
        let surname = name.surname.trim();
        match (is_unknown_name(given), is_unknown_name(surname)) {
            (true, true) => "Unknown".to_string(),
            (true, false) => format!("Unknown {surname}"),
            (false, true) => format!("{given} Unknown"),
            (false, false) => format!("{given} {surname}"),
        }
    }

    fn first_dated(&self, predicate: impl Fn(EventType) -> bool) -> Option<&EventFact> {
        self.events
            .iter()
            .find(|event| predicate(event.kind) && event.has_date())
    }
}

const UNKNOWN_NAME_WORDS: &[&str] = &[
    "unknown", "unk", "fnu", "lnu", "living", "father", "mother", "?", "private",
];

/// Placeholder name parts that must not appear in a display title.
pub fn is_unknown_name(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    if lowered.is_empty() || UNKNOWN_NAME_WORDS.contains(&lowered.as_str()) {
        return true;
    }
    lowered.replace(['.', ' '], "") == "nn"
}

#[cfg(test)]
mod tests {
    use super::{is_unknown_name, Gender, Name, Person, VitalStatus};
    use crate::model::event::{EventFact, EventType};
    use crate::model::family::FamilyId;

    #[test]
    fn vital_status_is_set_once() {
        let mut person = Person::new("I1");
        assert!(!person.mark_vital_status(VitalStatus::Unknown));
        assert!(person.mark_vital_status(VitalStatus::Living));
        assert!(!person.mark_vital_status(VitalStatus::Dead));
        assert_eq!(person.vital_status(), VitalStatus::Living);
    }

    #[test]
    fn cutoff_flag_is_one_way() {
        let mut person = Person::new("I1");
        assert!(person.mark_born_before_cutoff());
        assert!(!person.mark_born_before_cutoff());
        assert!(person.is_born_before_cutoff());
    }

    #[test]
    fn first_child_of_family_is_primary_unless_overridden() {
        let mut person = Person::new("I1");
        person.add_child_of_family("F1", false, None);
        person.add_child_of_family("F2", false, Some("adopted"));
        assert_eq!(person.primary_child_of(), Some(&FamilyId::new("F1")));
        assert_eq!(person.pedigree().map(|p| p.word.as_str()), Some("adopted"));

        person.add_child_of_family("F3", true, Some("  "));
        assert_eq!(person.primary_child_of(), Some(&FamilyId::new("F3")));
        assert_eq!(person.pedigree().map(|p| p.family.as_str()), Some("F2"));
    }

    #[test]
    fn living_placeholder_prefers_given_name() {
        assert!(Name::new("Living", "Smith").is_living_placeholder());
        assert!(Name::new("", "LIVING").is_living_placeholder());
        assert!(!Name::new("John", "Living").is_living_placeholder());
    }

    #[test]
    fn display_title_substitutes_unknown_parts() {
        assert_eq!(Person::new("I1").display_title(), "Unknown");
        assert_eq!(
            Person::new("I2").with_name("John Paul", "Smith").display_title(),
            "John Smith"
        );
        assert_eq!(
            Person::new("I3").with_name("N.N.", "Smith").display_title(),
            "Unknown Smith"
        );
        assert_eq!(
            Person::new("I4").with_name("Mary", "fnu").display_title(),
            "Mary Unknown"
        );
        assert!(is_unknown_name("  "));
    }

    #[test]
    fn birth_date_falls_back_to_christening() {
        let person = Person::new("I1")
            .with_event(EventFact::new(EventType::Birth))
            .with_event(EventFact::dated(EventType::Baptism, "1801"));
        assert_eq!(person.birth_date(true).map(|e| e.date.as_str()), Some("1801"));
        assert!(person.birth_date(false).is_none());
    }

    #[test]
    fn gender_codes_round_trip() {
        assert_eq!(Gender::from_code("F"), Gender::Female);
        assert_eq!(Gender::from_code("x"), Gender::Unknown);
        assert_eq!(Gender::Male.code(), "M");
    }
}
