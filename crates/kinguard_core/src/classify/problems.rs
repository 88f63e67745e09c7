//! Per-person data-quality checks reported next to the classification.
//!
//! # Invariants
//! - Checks only read the person's own events, gender and name.
//! - LDS ordinance events are never inspected.

use crate::classify::is_living_marker;
use crate::dates::DAYS_PER_YEAR;
use crate::model::event::{EventFact, EventType};
use crate::model::person::{Gender, Person, PersonId};
use serde::Serialize;

const MAX_LIFESPAN_DAYS: i64 = 115 * DAYS_PER_YEAR;
const MAX_BURIAL_DELAY_DAYS: i64 = 30;
const MAX_POSTHUMOUS_EVENT_DAYS: i64 = DAYS_PER_YEAR;
const GENDERLESS_GIVEN_WORDS: &[&str] = &["stillborn", "child", "baby", "unknown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    UnparseableDate,
    DeathLongAfterBirth,
    BirthAfterDeath,
    LateBurial,
    DeathAfterBurial,
    EventBeforeBirth,
    EventLongAfterDeath,
    MissingGender,
    OneLetterSurname,
}

impl ProblemKind {
    pub fn severity(self) -> ProblemSeverity {
        match self {
            Self::LateBurial
            | Self::EventLongAfterDeath
            | Self::MissingGender
            | Self::OneLetterSurname => ProblemSeverity::Info,
            _ => ProblemSeverity::Error,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::UnparseableDate => "date cannot be interpreted",
            Self::DeathLongAfterBirth => "death is more than 115 years after birth",
            Self::BirthAfterDeath => "birth is after death",
            Self::LateBurial => "burial is more than 30 days after death",
            Self::DeathAfterBurial => "death is after burial",
            Self::EventBeforeBirth => "an event occurs before birth",
            Self::EventLongAfterDeath => "an event occurs more than a year after death",
            Self::MissingGender => "missing gender",
            Self::OneLetterSurname => "surname has only one letter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataProblem {
    pub person: PersonId,
    pub kind: ProblemKind,
    pub severity: ProblemSeverity,
    /// Offending raw text, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DataProblem {
    fn new(person: &PersonId, kind: ProblemKind) -> Self {
        Self {
            person: person.clone(),
            kind,
            severity: kind.severity(),
            detail: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Runs every data-quality check on one person. Dates must already be
/// resolved.
pub fn find_problems(person: &Person) -> Vec<DataProblem> {
    let mut problems = Vec::new();
    let events: Vec<&EventFact> = person
        .events
        .iter()
        .filter(|event| !event.kind.is_lds_ordinance() && event.has_date())
        .collect();

    for event in &events {
        if event.min_day == 0 && event.max_day == 0 && !is_living_marker(&event.date) {
            problems.push(
                DataProblem::new(&person.id, ProblemKind::UnparseableDate)
                    .with_detail(event.date.trim()),
            );
        }
    }

    let first = |kind: EventType| events.iter().copied().find(|event| event.kind == kind);
    let birth = first(EventType::Birth);
    let death = first(EventType::Death);
    let burial = first(EventType::Burial);
    let (min_birth, max_birth) = day_range(birth);
    let (min_death, max_death) = day_range(death);
    let (min_burial, max_burial) = day_range(burial);

    if min_death > 0 && max_birth > 0 && min_death - max_birth > MAX_LIFESPAN_DAYS {
        problems.push(DataProblem::new(&person.id, ProblemKind::DeathLongAfterBirth));
    }
    if min_birth > 0 && max_death > 0 && max_death < min_birth {
        problems.push(DataProblem::new(&person.id, ProblemKind::BirthAfterDeath));
    }
    if min_burial > 0 && max_death > 0 && min_burial - max_death > MAX_BURIAL_DELAY_DAYS {
        problems.push(DataProblem::new(&person.id, ProblemKind::LateBurial));
    }
    if max_burial > 0 && min_death > 0 && max_burial < min_death {
        problems.push(DataProblem::new(&person.id, ProblemKind::DeathAfterBurial));
    }

    if min_birth > 0
        && events.iter().any(|event| {
            !is_birth_record(event) && event.max_day > 0 && event.max_day < min_birth
        })
    {
        problems.push(DataProblem::new(&person.id, ProblemKind::EventBeforeBirth));
    }
    if max_death > 0
        && events.iter().any(|event| {
            !is_death_record(event)
                && event.min_day != 0
                && event.min_day - max_death > MAX_POSTHUMOUS_EVENT_DAYS
        })
    {
        problems.push(DataProblem::new(&person.id, ProblemKind::EventLongAfterDeath));
    }

    if let Some(name) = person.name.as_ref() {
        let given = name.given.trim().to_lowercase();
        if person.gender == Gender::Unknown
            && !given.is_empty()
            && given != "?"
            && !GENDERLESS_GIVEN_WORDS.iter().any(|word| given.contains(word))
        {
            problems.push(DataProblem::new(&person.id, ProblemKind::MissingGender));
        }
        let surname = name.surname.trim();
        if surname.chars().count() == 1 && surname != "?" {
            problems.push(
                DataProblem::new(&person.id, ProblemKind::OneLetterSurname).with_detail(surname),
            );
        }
    }
    problems
}

fn day_range(event: Option<&EventFact>) -> (i64, i64) {
    event.map_or((0, 0), |event| (event.min_day, event.max_day))
}

fn is_birth_record(event: &EventFact) -> bool {
    matches!(event.kind, EventType::Birth | EventType::AltBirth)
        || is_other_described_as(event, "alt. birth")
}

fn is_death_record(event: &EventFact) -> bool {
    matches!(
        event.kind,
        EventType::Death
            | EventType::AltDeath
            | EventType::Burial
            | EventType::Probate
            | EventType::Will
    ) || is_other_described_as(event, "alt. death")
}

fn is_other_described_as(event: &EventFact, description: &str) -> bool {
    event.kind == EventType::Other && event.description.trim().eq_ignore_ascii_case(description)
}
