//! Life-event facts attached to people and families.
//!
//! # Responsibility
//! - Classify raw event tags into a closed `EventType` set.
//! - Carry the raw date/place/content/description text next to the derived
//!   day range produced by the date-interval service.
//!
//! # Invariants
//! - `min_day == 0` / `max_day == 0` means "no usable date evidence".
//! - Derived days are written once by `RecordGraph::resolve_dates`.

use serde::{Deserialize, Serialize};

/// Classified event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Birth,
    AltBirth,
    Christening,
    AltChristening,
    Baptism,
    Death,
    AltDeath,
    Burial,
    Probate,
    Will,
    Marriage,
    AltMarriage,
    Engagement,
    MarriageBanns,
    MarriageContract,
    MarriageLicense,
    MarriageSettlement,
    Divorce,
    DivorceFiling,
    Annulment,
    LdsBaptism,
    LdsBlessing,
    LdsConfirmation,
    LdsOrdination,
    LdsEndowment,
    LdsChildSealing,
    Other,
}

impl EventType {
    /// Birth, christening or baptism. Used by the age-based death rule and
    /// the old-relative checks.
    pub fn is_birth_like(self) -> bool {
        matches!(self, Self::Birth | Self::Christening | Self::Baptism)
    }

    /// Birth-like events including the alternate birth/christening forms.
    /// Used by living-evidence and cutoff guards.
    pub fn is_any_birth_like(self) -> bool {
        matches!(
            self,
            Self::Birth | Self::AltBirth | Self::Christening | Self::AltChristening | Self::Baptism
        )
    }

    pub fn is_death_or_burial(self) -> bool {
        matches!(self, Self::Death | Self::Burial)
    }

    /// Strict marriage events (`MARR` and its alternate form).
    pub fn is_marriage(self) -> bool {
        matches!(self, Self::Marriage | Self::AltMarriage)
    }

    /// Any event describing a union between spouses.
    pub fn is_union_event(self) -> bool {
        matches!(
            self,
            Self::Marriage
                | Self::AltMarriage
                | Self::Engagement
                | Self::MarriageBanns
                | Self::MarriageContract
                | Self::MarriageLicense
                | Self::MarriageSettlement
                | Self::Divorce
                | Self::DivorceFiling
                | Self::Annulment
        )
    }

    pub fn is_lds_ordinance(self) -> bool {
        matches!(
            self,
            Self::LdsBaptism
                | Self::LdsBlessing
                | Self::LdsConfirmation
                | Self::LdsOrdination
                | Self::LdsEndowment
                | Self::LdsChildSealing
        )
    }
}

/// One dated fact about a person or a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFact {
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    /// Earliest possible day, `0` when the date is absent or unparseable.
    #[serde(default)]
    pub min_day: i64,
    /// Latest possible day, `0` when the date is absent or unparseable.
    #[serde(default)]
    pub max_day: i64,
}

impl EventFact {
    pub fn new(kind: EventType) -> Self {
        Self {
            kind,
            date: String::new(),
            place: String::new(),
            content: String::new(),
            description: String::new(),
            min_day: 0,
            max_day: 0,
        }
    }

    pub fn dated(kind: EventType, date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::new(kind)
        }
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = place.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Trimmed, lowercased date token, or `None` when the date is blank.
    pub fn normalized_date(&self) -> Option<String> {
        let trimmed = self.date.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn has_date(&self) -> bool {
        !self.date.trim().is_empty()
    }

    /// The four free-text fields consulted by the dead-text and "n" rules.
    pub fn text_fields(&self) -> [&str; 4] {
        [
            self.date.as_str(),
            self.place.as_str(),
            self.content.as_str(),
            self.description.as_str(),
        ]
    }
}
