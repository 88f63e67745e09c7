//! Date-interval contract consumed by the classifiers.
//!
//! # Responsibility
//! - Define the `DateIntervals` seam that turns free-form date text into an
//!   inclusive day range.
//! - Provide the age arithmetic (`AgeClock`) that every age threshold uses.
//!
//! # Invariants
//! - `(0, 0)` means "no evidence" and never satisfies an age threshold.
//! - Days are on a year-granular scale where `day / 365` is the year.

mod gedcom_date;

pub use gedcom_date::GedcomDateParser;

use crate::model::event::EventFact;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Days per year on the day scale.
pub const DAYS_PER_YEAR: i64 = 365;

/// Inclusive earliest/latest possible day of a date expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DayRange {
    pub min_day: i64,
    pub max_day: i64,
}

impl DayRange {
    pub const EMPTY: DayRange = DayRange {
        min_day: 0,
        max_day: 0,
    };

    pub fn new(min_day: i64, max_day: i64) -> Self {
        Self { min_day, max_day }
    }

    pub fn is_empty(&self) -> bool {
        self.min_day == 0 && self.max_day == 0
    }
}

/// Pure date-interval service.
///
/// Implementations must not fail: unparseable or empty input yields
/// `DayRange::EMPTY`.
pub trait DateIntervals {
    fn parse(&self, date: &str) -> DayRange;
}

impl<F> DateIntervals for F
where
    F: Fn(&str) -> DayRange,
{
    fn parse(&self, date: &str) -> DayRange {
        self(date)
    }
}

/// Age thresholds relative to a fixed current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeClock {
    current_year: i64,
}

impl AgeClock {
    pub fn new(current_year: i64) -> Self {
        Self { current_year }
    }

    /// Clock pinned to the wall-clock year.
    pub fn now() -> Self {
        Self::new(i64::from(chrono::Local::now().year()))
    }

    pub fn current_year(&self) -> i64 {
        self.current_year
    }

    /// True iff the latest possible day lies at least `years` years back.
    pub fn age_is_at_least(&self, fact: &EventFact, years: i64) -> bool {
        fact.max_day > 0 && self.current_year - fact.max_day / DAYS_PER_YEAR >= years
    }

    /// True iff the earliest possible day lies fewer than `years` years back.
    pub fn age_is_less_than(&self, fact: &EventFact, years: i64) -> bool {
        fact.min_day > 0 && self.current_year - fact.min_day / DAYS_PER_YEAR < years
    }
}

#[cfg(test)]
mod tests {
    use super::{AgeClock, DateIntervals, DayRange, DAYS_PER_YEAR};
    use crate::model::event::{EventFact, EventType};

    fn fact_in_year(year: i64) -> EventFact {
        let mut fact = EventFact::dated(EventType::Birth, year.to_string());
        fact.min_day = year * DAYS_PER_YEAR;
        fact.max_day = year * DAYS_PER_YEAR + 364;
        fact
    }

    #[test]
    fn age_thresholds_use_year_granularity() {
        let clock = AgeClock::new(2000);
        assert!(clock.age_is_at_least(&fact_in_year(1890), 110));
        assert!(!clock.age_is_at_least(&fact_in_year(1891), 110));
        assert!(clock.age_is_less_than(&fact_in_year(1891), 110));
        assert!(!clock.age_is_less_than(&fact_in_year(1890), 110));
    }

    #[test]
    fn empty_range_is_never_evidence() {
        let clock = AgeClock::new(2000);
        let fact = EventFact::dated(EventType::Birth, "garbage");
        assert!(!clock.age_is_at_least(&fact, 0));
        assert!(!clock.age_is_less_than(&fact, 10_000));
    }

    #[test]
    fn closures_act_as_date_services() {
        let service = |_: &str| DayRange::new(10, 20);
        assert_eq!(service.parse("anything"), DayRange::new(10, 20));
        assert!(DayRange::EMPTY.is_empty());
    }
}
