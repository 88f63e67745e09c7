//! Classification run configuration.
//!
//! # Invariants
//! - `cutoff_day` is on the date-interval day scale and never negative.
//! - `ancestor_generations == 0` disables the always-print walk.

use crate::dates::{AgeClock, DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Events whose latest possible day is below this day seed the cutoff.
    pub cutoff_day: i64,
    /// Generations walked up from each living person for always-print.
    pub ancestor_generations: u32,
    /// Pinned current year; `None` uses the wall clock.
    pub current_year: Option<i32>,
    /// Rename unconfirmed "Living" placeholders to `Unknown` after the run.
    pub mask_unconfirmed_living_names: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cutoff_day: 0,
            ancestor_generations: 0,
            current_year: None,
            mask_unconfirmed_living_names: true,
        }
    }
}

impl ClassifierConfig {
    /// Cutoff at the first day of `year`.
    ///
    /// # Errors
    /// - `ConfigError::CutoffYearOutOfRange` when `year` is outside
    ///   `1..=9999`; `self` is dropped unchanged.
    pub fn with_cutoff_year(mut self, year: i32) -> Result<Self, ConfigError> {
        if !(1..=MAX_YEAR).contains(&year) {
            return Err(ConfigError::CutoffYearOutOfRange(year));
        }
        self.cutoff_day = i64::from(year) * DAYS_PER_YEAR;
        Ok(self)
    }

    pub fn with_ancestor_generations(mut self, generations: u32) -> Self {
        self.ancestor_generations = generations;
        self
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cutoff_day < 0 {
            return Err(ConfigError::NegativeCutoffDay(self.cutoff_day));
        }
        if let Some(year) = self.current_year {
            if !(1..=MAX_YEAR).contains(&year) {
                return Err(ConfigError::CurrentYearOutOfRange(year));
            }
        }
        Ok(())
    }

    pub fn age_clock(&self) -> AgeClock {
        match self.current_year {
            Some(year) => AgeClock::new(i64::from(year)),
            None => AgeClock::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NegativeCutoffDay(i64),
    CutoffYearOutOfRange(i32),
    CurrentYearOutOfRange(i32),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeCutoffDay(day) => write!(f, "cutoff_day must be >= 0, got {day}"),
            Self::CutoffYearOutOfRange(year) => {
                write!(f, "cutoff year must be within 1..={MAX_YEAR}, got {year}")
            }
            Self::CurrentYearOutOfRange(year) => {
                write!(f, "current_year must be within 1..={MAX_YEAR}, got {year}")
            }
        }
    }
}

impl Error for ConfigError {}
