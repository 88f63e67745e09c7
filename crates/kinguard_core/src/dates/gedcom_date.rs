//! Regex-based GEDCOM date parser.
//!
//! Handles `[D] [MON] YYYY[/YY]` with the qualifiers `abt/est/cal`,
//! `bef`, `aft` and the `bet .. and ..` / `from .. to ..` ranges. Everything
//! else is "no evidence".

use super::{DateIntervals, DayRange, DAYS_PER_YEAR};
use once_cell::sync::Lazy;
use regex::Regex;

const APPROXIMATE_YEARS: i64 = 5;
const OPEN_ENDED_YEARS: i64 = 100;

const MONTH_OFFSETS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const MONTH_LENGTHS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const MONTH_PREFIXES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

static SIMPLE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{1,2})\s+)?(?:([a-z]{3,9})\.?\s+)?(\d{1,4})(?:/(\d{1,2}))?$")
        .expect("simple date regex")
});
static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:bet|btw|between|from)\.?\s+(.+?)\s+(?:and|to|-)\s+(.+)$")
        .expect("range regex")
});
static QUALIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(abt|about|est|estimated|cal|calculated|circa|c|bef|before|aft|after|from|to|int)\.?\s+(.+)$")
        .expect("qualified date regex")
});

/// Default `DateIntervals` implementation for GEDCOM-style date text.
#[derive(Debug, Clone, Copy, Default)]
pub struct GedcomDateParser;

impl GedcomDateParser {
    pub fn new() -> Self {
        Self
    }
}

impl DateIntervals for GedcomDateParser {
    fn parse(&self, date: &str) -> DayRange {
        let normalized = date.trim().to_lowercase();
        if normalized.is_empty() {
            return DayRange::EMPTY;
        }
        parse_expression(&normalized).unwrap_or(DayRange::EMPTY)
    }
}

fn parse_expression(text: &str) -> Option<DayRange> {
    if let Some(caps) = RANGE.captures(text) {
        let start = parse_simple(caps.get(1)?.as_str())?;
        let end = parse_simple(caps.get(2)?.as_str())?;
        return ordered(start.min_day, end.max_day);
    }

    if let Some(caps) = QUALIFIED.captures(text) {
        let inner = parse_simple(caps.get(2)?.as_str())?;
        let span = OPEN_ENDED_YEARS * DAYS_PER_YEAR;
        return match caps.get(1)?.as_str() {
            "bef" | "before" => ordered((inner.min_day - span).max(DAYS_PER_YEAR), inner.min_day - 1),
            "aft" | "after" => ordered(inner.max_day + 1, inner.max_day + span),
            "from" | "to" | "int" => Some(inner),
            _ => {
                let slack = APPROXIMATE_YEARS * DAYS_PER_YEAR;
                ordered((inner.min_day - slack).max(DAYS_PER_YEAR), inner.max_day + slack)
            }
        };
    }

    parse_simple(text)
}

fn parse_simple(text: &str) -> Option<DayRange> {
    let caps = SIMPLE_DATE.captures(text.trim())?;
    let first_year: i64 = caps.get(3)?.as_str().parse().ok()?;
    if first_year <= 0 {
        return None;
    }
    let last_year = match caps.get(4) {
        Some(suffix) => dual_year(first_year, suffix.as_str())?,
        None => first_year,
    };

    let month = match caps.get(2) {
        Some(word) => Some(month_index(word.as_str())?),
        None => None,
    };
    let day: Option<i64> = match caps.get(1) {
        Some(value) => Some(value.as_str().parse().ok()?),
        None => None,
    };

    match (month, day) {
        (None, None) => ordered(
            first_year * DAYS_PER_YEAR,
            last_year * DAYS_PER_YEAR + DAYS_PER_YEAR - 1,
        ),
        (None, Some(_)) => None,
        (Some(month), None) => ordered(
            first_year * DAYS_PER_YEAR + MONTH_OFFSETS[month],
            last_year * DAYS_PER_YEAR + MONTH_OFFSETS[month] + MONTH_LENGTHS[month] - 1,
        ),
        (Some(month), Some(day)) => {
            if day < 1 {
                return None;
            }
            let offset = MONTH_OFFSETS[month] + day.min(MONTH_LENGTHS[month]) - 1;
            ordered(
                first_year * DAYS_PER_YEAR + offset,
                last_year * DAYS_PER_YEAR + offset,
            )
        }
    }
}

// `1750/51` names the later year by its last digits.
fn dual_year(first_year: i64, suffix: &str) -> Option<i64> {
    let digits = suffix.len() as u32;
    let modulus = 10_i64.pow(digits);
    let tail: i64 = suffix.parse().ok()?;
    let candidate = first_year - first_year % modulus + tail;
    if candidate >= first_year {
        Some(candidate)
    } else {
        Some(candidate + modulus)
    }
}

fn month_index(word: &str) -> Option<usize> {
    let prefix = word.get(..3)?;
    MONTH_PREFIXES.iter().position(|month| *month == prefix)
}

fn ordered(min_day: i64, max_day: i64) -> Option<DayRange> {
    if min_day <= 0 || max_day < min_day {
        return None;
    }
    Some(DayRange::new(min_day, max_day))
}
