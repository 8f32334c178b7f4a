//! Format conformity, chosen from the column name.
//!
//! - names containing `email` are matched against an address pattern
//! - names containing `date` or `time` must parse as a date, time or timestamp
//! - everything else only has to be present

use crate::types::{ColumnValues, DimensionResult, SourceColumn};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

const LABEL: &str = "conform";

static EMAIL_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Which format rule applies to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConformityRule {
    Email,
    Temporal,
    /// No known format: any non-null value conforms.
    Presence,
}

impl ConformityRule {
    /// Pick the rule from a column name (case-insensitive).
    pub fn for_column(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("email") {
            Self::Email
        } else if lower.contains("date") || lower.contains("time") {
            Self::Temporal
        } else {
            Self::Presence
        }
    }
}

/// A successfully parsed temporal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temporal {
    Zoned(DateTime<FixedOffset>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

/// Parse one value as a timestamp, date or time of day.
///
/// Returns the error of the last layout tried when nothing matches.
pub fn parse_temporal(value: &str) -> Result<Temporal, chrono::ParseError> {
    let value = value.trim();

    let mut last_err = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => return Ok(Temporal::Zoned(dt)),
        Err(e) => e,
    };

    for fmt in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(value, fmt) {
            Ok(dt) => return Ok(Temporal::DateTime(dt)),
            Err(e) => last_err = e,
        }
    }
    for fmt in DATE_FORMATS {
        match NaiveDate::parse_from_str(value, fmt) {
            Ok(d) => return Ok(Temporal::Date(d)),
            Err(e) => last_err = e,
        }
    }
    for fmt in TIME_FORMATS {
        match NaiveTime::parse_from_str(value, fmt) {
            Ok(t) => return Ok(Temporal::Time(t)),
            Err(e) => last_err = e,
        }
    }

    Err(last_err)
}

/// Conformity of a column under the rule its name selects.
pub fn check(column: &SourceColumn) -> DimensionResult {
    let values = column.values();
    let total = values.len();

    match ConformityRule::for_column(column.name()) {
        ConformityRule::Email => email_conformity(column.name(), values, EMAIL_PATTERN.as_ref()),
        ConformityRule::Temporal => {
            let conforming = temporal_count(values);
            DimensionResult::from_counts(conforming, total, LABEL)
        }
        ConformityRule::Presence => {
            DimensionResult::from_counts(values.non_null_count(), total, LABEL)
        }
    }
}

fn email_conformity(
    column_name: &str,
    values: &ColumnValues,
    pattern: Result<&Regex, &regex::Error>,
) -> DimensionResult {
    let total = values.len();
    match pattern {
        Ok(re) => {
            let matched = values
                .rendered()
                .iter()
                .filter(|v| re.is_match(v))
                .count();
            DimensionResult::from_counts(matched, total, LABEL)
        }
        Err(e) => {
            warn!(
                "Email pattern unavailable for column '{}', counting non-null values: {}",
                column_name, e
            );
            DimensionResult::from_counts(values.non_null_count(), total, LABEL)
                .with_note("email pattern unavailable, non-null fallback")
        }
    }
}

fn temporal_count(values: &ColumnValues) -> usize {
    match values {
        // read as epoch timestamps
        ColumnValues::Numeric(v) => v.iter().flatten().filter(|x| x.is_finite()).count(),
        ColumnValues::Text(v) => v
            .iter()
            .flatten()
            .map(|s| parse_temporal(s))
            .filter(Result::is_ok)
            .count(),
    }
}
