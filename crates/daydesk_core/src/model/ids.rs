//! Identifier and calendar-day key types.
//!
//! # Responsibility
//! - Generate time-ordered unique ids for notes and zones.
//! - Validate `YYYY-MM-DD` day keys used for date-scoped views.
//!
//! # Invariants
//! - `EntityId` values are never reused for another record.
//! - A `DateKey` always names a real calendar day in canonical form.

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier shared by notes and zones.
///
/// New ids are UUIDv7 strings (millisecond timestamp plus random bits).
/// Boards written by older clients used floating point numbers; those are
/// accepted on load and kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntityId {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawEntityId::deserialize(deserializer)? {
            RawEntityId::Text(value) => Ok(Self(value)),
            RawEntityId::Number(value) => Ok(Self(value.to_string())),
        }
    }
}

/// Validation error for calendar-day keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Input is not shaped like `YYYY-MM-DD`.
    Malformed(String),
    /// Input is well-formed but names no real day (e.g. `2023-02-30`).
    NotACalendarDay(String),
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(f, "date key must be YYYY-MM-DD, got `{value}`"),
            Self::NotACalendarDay(value) => write!(f, "date key is not a calendar day: `{value}`"),
        }
    }
}

impl Error for DateKeyError {}

/// Calendar-day key in canonical `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let trimmed = value.trim();
        if !DATE_KEY_RE.is_match(trimmed) {
            return Err(DateKeyError::Malformed(trimmed.to_string()));
        }
        NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| DateKeyError::NotACalendarDay(trimmed.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's key in the local time zone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Long human label, e.g. `5 March 2024`.
    pub fn long_label(&self) -> String {
        self.0.format("%-d %B %Y").to_string()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{DateKey, DateKeyError, EntityId};

    #[test]
    fn generated_ids_are_unique() {
        let first = EntityId::generate();
        let second = EntityId::generate();
        assert_ne!(first, second);
    }

    #[test]
    fn legacy_numeric_ids_deserialize_as_text() {
        let id: EntityId = serde_json::from_str("1700000000000.25").unwrap();
        assert_eq!(id.as_str(), "1700000000000.25");

        let id: EntityId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn date_key_requires_canonical_shape() {
        assert!(matches!(
            DateKey::parse("2024-1-5"),
            Err(DateKeyError::Malformed(_))
        ));
        assert!(matches!(
            DateKey::parse("2023-02-30"),
            Err(DateKeyError::NotACalendarDay(_))
        ));
        assert_eq!(DateKey::parse("2024-03-05").unwrap().to_string(), "2024-03-05");
    }

    #[test]
    fn date_key_serializes_as_plain_string() {
        let key = DateKey::parse("2024-01-02").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-01-02\"");
        let back: DateKey = serde_json::from_str("\"2024-01-02\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"yesterday\"").is_err());
    }

    #[test]
    fn long_label_has_no_leading_zero() {
        let key = DateKey::parse("2024-03-05").unwrap();
        assert_eq!(key.long_label(), "5 March 2024");
    }
}
