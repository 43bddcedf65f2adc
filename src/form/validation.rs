//! Per-field validation and normalisation rules.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical textual format used when a date/time is shown in a field.
pub const DATE_TIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y"];

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_.-]+@[a-z0-9_.-]+\.[a-z]{2,6}$").expect("email pattern is valid")
});

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Normalised value produced by an accepted commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Absent,
    Text(String),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }
}

/// Supported field kinds and their accept rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty; letters, whitespace and punctuation only.
    RequiredName,
    FreeText,
    PostalCode,
    Phone,
    Email,
    DateTime,
}

impl FieldKind {
    pub fn validate(&self, input: &str) -> Result<FieldValue, ValidationError> {
        match self {
            FieldKind::RequiredName => {
                if input.is_empty() {
                    Err(ValidationError::new("First and last name are required"))
                } else if input
                    .chars()
                    .all(|ch| ch.is_alphabetic() || ch.is_whitespace() || is_punctuation(ch))
                {
                    Ok(FieldValue::Text(input.to_string()))
                } else {
                    Err(ValidationError::new("Name contains invalid characters"))
                }
            }
            FieldKind::FreeText => Ok(optional_text(input)),
            FieldKind::PostalCode => {
                if input.is_empty()
                    || (input.chars().count() == 5 && input.chars().all(|ch| ch.is_ascii_digit()))
                {
                    Ok(optional_text(input))
                } else {
                    Err(ValidationError::new("ZIP code must be exactly 5 digits"))
                }
            }
            FieldKind::Phone => {
                if input
                    .chars()
                    .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '(' | ')'))
                {
                    Ok(FieldValue::Text(input.to_string()))
                } else {
                    Err(ValidationError::new(
                        "Phone number may contain only digits and + ( )",
                    ))
                }
            }
            FieldKind::Email => {
                if input.is_empty() {
                    Ok(FieldValue::Absent)
                } else if EMAIL_PATTERN.is_match(input) {
                    Ok(FieldValue::Text(input.to_lowercase()))
                } else {
                    Err(ValidationError::new(
                        "Enter a valid email address (e.g. jane.doe@example.com)",
                    ))
                }
            }
            FieldKind::DateTime => {
                if input.is_empty() {
                    return Ok(FieldValue::Absent);
                }
                parse_date_time(input).map(FieldValue::DateTime).ok_or_else(|| {
                    ValidationError::new("Enter a valid date/time (e.g. 2024-01-31 18:30:00)")
                })
            }
        }
    }
}

fn optional_text(input: &str) -> FieldValue {
    if input.is_empty() {
        FieldValue::Absent
    } else {
        FieldValue::Text(input.to_string())
    }
}

/// Parses the date/time spellings accepted by the membership start field.
pub fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_DISPLAY_FORMAT).to_string()
}

/// Unicode punctuation (general category P*): connectors, dashes, brackets,
/// quotes and other marks from the ASCII, Latin-1, General Punctuation,
/// Supplemental Punctuation, CJK, small form and fullwidth blocks. Symbols
/// such as `+`, `$`, `<` or the fraction slash are not punctuation.
fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation() && !"$+<=>^`|~".contains(ch);
    }
    matches!(
        ch,
        '¡' | '§'
            | '«'
            | '¶'
            | '·'
            | '»'
            | '¿'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{2043}'
            | '\u{2045}'..='\u{2051}'
            | '\u{2053}'..='\u{205E}'
            | '\u{2E00}'..='\u{2E2E}'
            | '\u{2E30}'..='\u{2E4F}'
            | '\u{2E52}'..='\u{2E5D}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
            | '\u{3014}'..='\u{301F}'
            | '\u{3030}'
            | '\u{303D}'
            | '\u{30A0}'
            | '\u{30FB}'
            | '\u{FE10}'..='\u{FE19}'
            | '\u{FE30}'..='\u{FE52}'
            | '\u{FE54}'..='\u{FE61}'
            | '\u{FE63}'
            | '\u{FE68}'
            | '\u{FE6A}'
            | '\u{FE6B}'
            | '\u{FF01}'..='\u{FF03}'
            | '\u{FF05}'..='\u{FF0A}'
            | '\u{FF0C}'..='\u{FF0F}'
            | '\u{FF1A}'
            | '\u{FF1B}'
            | '\u{FF1F}'
            | '\u{FF20}'
            | '\u{FF3B}'..='\u{FF3D}'
            | '\u{FF3F}'
            | '\u{FF5B}'
            | '\u{FF5D}'
            | '\u{FF5F}'..='\u{FF65}'
    )
}
