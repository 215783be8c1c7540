//! The standard custom rules

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::{CustomRule, FieldValue, Siblings};
use crate::helpers::parse_duration;
use crate::values::ValueKind;

pub const DURATION: &str = "dto-duration";
pub const UUID_OR_NAME: &str = "dto-uuid";
pub const NON_EMPTY_STRING: &str = "dto-none-empty-string";
pub const VALUE_TYPE: &str = "dto-value-type";
pub const UNRESERVED_CHARS: &str = "dto-rfc3986-unreserved-chars";
pub const INTERVAL_DATETIME: &str = "dto-interval-datetime";

/// RFC 3986 unreserved characters minus '.', which message bus topics reserve
static UNRESERVED_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_~-]+$").expect("static regex"));

const INTERVAL_DATETIME_LAYOUT: &str = "%Y%m%dT%H%M%S";
const NAME_FIELD: &str = "Name";

pub struct DurationRule;

impl CustomRule for DurationRule {
    fn name(&self) -> &'static str {
        DURATION
    }

    fn is_valid(&self, value: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
        parse_duration(value.as_text().unwrap_or_default()).is_some()
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must match the ISO-8601 duration grammar")
    }
}

/// UUID check for update DTOs, where the id may be left empty when the record
/// is addressed by its name instead
pub struct UuidOrNameRule;

impl CustomRule for UuidOrNameRule {
    fn name(&self) -> &'static str {
        UUID_OR_NAME
    }

    fn is_valid(&self, value: &FieldValue<'_>, siblings: &Siblings<'_>) -> bool {
        if value.is_absent() {
            return true;
        }
        let id = value.as_text().unwrap_or_default();
        if id.trim().is_empty() {
            let named = siblings
                .value(NAME_FIELD)
                .as_text()
                .is_some_and(|name| !name.is_empty());
            if named {
                return true;
            }
        }
        Uuid::parse_str(id).is_ok()
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must be a UUID")
    }
}

pub struct NonEmptyStringRule;

impl CustomRule for NonEmptyStringRule {
    fn name(&self) -> &'static str {
        NON_EMPTY_STRING
    }

    fn is_valid(&self, value: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
        match value {
            FieldValue::Absent => true,
            FieldValue::Text(s) => !s.trim().is_empty(),
            _ => true,
        }
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must not be empty")
    }
}

pub struct ValueTypeRule;

impl CustomRule for ValueTypeRule {
    fn name(&self) -> &'static str {
        VALUE_TYPE
    }

    fn is_valid(&self, value: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
        ValueKind::normalize(value.as_text().unwrap_or_default()).is_some()
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must be a supported value type")
    }
}

pub struct UnreservedCharsRule;

impl CustomRule for UnreservedCharsRule {
    fn name(&self) -> &'static str {
        UNRESERVED_CHARS
    }

    fn is_valid(&self, value: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
        if value.is_absent() {
            return true;
        }
        UNRESERVED_CHARS_RE.is_match(value.as_text().unwrap_or_default())
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must consist only of letters, digits, '-', '_', '~'")
    }
}

pub struct IntervalDatetimeRule;

impl CustomRule for IntervalDatetimeRule {
    fn name(&self) -> &'static str {
        INTERVAL_DATETIME
    }

    fn is_valid(&self, value: &FieldValue<'_>, _: &Siblings<'_>) -> bool {
        let text = value.as_text().unwrap_or_default();
        NaiveDateTime::parse_from_str(text, INTERVAL_DATETIME_LAYOUT).is_ok()
    }

    fn message(&self, label: &str) -> String {
        format!("{label} must use the YYYYMMDD'T'HHMMSS datetime format")
    }
}
