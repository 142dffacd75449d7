use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Declared type of a queryable field. Raw request values are coerced to the
/// field's kind before a clause is built; values that fail coercion are
/// dropped rather than reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
    Bool,
    DateTime,
}

/// A single field value extracted from a record or coerced from a request.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Coerces a raw request string to a value of the given kind.
    /// Returns `None` when the raw text does not parse as that kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match kind {
            FieldKind::Str => Some(Self::Str(raw.to_string())),
            FieldKind::Int => raw.parse::<i64>().ok().map(Self::Int),
            FieldKind::Float => raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(Self::Float),
            FieldKind::Bool => raw.parse::<bool>().ok().map(Self::Bool),
            FieldKind::DateTime => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| Self::DateTime(dt.with_timezone(&Utc))),
        }
    }

    /// Builds a numeric value of the given kind from an `f64` bound.
    pub fn from_f64(kind: FieldKind, value: f64) -> Option<Self> {
        match kind {
            FieldKind::Float => value.is_finite().then_some(Self::Float(value)),
            FieldKind::Int => value.is_finite().then_some(Self::Int(value as i64)),
            _ => None,
        }
    }

    /// Orders two values of compatible kinds. `Int` and `Float` compare
    /// numerically; mixed kinds otherwise do not compare.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The text content for substring search. Only string values take part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}
