use crate::query::value::{FieldKind, FieldValue};

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// An ordering over a single named field.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Field access contract that lets one query plan drive any store entity.
///
/// Field names use the same camelCase spelling as the serialized views, so
/// the caller-facing query keys line up with what listings return.
pub trait Record {
    /// The value of a named field, or `None` when the field is unknown or
    /// the record holds no value for it.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// The declared kind of a named field, or `None` for unknown names.
    fn field_kind(name: &str) -> Option<FieldKind>;

    /// Stable fallback ordering when no sort was requested.
    fn default_sort() -> SortSpec {
        SortSpec::new("createdAt", SortDirection::Descending)
    }
}
