use std::cmp::Ordering;

use serde_json::Value;

use crate::query::record::{Record, SortDirection, SortSpec};
use crate::query::value::FieldValue;

/// One predicate in a query plan. All clauses of a plan are AND-combined;
/// the fields of a `ContainsAny` clause are OR-combined within it.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Eq { field: String, value: FieldValue },
    AtLeast { field: String, value: FieldValue },
    AtMost { field: String, value: FieldValue },
    ContainsAny { fields: Vec<String>, term: String },
}

impl Clause {
    fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Self::Eq { field, value } => record
                .field(field)
                .is_some_and(|v| v.compare(value) == Some(Ordering::Equal)),
            Self::AtLeast { field, value } => record
                .field(field)
                .and_then(|v| v.compare(value))
                .is_some_and(Ordering::is_ge),
            Self::AtMost { field, value } => record
                .field(field)
                .and_then(|v| v.compare(value))
                .is_some_and(Ordering::is_le),
            Self::ContainsAny { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|field| {
                    record
                        .field(field)
                        .as_ref()
                        .and_then(FieldValue::as_text)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            }
        }
    }
}

/// Offset/limit window applied after filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

/// Accumulated clauses of one logical query, evaluated by the owning store.
/// Counting ignores the page window by contract.
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    pub clauses: Vec<Clause>,
    pub sort: Option<SortSpec>,
    pub window: Option<PageWindow>,
    pub projection: Option<Vec<String>>,
}

impl QueryPlan {
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    /// Filters, sorts, and windows the given records into a result page.
    pub fn select_from<'a, R, I>(&self, records: I) -> Vec<R>
    where
        R: Record + Clone + 'a,
        I: Iterator<Item = &'a R>,
    {
        let mut rows: Vec<&R> = records.filter(|r| self.matches(*r)).collect();

        let sort = self.sort.clone().unwrap_or_else(R::default_sort);
        rows.sort_by(|a, b| compare_records(*a, *b, &sort));

        let rows: Vec<&R> = match self.window {
            Some(window) => rows.into_iter().skip(window.offset).take(window.limit).collect(),
            None => rows,
        };
        rows.into_iter().cloned().collect()
    }

    /// Number of records matching the plan's clauses, ignoring the window.
    pub fn count_from<'a, R, I>(&self, records: I) -> u64
    where
        R: Record + 'a,
        I: Iterator<Item = &'a R>,
    {
        records.filter(|r| self.matches(*r)).count() as u64
    }
}

/// Requested sort first, missing values last, id as the deterministic
/// tie-break.
fn compare_records<R: Record>(a: &R, b: &R, sort: &SortSpec) -> Ordering {
    let primary = match (a.field(&sort.field), b.field(&sort.field)) {
        (Some(x), Some(y)) => {
            let ord = x.compare(&y).unwrap_or(Ordering::Equal);
            match sort.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    primary.then_with(|| match (a.field("id"), b.field("id")) {
        (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}

/// Restricts a rendered record to the requested attribute allow-list.
/// Non-object values pass through untouched.
pub fn apply_projection(value: Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| fields.iter().any(|f| f == key))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::value::FieldKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: String,
        score: f64,
        rank: i64,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::Str(self.id.clone())),
                "label" => Some(FieldValue::Str(self.label.clone())),
                "score" => Some(FieldValue::Float(self.score)),
                "rank" => Some(FieldValue::Int(self.rank)),
                _ => None,
            }
        }

        fn field_kind(name: &str) -> Option<FieldKind> {
            match name {
                "id" | "label" => Some(FieldKind::Str),
                "score" => Some(FieldKind::Float),
                "rank" => Some(FieldKind::Int),
                _ => None,
            }
        }

        fn default_sort() -> SortSpec {
            SortSpec::new("rank", SortDirection::Ascending)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "r1".into(), label: "Alpha Reader".into(), score: 10.0, rank: 3 },
            Row { id: "r2".into(), label: "beta reader".into(), score: 15.0, rank: 1 },
            Row { id: "r3".into(), label: "Gamma".into(), score: 20.0, rank: 2 },
        ]
    }

    #[test]
    fn eq_clause_filters_exactly() {
        let plan = QueryPlan {
            clauses: vec![Clause::Eq {
                field: "label".into(),
                value: FieldValue::Str("Gamma".into()),
            }],
            ..QueryPlan::default()
        };
        let rows = rows();
        let selected = plan.select_from(rows.iter());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "r3");
    }

    #[test]
    fn unknown_field_in_clause_matches_nothing() {
        let plan = QueryPlan {
            clauses: vec![Clause::Eq {
                field: "ghost".into(),
                value: FieldValue::Str("x".into()),
            }],
            ..QueryPlan::default()
        };
        let rows = rows();
        assert_eq!(plan.count_from(rows.iter()), 0);
    }

    #[test]
    fn contains_any_is_case_insensitive_or() {
        let plan = QueryPlan {
            clauses: vec![Clause::ContainsAny {
                fields: vec!["label".into()],
                term: "READER".into(),
            }],
            ..QueryPlan::default()
        };
        let rows = rows();
        let selected = plan.select_from(rows.iter());
        let ids: Vec<&str> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2"]);
    }

    #[test]
    fn range_clauses_bound_numeric_fields() {
        let plan = QueryPlan {
            clauses: vec![
                Clause::AtLeast { field: "score".into(), value: FieldValue::Float(12.0) },
                Clause::AtMost { field: "score".into(), value: FieldValue::Float(18.0) },
            ],
            ..QueryPlan::default()
        };
        let rows = rows();
        let selected = plan.select_from(rows.iter());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "r2");
    }

    #[test]
    fn sort_falls_back_to_entity_default() {
        let plan = QueryPlan::default();
        let rows = rows();
        let selected = plan.select_from(rows.iter());
        let ids: Vec<&str> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r2", "r3", "r1"]);
    }

    #[test]
    fn window_applies_after_sort_and_count_ignores_it() {
        let plan = QueryPlan {
            sort: Some(SortSpec::new("score", SortDirection::Descending)),
            window: Some(PageWindow { offset: 1, limit: 1 }),
            ..QueryPlan::default()
        };
        let rows = rows();
        let selected = plan.select_from(rows.iter());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, "r2");
        assert_eq!(plan.count_from(rows.iter()), 3);
    }

    #[test]
    fn projection_keeps_only_requested_keys() {
        let value = serde_json::json!({"id": "r1", "label": "Alpha", "score": 10.0});
        let projected = apply_projection(value, &["id".to_string(), "score".to_string()]);
        assert_eq!(projected, serde_json::json!({"id": "r1", "score": 10.0}));
    }
}
