use serde::Serialize;

use crate::query::params::QueryParams;
use crate::query::plan::{Clause, PageWindow, QueryPlan};
use crate::query::value::{FieldKind, FieldValue};
use crate::store_framework::{Entity, StoreClient, StoreError};

/// Caller-supplied extra clauses merged into both terminal operations, the
/// counterpart of the ad-hoc query options the listing endpoints add on top
/// of the request (owner scoping, status scoping).
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub clauses: Vec<Clause>,
}

/// Pagination metadata returned alongside a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64) as u32
        };
        Self { total, page, limit, total_pages }
    }

    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(0, page, limit)
    }
}

/// A listing response: pagination metadata plus the page of rendered records.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub data: Vec<T>,
}

/// Immutable query accumulator over one store collection.
///
/// Each stage consumes the builder and returns a new one carrying the grown
/// plan; nothing touches the store until a terminal operation runs. Stages
/// whose request inputs are absent are no-ops, so the full chain can always
/// be written out.
///
/// ```ignore
/// let query = Query::new(store, params)
///     .range("price")
///     .search(&["name", "description"])
///     .filter()
///     .sort()
///     .paginate()
///     .fields();
/// let rows = query.execute(&QueryOptions::default()).await?;
/// let meta = query.count_total(&QueryOptions::default()).await?;
/// ```
#[derive(Clone)]
pub struct Query<E: Entity> {
    store: StoreClient<E>,
    params: QueryParams,
    plan: QueryPlan,
}

impl<E: Entity> Query<E> {
    pub fn new(store: StoreClient<E>, params: QueryParams) -> Self {
        Self {
            store,
            params,
            plan: QueryPlan::default(),
        }
    }

    /// Bounds the named numeric field by the request's `minPrice`/`maxPrice`
    /// values. No-op when no bounds were supplied or the field is not numeric.
    pub fn range(mut self, field: &str) -> Self {
        let Some(kind) = E::field_kind(field) else {
            return self;
        };
        if let Some(value) = self.params.min_price().and_then(|min| FieldValue::from_f64(kind, min)) {
            self.plan.clauses.push(Clause::AtLeast { field: field.to_string(), value });
        }
        if let Some(value) = self.params.max_price().and_then(|max| FieldValue::from_f64(kind, max)) {
            self.plan.clauses.push(Clause::AtMost { field: field.to_string(), value });
        }
        self
    }

    /// Case-insensitive substring match of the request's `searchTerm` across
    /// the given text fields, OR-combined. An empty term or field list, or a
    /// list naming no string field, short-circuits to a no-op.
    pub fn search(mut self, fields: &[&str]) -> Self {
        let Some(term) = self.params.search_term() else {
            return self;
        };
        let fields: Vec<String> = fields
            .iter()
            .filter(|f| E::field_kind(f) == Some(FieldKind::Str))
            .map(|f| f.to_string())
            .collect();
        if fields.is_empty() {
            return self;
        }
        self.plan.clauses.push(Clause::ContainsAny {
            fields,
            term: term.to_string(),
        });
        self
    }

    /// Exact-match clauses for every non-reserved request key that names a
    /// real field, coerced to the field's declared kind. Unknown keys and
    /// uncoercible values are dropped.
    pub fn filter(mut self) -> Self {
        for (key, raw) in self.params.filters() {
            let Some(kind) = E::field_kind(key) else {
                continue;
            };
            let Some(value) = FieldValue::parse(kind, raw) else {
                continue;
            };
            self.plan.clauses.push(Clause::Eq {
                field: key.clone(),
                value,
            });
        }
        self
    }

    /// Ordering by the requested field and direction. An unknown sort field
    /// leaves the plan on the entity's stable default ordering.
    pub fn sort(mut self) -> Self {
        if let Some(spec) = self.params.sort() {
            if E::field_kind(&spec.field).is_some() {
                self.plan.sort = Some(spec.clone());
            }
        }
        self
    }

    /// Offset/limit window derived from the clamped `page` and `limit`.
    pub fn paginate(mut self) -> Self {
        let page = self.params.page();
        let limit = self.params.limit();
        self.plan.window = Some(PageWindow {
            offset: (page as usize - 1) * limit as usize,
            limit: limit as usize,
        });
        self
    }

    /// Records the requested attribute projection, if any.
    pub fn fields(mut self) -> Self {
        self.plan.projection = self.params.projection().map(<[String]>::to_vec);
        self
    }

    /// The accumulated projection allow-list, applied by the caller to the
    /// rendered records.
    pub fn projection(&self) -> Option<&[String]> {
        self.plan.projection.as_deref()
    }

    /// Terminal: merges the accumulated clauses with the extra options and
    /// issues one read against the store. A fresh call re-queries.
    pub async fn execute(&self, options: &QueryOptions) -> Result<Vec<E>, StoreError> {
        self.store.select(self.merged_plan(options)).await
    }

    /// Terminal: counts all records matching the same merged clauses while
    /// ignoring pagination, and derives the page metadata from the request.
    pub async fn count_total(&self, options: &QueryOptions) -> Result<PageMeta, StoreError> {
        let mut plan = self.merged_plan(options);
        plan.window = None;
        let total = self.store.count(plan).await?;
        Ok(PageMeta::new(total, self.params.page(), self.params.limit()))
    }

    fn merged_plan(&self, options: &QueryOptions) -> QueryPlan {
        let mut plan = self.plan.clone();
        plan.clauses.extend(options.clauses.iter().cloned());
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::domain::{Book, BookCreate};
    use crate::store_framework::StoreActor;

    fn spawn_books() -> StoreClient<Book> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            format!("book_{}", id)
        };
        let (actor, client) = StoreActor::new(16, next_id);
        tokio::spawn(actor.run());
        client
    }

    async fn seed_books(client: &StoreClient<Book>) {
        let seed = [
            ("Systems Primer", 30.0, Some("An introduction to systems")),
            ("Rust in Practice", 45.0, None),
            ("Gardening Basics", 12.5, Some("Beds, soil, and seasons")),
            ("Advanced Rust", 55.0, Some("Ownership in depth")),
            ("Poetry Collection", 18.0, None),
        ];
        for (name, price, description) in seed {
            client
                .create(BookCreate {
                    name: name.to_string(),
                    price,
                    description: description.map(str::to_string),
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn search_matches_across_fields_case_insensitively() {
        let client = spawn_books();
        seed_books(&client).await;

        let params = QueryParams::from_pairs([("searchTerm", "rust"), ("sortBy", "name")]);
        let query = Query::new(client, params)
            .search(&["name", "description"])
            .sort()
            .paginate();

        let rows = query.execute(&QueryOptions::default()).await.unwrap();
        let names: Vec<&str> = rows.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Advanced Rust", "Rust in Practice"]);
    }

    #[tokio::test]
    async fn range_bounds_the_price_field() {
        let client = spawn_books();
        seed_books(&client).await;

        let params = QueryParams::from_pairs([
            ("minPrice", "15"),
            ("maxPrice", "50"),
            ("sortBy", "price"),
        ]);
        let query = Query::new(client, params).range("price").sort().paginate();

        let rows = query.execute(&QueryOptions::default()).await.unwrap();
        let prices: Vec<f64> = rows.iter().map(|b| b.price).collect();
        assert_eq!(prices, [18.0, 30.0, 45.0]);
    }

    #[tokio::test]
    async fn unknown_filter_keys_are_dropped_not_errors() {
        let client = spawn_books();
        seed_books(&client).await;

        let params = QueryParams::from_pairs([("flavor", "strawberry")]);
        let query = Query::new(client, params).filter().paginate();

        let meta = query.count_total(&QueryOptions::default()).await.unwrap();
        assert_eq!(meta.total, 5);
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_reassemble_the_prefix() {
        let client = spawn_books();
        seed_books(&client).await;

        let all_params = QueryParams::from_pairs([("sortBy", "name"), ("limit", "4")]);
        let all = Query::new(client.clone(), all_params).sort().paginate();
        let top: Vec<String> = all
            .execute(&QueryOptions::default())
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(top.len(), 4);

        let mut reassembled = Vec::new();
        for page in ["1", "2"] {
            let params =
                QueryParams::from_pairs([("sortBy", "name"), ("limit", "2"), ("page", page)]);
            let query = Query::new(client.clone(), params).sort().paginate();
            let ids: Vec<String> = query
                .execute(&QueryOptions::default())
                .await
                .unwrap()
                .into_iter()
                .map(|b| b.id)
                .collect();
            assert_eq!(ids.len(), 2);
            for id in &ids {
                assert!(!reassembled.contains(id));
            }
            reassembled.extend(ids);
        }
        assert_eq!(reassembled, top);
    }

    #[tokio::test]
    async fn count_total_is_invariant_to_paging() {
        let client = spawn_books();
        seed_books(&client).await;

        for (page, limit) in [("1", "2"), ("3", "1"), ("1", "100")] {
            let params = QueryParams::from_pairs([("page", page), ("limit", limit)]);
            let query = Query::new(client.clone(), params).paginate();
            let rows = query.execute(&QueryOptions::default()).await.unwrap();
            let meta = query.count_total(&QueryOptions::default()).await.unwrap();
            assert_eq!(meta.total, 5);
            assert!(meta.total >= rows.len() as u64);
        }
    }

    #[tokio::test]
    async fn extra_options_scope_both_terminals() {
        let client = spawn_books();
        seed_books(&client).await;

        let params = QueryParams::default();
        let query = Query::new(client, params).paginate();
        let options = QueryOptions {
            clauses: vec![Clause::AtLeast {
                field: "price".into(),
                value: FieldValue::Float(40.0),
            }],
        };

        let rows = query.execute(&options).await.unwrap();
        let meta = query.count_total(&options).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(meta.total, 2);
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn meta_rounds_total_pages_up() {
        let meta = PageMeta::new(11, 2, 5);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PageMeta::empty(1, 10).total_pages, 0);
    }
}
