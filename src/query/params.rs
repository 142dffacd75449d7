use crate::query::record::{SortDirection, SortSpec};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Parsed, validated form of a caller-supplied query mapping.
///
/// The reserved control keys are `page`, `limit`, `sortBy`, `sortOrder`,
/// `searchTerm`, `fields`, `minPrice`, and `maxPrice`; every other key is
/// kept as an exact-filter candidate.
///
/// Parsing is defensive throughout: malformed numbers fall back to defaults,
/// nonpositive page/limit values clamp to the defaults, the limit is capped
/// at [`MAX_LIMIT`], and unrecognized keys are kept as filter candidates
/// rather than rejected.
#[derive(Debug, Clone)]
pub struct QueryParams {
    page: u32,
    limit: u32,
    sort: Option<SortSpec>,
    search_term: Option<String>,
    projection: Option<Vec<String>>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    filters: Vec<(String, String)>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: None,
            search_term: None,
            projection: None,
            min_price: None,
            max_price: None,
            filters: Vec::new(),
        }
    }
}

impl QueryParams {
    /// Parses an untyped key/value sequence. A repeated key overrides its
    /// earlier occurrence.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::default();
        let mut sort_by: Option<String> = None;
        let mut sort_order: Option<String> = None;

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "page" => params.page = parse_positive(&value).unwrap_or(DEFAULT_PAGE),
                "limit" => {
                    params.limit = parse_positive(&value)
                        .unwrap_or(DEFAULT_LIMIT)
                        .min(MAX_LIMIT);
                }
                "sortBy" => sort_by = Some(value),
                "sortOrder" => sort_order = Some(value),
                "searchTerm" => {
                    let term = value.trim().to_string();
                    params.search_term = (!term.is_empty()).then_some(term);
                }
                "fields" => {
                    let fields: Vec<String> = value
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string)
                        .collect();
                    params.projection = (!fields.is_empty()).then_some(fields);
                }
                "minPrice" => params.min_price = parse_finite(&value),
                "maxPrice" => params.max_price = parse_finite(&value),
                _ => {
                    if let Some(slot) = params.filters.iter_mut().find(|(k, _)| *k == key) {
                        slot.1 = value;
                    } else {
                        params.filters.push((key, value));
                    }
                }
            }
        }

        params.sort = resolve_sort(sort_by, sort_order);
        params
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn projection(&self) -> Option<&[String]> {
        self.projection.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }

    /// Exact-filter candidates: every non-reserved key with its raw value.
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<i64>().ok().filter(|v| *v >= 1).map(|v| v.min(u32::MAX as i64) as u32)
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Direction resolution: a leading `-` on the sort field always means
/// descending; otherwise `sortOrder=desc` selects descending and anything
/// else leaves the ascending default.
fn resolve_sort(sort_by: Option<String>, sort_order: Option<String>) -> Option<SortSpec> {
    let raw = sort_by?;
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return None;
    }

    let (field, prefixed_desc) = match raw.strip_prefix('-') {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    let descending = prefixed_desc
        || sort_order
            .map(|order| order.trim().eq_ignore_ascii_case("desc"))
            .unwrap_or(false);

    let direction = if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    Some(SortSpec::new(field, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_supplied() {
        let params = QueryParams::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(params.page(), DEFAULT_PAGE);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert!(params.sort().is_none());
        assert!(params.search_term().is_none());
        assert!(params.filters().is_empty());
    }

    #[test]
    fn nonpositive_and_malformed_paging_clamps_to_defaults() {
        let params = QueryParams::from_pairs([("page", "-3"), ("limit", "0")]);
        assert_eq!(params.page(), DEFAULT_PAGE);
        assert_eq!(params.limit(), DEFAULT_LIMIT);

        let params = QueryParams::from_pairs([("page", "two"), ("limit", "ten")]);
        assert_eq!(params.page(), DEFAULT_PAGE);
        assert_eq!(params.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_capped() {
        let params = QueryParams::from_pairs([("limit", "5000")]);
        assert_eq!(params.limit(), MAX_LIMIT);
    }

    #[test]
    fn sort_direction_resolves_from_order_or_prefix() {
        let params = QueryParams::from_pairs([("sortBy", "price"), ("sortOrder", "desc")]);
        let sort = params.sort().unwrap();
        assert_eq!(sort.field, "price");
        assert_eq!(sort.direction, SortDirection::Descending);

        let params = QueryParams::from_pairs([("sortBy", "-createdAt")]);
        let sort = params.sort().unwrap();
        assert_eq!(sort.field, "createdAt");
        assert_eq!(sort.direction, SortDirection::Descending);

        let params = QueryParams::from_pairs([("sortBy", "name")]);
        assert_eq!(params.sort().unwrap().direction, SortDirection::Ascending);
    }

    #[test]
    fn blank_search_term_is_dropped() {
        let params = QueryParams::from_pairs([("searchTerm", "   ")]);
        assert!(params.search_term().is_none());
    }

    #[test]
    fn unrecognized_keys_become_filter_candidates() {
        let params = QueryParams::from_pairs([
            ("paymentStatus", "PAID"),
            ("page", "2"),
            ("mystery", "value"),
        ]);
        assert_eq!(params.page(), 2);
        assert_eq!(
            params.filters(),
            &[
                ("paymentStatus".to_string(), "PAID".to_string()),
                ("mystery".to_string(), "value".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_filter_key_overrides_earlier_value() {
        let params = QueryParams::from_pairs([("paymentStatus", "PENDING"), ("paymentStatus", "PAID")]);
        assert_eq!(params.filters(), &[("paymentStatus".to_string(), "PAID".to_string())]);
    }

    #[test]
    fn fields_splits_and_trims_projection() {
        let params = QueryParams::from_pairs([("fields", "id, amount ,,paymentStatus")]);
        assert_eq!(
            params.projection().unwrap(),
            &["id".to_string(), "amount".to_string(), "paymentStatus".to_string()]
        );
    }

    #[test]
    fn price_bounds_parse_as_floats() {
        let params = QueryParams::from_pairs([("minPrice", "9.5"), ("maxPrice", "junk")]);
        assert_eq!(params.min_price(), Some(9.5));
        assert_eq!(params.max_price(), None);
    }
}
