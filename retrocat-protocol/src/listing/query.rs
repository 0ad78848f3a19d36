use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Serialized filters sent with a listing query, keyed by filter name.
pub type FilterPayload = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(QueryError::InvalidSortOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("page must be a positive integer")]
    ZeroPage,
    #[error("limit must be a positive integer")]
    ZeroLimit,
    #[error("invalid sort order '{0}', expected asc or desc")]
    InvalidSortOrder(String),
}

/// Page/sort/filter request sent to an entity's list endpoint.
///
/// Values are immutable once built; the `with_*` methods return a new query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireQuery")]
pub struct ListingQuery {
    page: u32,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_field: Option<String>,
    sort_order: SortOrder,
    filters: FilterPayload,
}

impl ListingQuery {
    pub fn new(page: u32, limit: u32) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::ZeroPage);
        }
        if limit == 0 {
            return Err(QueryError::ZeroLimit);
        }
        Ok(Self {
            page,
            limit,
            sort_field: None,
            sort_order: SortOrder::Asc,
            filters: FilterPayload::new(),
        })
    }

    /// First page with `limit` rows.
    pub fn first_page(limit: u32) -> Result<Self, QueryError> {
        Self::new(1, limit)
    }

    pub fn with_page(&self, page: u32) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::ZeroPage);
        }
        Ok(Self {
            page,
            ..self.clone()
        })
    }

    pub fn with_sort(&self, field: Option<String>, order: SortOrder) -> Self {
        Self {
            sort_field: field,
            sort_order: order,
            ..self.clone()
        }
    }

    pub fn with_filters(&self, filters: FilterPayload) -> Self {
        Self {
            filters,
            ..self.clone()
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn filters(&self) -> &FilterPayload {
        &self.filters
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuery {
    page: u32,
    limit: u32,
    #[serde(default)]
    sort_field: Option<String>,
    #[serde(default)]
    sort_order: SortOrder,
    #[serde(default)]
    filters: FilterPayload,
}

impl TryFrom<WireQuery> for ListingQuery {
    type Error = QueryError;

    fn try_from(value: WireQuery) -> Result<Self, Self::Error> {
        Ok(ListingQuery::new(value.page, value.limit)?
            .with_sort(value.sort_field, value.sort_order)
            .with_filters(value.filters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_zero_page_and_limit() {
        assert_eq!(ListingQuery::new(0, 10), Err(QueryError::ZeroPage));
        assert_eq!(ListingQuery::new(1, 0), Err(QueryError::ZeroLimit));
    }

    #[test]
    fn serializes_camel_case_without_unset_sort_field() {
        let query = ListingQuery::new(2, 10).unwrap();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({"page": 2, "limit": 10, "sortOrder": "asc", "filters": {}})
        );
    }

    #[test]
    fn with_sort_keeps_page_and_filters() {
        let mut filters = FilterPayload::new();
        filters.insert("search".into(), json!("Zelda"));
        let query = ListingQuery::new(3, 20).unwrap().with_filters(filters.clone());
        let sorted = query.with_sort(Some("title".into()), SortOrder::Desc);
        assert_eq!(sorted.page(), 3);
        assert_eq!(sorted.filters(), &filters);
        assert_eq!(sorted.sort_field(), Some("title"));
        assert_eq!(sorted.sort_order(), SortOrder::Desc);
    }

    #[test]
    fn deserializing_validates_page() {
        let err = serde_json::from_value::<ListingQuery>(json!({"page": 0, "limit": 5}));
        assert!(err.is_err());
        let ok: ListingQuery =
            serde_json::from_value(json!({"page": 4, "limit": 5, "sortField": "year"})).unwrap();
        assert_eq!(ok.offset(), 15);
        assert_eq!(ok.sort_order(), SortOrder::Asc);
    }

    #[test]
    fn sort_order_parses_and_reverses() {
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!(SortOrder::Desc.reversed(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
