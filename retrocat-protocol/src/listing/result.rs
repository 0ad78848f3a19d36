use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single entity row as returned by a list endpoint.
pub type Record = Map<String, Value>;

/// Number of pages needed to show `total_items` rows `limit` at a time.
pub fn total_pages(total_items: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(limit))
}

/// Body returned by a `datatable` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub data: Vec<Record>,
    pub total_items: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

/// Rows plus pagination totals for one page of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingResult {
    pub rows: Vec<Record>,
    pub total_items: u64,
    pub total_pages: u64,
}

impl ListingResult {
    /// Builds the result, deriving `total_pages` from `total_items` and `limit`.
    pub fn from_response(response: ListingResponse, limit: u32) -> Self {
        Self {
            total_pages: total_pages(response.total_items, limit),
            total_items: response.total_items,
            rows: response.data,
        }
    }

    /// Highest valid page number; an empty listing still has page 1.
    pub fn max_page(&self) -> u64 {
        self.total_pages.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(0, 10 => 0; "empty listing")]
    #[test_case(25, 10 => 3; "partial last page")]
    #[test_case(30, 10 => 3; "exact multiple")]
    #[test_case(1, 10 => 1; "single row")]
    #[test_case(10, 1 => 10; "one row per page")]
    #[test_case(u64::MAX, 1 => u64::MAX; "no overflow")]
    fn pages_are_ceiling_of_items_over_limit(items: u64, limit: u32) -> u64 {
        total_pages(items, limit)
    }

    #[test]
    fn exhaustive_small_ceiling() {
        for limit in 1..=12u32 {
            for items in 0..=200u64 {
                let expected = (items + u64::from(limit) - 1) / u64::from(limit);
                assert_eq!(total_pages(items, limit), expected, "{items}/{limit}");
            }
        }
    }

    #[test]
    fn response_totals_are_recomputed() {
        let response: ListingResponse = serde_json::from_value(json!({
            "data": [{"id": 1, "title": "Chrono Trigger"}],
            "totalItems": 25,
            "totalPages": 7
        }))
        .unwrap();
        let result = ListingResult::from_response(response, 10);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["title"], "Chrono Trigger");
    }

    #[test]
    fn empty_result_has_one_page() {
        assert_eq!(ListingResult::default().max_page(), 1);
    }
}
