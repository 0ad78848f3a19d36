use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use retrocat_protocol::listing::{ListingQuery, ListingResponse, ListingResult, Record, SortOrder};
use retrocat_protocol::Entity;
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::fetcher::ListingFetcher;

/// In-memory list endpoint that records every query it receives.
pub(crate) struct MemoryFetcher {
    rows: Mutex<Vec<Record>>,
    queries: Mutex<Vec<ListingQuery>>,
    fail_next: Mutex<Option<StatusCode>>,
}

impl MemoryFetcher {
    pub(crate) fn new(rows: Vec<Record>) -> Self {
        Self {
            rows: Mutex::new(rows),
            queries: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// `count` games titled `Game 1..=count`, with ids matching their position.
    pub(crate) fn games(count: u64) -> Self {
        Self::new((1..=count).map(|id| game(id, &format!("Game {id}"))).collect())
    }

    pub(crate) fn queries(&self) -> Vec<ListingQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn last_query(&self) -> ListingQuery {
        self.queries().last().cloned().expect("at least one query")
    }

    pub(crate) fn fail_next(&self, status: StatusCode) {
        *self.fail_next.lock().unwrap() = Some(status);
    }

    pub(crate) fn truncate(&self, len: usize) {
        self.rows.lock().unwrap().truncate(len);
    }

    pub(crate) fn answer(&self, query: &ListingQuery) -> ListingResult {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Record> = rows
            .iter()
            .filter(|row| matches_search(row, query))
            .cloned()
            .collect();
        if let Some(field) = query.sort_field() {
            matching.sort_by(|a, b| compare(a.get(field), b.get(field)));
            if query.sort_order() == SortOrder::Desc {
                matching.reverse();
            }
        }
        let total_items = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();
        ListingResult::from_response(
            ListingResponse {
                data,
                total_items,
                total_pages: None,
            },
            query.limit(),
        )
    }
}

#[async_trait]
impl ListingFetcher for MemoryFetcher {
    async fn fetch(
        &self,
        _entity: Entity,
        query: &ListingQuery,
    ) -> Result<ListingResult, FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(status) = self.fail_next.lock().unwrap().take() {
            return Err(FetchError::Status {
                status,
                message: None,
            });
        }
        Ok(self.answer(query))
    }
}

pub(crate) fn game(id: u64, title: &str) -> Record {
    match json!({"id": id, "title": title}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn matches_search(row: &Record, query: &ListingQuery) -> bool {
    let Some(needle) = query.filters().get("search").and_then(Value::as_str) else {
        return true;
    };
    let needle = needle.to_lowercase();
    row.get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| title.to_lowercase().contains(&needle))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
