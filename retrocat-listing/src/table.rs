//! Entity-agnostic data table state machine.
//!
//! ```text
//!   new ──► Loading ──ok──► Loaded ──page/sort/filter──► Loading
//!              │                                            │
//!              └──err──► Error (previous rows kept) ◄──err──┘
//! ```
//!
//! Every interaction composes a fresh [`ListingQuery`] from the table's
//! state and returns it as a [`PendingFetch`]; [`DataTable::complete`]
//! applies the fetcher's answer. The async helpers do both steps.

use std::collections::BTreeMap;
use std::sync::Arc;

use retrocat_protocol::listing::{ListingQuery, ListingResult, Record, SortOrder};
use retrocat_protocol::Entity;
use tracing::{debug, info, warn};

use crate::columns::{columns_for, ColumnSet};
use crate::error::{FetchError, FilterError, TableError};
use crate::fetcher::ListingFetcher;
use crate::filters::{package_for, FilterPackage, FilterValue, FilterValues};

// Follow-up fetches allowed when a result shows the current page no longer exists.
const MAX_CLAMP_REFETCHES: usize = 2;

/// What to do with a response whose request is older than the newest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Apply responses in completion order; a slow older request can
    /// overwrite a newer one.
    #[default]
    LastResponseWins,
    /// Ignore responses to anything but the most recently issued request.
    DiscardStale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub entity: Entity,
    pub package: &'static FilterPackage,
    pub columns: ColumnSet,
    pub limit: u32,
    pub sort: Option<(String, SortOrder)>,
    pub filters: Option<FilterValues>,
    pub stale_policy: StalePolicy,
}

impl TableConfig {
    pub fn for_entity(entity: Entity, limit: u32) -> Self {
        Self {
            entity,
            package: package_for(entity),
            columns: columns_for(entity),
            limit: limit.max(1),
            sort: None,
            filters: None,
            stale_policy: StalePolicy::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Starts the table with `filters` instead of the package defaults.
    pub fn with_filters(mut self, filters: FilterValues) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }
}

/// A composed query waiting for its fetch result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub ticket: u64,
    pub query: ListingQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Rows and totals were replaced.
    Applied,
    /// The fetch failed; previous rows are still shown.
    Failed(String),
    /// The response was ignored (stale or unknown ticket).
    Discarded,
    /// Rows were applied but the current page no longer exists; this query
    /// fetches the clamped page.
    Refetch(PendingFetch),
}

pub struct DataTable {
    config: TableConfig,
    fetcher: Arc<dyn ListingFetcher>,
    page: u32,
    limit: u32,
    sort_field: Option<String>,
    sort_order: SortOrder,
    filters: FilterValues,
    result: ListingResult,
    loaded_once: bool,
    status: TableStatus,
    // Page and limit of the query that produced `result`.
    shown: (u32, u32),
    last_ticket: u64,
    // In-flight tickets with the page and limit they asked for.
    pending: BTreeMap<u64, (u32, u32)>,
}

impl DataTable {
    /// Creates a table in the `Loading` state; call [`DataTable::load`] (or
    /// [`DataTable::begin_load`]) to issue the initial query.
    pub fn new(config: TableConfig, fetcher: Arc<dyn ListingFetcher>) -> Self {
        let (sort_field, sort_order) = match &config.sort {
            Some((field, order)) => (Some(field.clone()), *order),
            None => (None, SortOrder::Asc),
        };
        let limit = config.limit.max(1);
        Self {
            page: 1,
            limit,
            sort_field,
            sort_order,
            filters: config
                .filters
                .clone()
                .unwrap_or_else(|| config.package.default_filters()),
            result: ListingResult::default(),
            loaded_once: false,
            status: TableStatus::Loading,
            shown: (1, limit),
            last_ticket: 0,
            pending: BTreeMap::new(),
            fetcher,
            config,
        }
    }

    pub fn entity(&self) -> Entity {
        self.config.entity
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.config.columns
    }

    pub fn package(&self) -> &'static FilterPackage {
        self.config.package
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, TableStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TableStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort(&self) -> (Option<&str>, SortOrder) {
        (self.sort_field.as_deref(), self.sort_order)
    }

    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    pub fn rows(&self) -> &[Record] {
        &self.result.rows
    }

    pub fn total_items(&self) -> u64 {
        self.result.total_items
    }

    pub fn total_pages(&self) -> u64 {
        self.result.total_pages
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Current rows rendered through the table's column set.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.config.columns.render_rows(&self.result.rows)
    }

    /// Page of the rows currently displayed. Differs from [`DataTable::page`]
    /// while a request is in flight or after a failed fetch.
    pub fn shown_page(&self) -> u32 {
        self.shown.0
    }

    /// One-based positions of the first and last displayed rows.
    pub fn row_range(&self) -> Option<(u64, u64)> {
        if self.result.rows.is_empty() {
            return None;
        }
        let (page, limit) = self.shown;
        let first = u64::from(page.saturating_sub(1)) * u64::from(limit) + 1;
        Some((first, first + self.result.rows.len() as u64 - 1))
    }

    /// Query matching the table's current state, without issuing it.
    pub fn current_query(&self) -> Result<ListingQuery, TableError> {
        let filters = self.config.package.serialize(&self.filters)?;
        Ok(ListingQuery::new(self.page, self.limit)?
            .with_sort(self.sort_field.clone(), self.sort_order)
            .with_filters(filters))
    }

    pub fn begin_load(&mut self) -> Result<PendingFetch, TableError> {
        self.issue("load")
    }

    /// Moves to `page`, clamped to `[1, max(totalPages, 1)]` once totals are known.
    pub fn begin_page(&mut self, page: u32) -> Result<PendingFetch, TableError> {
        self.page = self.clamp_page(page);
        self.issue("page")
    }

    pub fn begin_next_page(&mut self) -> Result<PendingFetch, TableError> {
        self.begin_page(self.page.saturating_add(1))
    }

    pub fn begin_prev_page(&mut self) -> Result<PendingFetch, TableError> {
        self.begin_page(self.page.saturating_sub(1))
    }

    /// Sorts by `field`; page and filters are unchanged.
    pub fn begin_sort(
        &mut self,
        field: &str,
        order: SortOrder,
    ) -> Result<PendingFetch, TableError> {
        if !self.config.columns.is_sortable(field) {
            return Err(TableError::NotSortable {
                entity: self.config.entity,
                field: field.to_string(),
            });
        }
        self.sort_field = Some(field.to_string());
        self.sort_order = order;
        self.issue("sort")
    }

    /// Flips the order when `field` is already the sort field, otherwise sorts ascending.
    pub fn begin_toggle_sort(&mut self, field: &str) -> Result<PendingFetch, TableError> {
        let order = if self.sort_field.as_deref() == Some(field) {
            self.sort_order.reversed()
        } else {
            SortOrder::Asc
        };
        self.begin_sort(field, order)
    }

    pub fn begin_clear_sort(&mut self) -> Result<PendingFetch, TableError> {
        self.sort_field = None;
        self.sort_order = SortOrder::Asc;
        self.issue("sort")
    }

    /// Sets one filter and returns to page 1. Other filter keys are kept.
    /// An empty value clears the filter.
    pub fn begin_set_filter(
        &mut self,
        key: &str,
        value: FilterValue,
    ) -> Result<PendingFetch, TableError> {
        self.config.package.validate(key, &value)?;
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.set(key, value);
        }
        self.page = 1;
        self.issue("filter")
    }

    /// Parses `raw` with the package's text syntax, then behaves like [`DataTable::begin_set_filter`].
    pub fn begin_set_filter_text(
        &mut self,
        key: &str,
        raw: &str,
    ) -> Result<PendingFetch, TableError> {
        let value = self.config.package.parse_value(key, raw)?;
        self.begin_set_filter(key, value)
    }

    pub fn begin_clear_filter(&mut self, key: &str) -> Result<PendingFetch, TableError> {
        if self.config.package.field(key).is_none() {
            return Err(FilterError::UnknownField {
                entity: self.config.entity,
                key: key.to_string(),
            }
            .into());
        }
        self.filters.remove(key);
        self.page = 1;
        self.issue("filter")
    }

    /// Restores the package's default filters and returns to page 1.
    pub fn begin_reset_filters(&mut self) -> Result<PendingFetch, TableError> {
        self.filters = self.config.package.default_filters();
        self.page = 1;
        self.issue("filter")
    }

    pub fn begin_set_limit(&mut self, limit: u32) -> Result<PendingFetch, TableError> {
        ListingQuery::first_page(limit)?;
        self.limit = limit;
        self.page = 1;
        self.issue("limit")
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Failures keep the previous rows and totals and surface a message.
    pub fn complete(
        &mut self,
        ticket: u64,
        outcome: Result<ListingResult, FetchError>,
    ) -> Completion {
        let Some(requested) = self.pending.remove(&ticket) else {
            warn!(entity = %self.config.entity, ticket, "completion for unknown ticket ignored");
            return Completion::Discarded;
        };
        if self.config.stale_policy == StalePolicy::DiscardStale && ticket < self.last_ticket {
            debug!(
                entity = %self.config.entity,
                ticket,
                latest = self.last_ticket,
                "discarding stale listing response"
            );
            return Completion::Discarded;
        }

        match outcome {
            Err(err) => {
                let message = err.user_message();
                warn!(entity = %self.config.entity, ticket, error = %err, "listing fetch failed");
                self.status = TableStatus::Error(message.clone());
                Completion::Failed(message)
            }
            Ok(result) => {
                self.result = result;
                self.shown = requested;
                self.loaded_once = true;
                self.status = TableStatus::Loaded;

                let clamped = self.clamp_page(self.page);
                if clamped == self.page {
                    return Completion::Applied;
                }
                info!(
                    entity = %self.config.entity,
                    page = self.page,
                    max_page = clamped,
                    "page no longer exists; moving to last page"
                );
                self.page = clamped;
                match self.issue("clamp") {
                    Ok(pending) => Completion::Refetch(pending),
                    Err(err) => {
                        let message = err.to_string();
                        self.status = TableStatus::Error(message.clone());
                        Completion::Failed(message)
                    }
                }
            }
        }
    }

    /// Fetches `pending` through the table's fetcher and applies the result.
    ///
    /// Follows up to two clamp refetches. If the totals keep shrinking past
    /// that, the last follow-up is dropped and the table stays `Loaded` with
    /// the rows it has.
    pub async fn run(&mut self, pending: PendingFetch) -> Completion {
        let mut pending = pending;
        let mut refetches = 0;
        loop {
            let outcome = self
                .fetcher
                .fetch(self.config.entity, &pending.query)
                .await;
            match self.complete(pending.ticket, outcome) {
                Completion::Refetch(next) if refetches < MAX_CLAMP_REFETCHES => {
                    refetches += 1;
                    pending = next;
                }
                Completion::Refetch(next) => {
                    warn!(
                        entity = %self.config.entity,
                        page = self.page,
                        refetches,
                        "totals kept shrinking; giving up on the clamp refetch"
                    );
                    self.pending.remove(&next.ticket);
                    if self.pending.is_empty() {
                        self.status = TableStatus::Loaded;
                    }
                    return Completion::Applied;
                }
                other => return other,
            }
        }
    }

    pub async fn load(&mut self) -> Result<Completion, TableError> {
        let pending = self.begin_load()?;
        Ok(self.run(pending).await)
    }

    pub async fn refresh(&mut self) -> Result<Completion, TableError> {
        self.load().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<Completion, TableError> {
        let pending = self.begin_page(page)?;
        Ok(self.run(pending).await)
    }

    pub async fn next_page(&mut self) -> Result<Completion, TableError> {
        let pending = self.begin_next_page()?;
        Ok(self.run(pending).await)
    }

    pub async fn prev_page(&mut self) -> Result<Completion, TableError> {
        let pending = self.begin_prev_page()?;
        Ok(self.run(pending).await)
    }

    pub async fn sort_by(
        &mut self,
        field: &str,
        order: SortOrder,
    ) -> Result<Completion, TableError> {
        let pending = self.begin_sort(field, order)?;
        Ok(self.run(pending).await)
    }

    pub async fn toggle_sort(&mut self, field: &str) -> Result<Completion, TableError> {
        let pending = self.begin_toggle_sort(field)?;
        Ok(self.run(pending).await)
    }

    pub async fn set_filter(
        &mut self,
        key: &str,
        value: FilterValue,
    ) -> Result<Completion, TableError> {
        let pending = self.begin_set_filter(key, value)?;
        Ok(self.run(pending).await)
    }

    pub async fn set_filter_text(
        &mut self,
        key: &str,
        raw: &str,
    ) -> Result<Completion, TableError> {
        let pending = self.begin_set_filter_text(key, raw)?;
        Ok(self.run(pending).await)
    }

    pub async fn clear_filter(&mut self, key: &str) -> Result<Completion, TableError> {
        let pending = self.begin_clear_filter(key)?;
        Ok(self.run(pending).await)
    }

    pub async fn reset_filters(&mut self) -> Result<Completion, TableError> {
        let pending = self.begin_reset_filters()?;
        Ok(self.run(pending).await)
    }

    pub async fn set_limit(&mut self, limit: u32) -> Result<Completion, TableError> {
        let pending = self.begin_set_limit(limit)?;
        Ok(self.run(pending).await)
    }

    fn clamp_page(&self, page: u32) -> u32 {
        let max_page = if self.loaded_once {
            u32::try_from(self.result.max_page()).unwrap_or(u32::MAX)
        } else {
            u32::MAX
        };
        page.clamp(1, max_page)
    }

    fn issue(&mut self, reason: &'static str) -> Result<PendingFetch, TableError> {
        let query = self.current_query()?;
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.pending.insert(ticket, (query.page(), query.limit()));
        self.status = TableStatus::Loading;
        debug!(
            entity = %self.config.entity,
            ticket,
            reason,
            page = query.page(),
            sort_field = query.sort_field().unwrap_or("-"),
            in_flight = self.pending.len(),
            "listing query issued"
        );
        Ok(PendingFetch { ticket, query })
    }
}
