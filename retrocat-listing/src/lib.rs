//! Generic listing subsystem for the RetroCat catalog.
//!
//! A [`DataTable`] owns page/sort/filter state for one entity and hands
//! composed [`ListingQuery`] values to a [`ListingFetcher`]. Each entity
//! has a static [`FilterPackage`] describing its filters and a
//! [`ColumnSet`] describing how its rows render.

pub mod client;
pub mod columns;
pub mod error;
pub mod fetcher;
pub mod filters;
mod http;
pub mod table;

#[cfg(test)]
mod testing;

pub use client::CatalogClient;
pub use columns::{columns_for, Align, ColumnDef, ColumnSet};
pub use error::{FetchError, FilterError, TableError};
pub use fetcher::{HttpListingFetcher, ListingFetcher};
pub use filters::{package_for, FilterField, FilterKind, FilterPackage, FilterValue, FilterValues};
pub use table::{Completion, DataTable, PendingFetch, StalePolicy, TableConfig, TableStatus};

pub use retrocat_protocol::listing::{ListingQuery, ListingResult, Record, SortOrder};
pub use retrocat_protocol::Entity;
