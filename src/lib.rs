//! RetroCat: client-side listing subsystem for the retro game catalog.
//!
//! The workspace is split into several crates, re-exported here:
//!
//! * `core`: configuration, error types and tracing setup
//! * `protocol`: entities, listing query/result wire types and typed records
//! * `listing`: filter packages, column sets, the HTTP data fetcher, the
//!   data table state machine and the CRUD/collection client

pub use retrocat_core as core;
pub use retrocat_listing as listing;
pub use retrocat_protocol as protocol;

pub use retrocat_core::{CatalogError, ClientConfig};
pub use retrocat_listing::{
    columns_for, package_for, CatalogClient, DataTable, FetchError, FilterValue, FilterValues,
    HttpListingFetcher, ListingFetcher, StalePolicy, TableConfig, TableStatus,
};
pub use retrocat_protocol::listing::{ListingQuery, ListingResult, SortOrder};
pub use retrocat_protocol::Entity;
