mod query;
mod result;

pub use query::{FilterPayload, ListingQuery, QueryError, SortOrder};
pub use result::{total_pages, ListingResponse, ListingResult, Record};
