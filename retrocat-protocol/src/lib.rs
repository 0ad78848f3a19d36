pub mod entity;
pub mod listing;
pub mod records;

pub use entity::Entity;

pub mod prelude {
    pub use crate::entity::Entity;
    pub use crate::listing::{
        total_pages, FilterPayload, ListingQuery, ListingResponse, ListingResult, QueryError,
        Record, SortOrder,
    };
    pub use crate::records::{
        Article, ArticleStatus, CollectionEntry, CollectionStatus, Developer, Game, Genre,
        NamedRef, Platform,
    };
}
