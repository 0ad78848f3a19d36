//! Typed entity records used for CRUD payloads.
//!
//! Listing rows stay untyped (`Record`) so tables remain entity-agnostic;
//! these types describe what create/update forms send and receive.

mod article;
mod collection;
mod game;
mod reference;

pub use article::{Article, ArticleStatus};
pub use collection::{CollectionEntry, CollectionStatus};
pub use game::Game;
pub use reference::{Developer, Genre, NamedRef, Platform};
