//! Collection state and list-query engine for a trading-card catalog.
//!
//! [`App`] owns the collection store and the catalog gateway. Browse and
//! local list views borrow them and share the same query pipeline: search,
//! set filter, sort, then pagination.

pub mod app;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod pagination;
pub mod query;
pub mod storage;
pub mod view;

pub use app::App;
pub use catalog::{CardPage, CatalogGateway, PokemonTcgClient};
pub use collection::{CardMembership, CollectionList, CollectionStore};
pub use config::AppConfig;
pub use error::CatalogError;
pub use model::{Card, CardImages, CardSet};
pub use pagination::PageItem;
pub use query::{process_cards, ProcessedCards, SetFilter, SortKey};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use view::{BrowseView, LocalView, QueryState, SetDirectory};
