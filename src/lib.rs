pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod filters;
pub mod models;
pub mod saved;
pub mod session;

pub use catalog::{CatalogSource, InMemoryCatalog, JsonFileCatalog};
pub use config::Config;
pub use error::{FinderError, Result};
pub use events::UiEvent;
pub use filters::{query, FilterSpec, PropertyPredicate, QueryEngine, SortKey};
pub use models::{Property, PropertyId, PropertyStatus};
pub use saved::{
    ChangeOrigin, FileStore, MemoryStore, PersistenceAdapter, SavedChange, SavedSetManager,
    StorageBus, Subscription, SAVED_PROPERTIES_KEY,
};
pub use session::{BrowseSession, Services};
