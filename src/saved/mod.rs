pub mod bus;
pub mod listeners;
pub mod manager;
pub mod store;
pub mod view;

pub use bus::{ContextId, StorageBus, StorageEvent};
pub use listeners::{ChangeOrigin, SavedChange, Subscription};
pub use manager::{SavedSetManager, SAVED_PROPERTIES_KEY};
pub use store::{FileStore, MemoryStore, PersistenceAdapter};
pub use view::SavedView;
