pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileCatalog;
pub use memory::InMemoryCatalog;
pub use traits::CatalogSource;
