use crate::error::Result;
use crate::models::{Property, PropertyId};
use async_trait::async_trait;

/// Common trait for all catalog sources
/// Callers never assume these return synchronously
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every listing in catalog order
    async fn list_all(&self) -> Result<Vec<Property>>;

    /// A single listing, or `FinderError::NotFound`
    async fn find_by_id(&self, id: PropertyId) -> Result<Property>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
