use crate::catalog::CatalogSource;
use crate::error::Result;
use crate::filters::predicate::PropertyPredicate;
use crate::filters::sort::sort_properties;
use crate::filters::spec::FilterSpec;
use crate::models::{Property, PropertyId};
use std::sync::Arc;
use tracing::debug;

/// Filter then stable-sort a catalog. Neither argument is modified.
pub fn query(catalog: &[Property], spec: &FilterSpec) -> Vec<Property> {
    let predicate = PropertyPredicate::build(spec);
    let mut results: Vec<Property> = catalog
        .iter()
        .filter(|p| predicate.matches(p))
        .cloned()
        .collect();
    sort_properties(&mut results, spec.sort_by);
    results
}

/// Runs queries against a catalog source
#[derive(Clone)]
pub struct QueryEngine {
    source: Arc<dyn CatalogSource>,
}

impl QueryEngine {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    /// Fetch the catalog and apply `spec`. Source errors are returned as-is.
    pub async fn search(&self, spec: &FilterSpec) -> Result<Vec<Property>> {
        let catalog = self.source.list_all().await?;
        let results = query(&catalog, spec);
        debug!(
            "Query matched {} of {} properties from {} (sort: {})",
            results.len(),
            catalog.len(),
            self.source.source_name(),
            spec.sort_by
        );
        Ok(results)
    }

    pub async fn list_all(&self) -> Result<Vec<Property>> {
        self.source.list_all().await
    }

    pub async fn find_by_id(&self, id: PropertyId) -> Result<Property> {
        self.source.find_by_id(id).await
    }
}
