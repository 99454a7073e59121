use crate::catalog::traits::CatalogSource;
use crate::error::{FinderError, Result};
use crate::models::{NewProperty, Property, PropertyId, PropertyPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Catalog held in memory, with optional simulated latency
pub struct InMemoryCatalog {
    properties: RwLock<Vec<Property>>,
    latency: Duration,
}

impl InMemoryCatalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self::with_latency(properties, Duration::ZERO)
    }

    /// Every call sleeps for `latency` before touching the data
    pub fn with_latency(properties: Vec<Property>, latency: Duration) -> Self {
        Self {
            properties: RwLock::new(properties),
            latency,
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Add a listing. It gets the next id, today's date and `Available` status.
    pub async fn create(&self, new_property: NewProperty) -> Result<Property> {
        self.simulate_latency().await;

        let mut properties = self.properties.write().await;
        let next_id = match properties.iter().map(|p| p.id.0).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or(FinderError::IdSpaceExhausted {
                last: PropertyId(max),
            })?,
        };
        let property = new_property.into_property(PropertyId(next_id), Utc::now().date_naive());
        properties.push(property.clone());

        info!("Created property {} ({})", property.id, property.title);
        Ok(property)
    }

    /// Merge `patch` into an existing listing
    pub async fn update(&self, id: PropertyId, patch: PropertyPatch) -> Result<Property> {
        self.simulate_latency().await;

        let mut properties = self.properties.write().await;
        let property = properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(FinderError::NotFound { id })?;
        patch.apply(property);

        debug!("Updated property {}", id);
        Ok(property.clone())
    }

    /// Remove a listing and return it
    pub async fn delete(&self, id: PropertyId) -> Result<Property> {
        self.simulate_latency().await;

        let mut properties = self.properties.write().await;
        let index = properties
            .iter()
            .position(|p| p.id == id)
            .ok_or(FinderError::NotFound { id })?;

        info!("Deleted property {}", id);
        Ok(properties.remove(index))
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Property>> {
        self.simulate_latency().await;
        Ok(self.properties.read().await.clone())
    }

    async fn find_by_id(&self, id: PropertyId) -> Result<Property> {
        self.simulate_latency().await;
        self.properties
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(FinderError::NotFound { id })
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
