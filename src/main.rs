use anyhow::Context;
use home_finder::filters::saved_badge;
use home_finder::{
    BrowseSession, CatalogSource, Config, FileStore, FilterSpec, InMemoryCatalog,
    JsonFileCatalog, Services,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!("🏠 Home Finder");
    info!("Catalog: {}", config.catalog_path.display());

    let listings = JsonFileCatalog::new(&config.catalog_path)
        .list_all()
        .await
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;
    let catalog = InMemoryCatalog::with_latency(listings, config.latency);

    let store = FileStore::open(&config.store_dir)
        .with_context(|| format!("Failed to open store {}", config.store_dir.display()))?;
    let services = Services::new(Arc::new(catalog), Arc::new(store));

    let filters = match &config.filter_json {
        Some(raw) => {
            let value: serde_json::Value =
                serde_json::from_str(raw).context("HOME_FINDER_FILTER must be valid JSON")?;
            FilterSpec::from_json(&value)
        }
        None => FilterSpec::default(),
    };
    for active in filters.active_filters() {
        info!("Filter: {}", active.label);
    }

    let mut session = BrowseSession::with_filters(services.clone(), filters);
    session.refresh().await?;

    info!("✅ {}", session.heading());

    for (i, property) in session.results().iter().enumerate() {
        let marker = if session.is_saved(property.id) { "♥" } else { " " };
        println!("{}. {} {} (${})", i + 1, marker, property.title, property.price);
        println!("   {}, {}, {} {}", property.address, property.city, property.state, property.zip_code);
        println!(
            "   {} · {} bd · {} ba · {} sqft",
            property.property_type, property.bedrooms, property.bathrooms, property.square_feet
        );
        println!("   Status: {} · Listed {}", property.status, property.listing_date);
        println!("   ID: {}", property.id);
        println!();
    }

    if let Some(badge) = saved_badge(services.saved.count()) {
        info!("💾 Saved homes: {}", badge);
    }

    Ok(())
}
