//! Human-readable summaries of a filter spec.

use crate::filters::spec::FilterSpec;

/// Which part of a spec an active filter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Price,
    PropertyType,
    Bedrooms,
    Bathrooms,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub label: String,
}

impl FilterSpec {
    /// Labels for every narrowing field, in sidebar order.
    /// Status and sort are not listed.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut active = Vec::new();
        let mut add = |kind, label: String| active.push(ActiveFilter { kind, label });

        // A zero bound reads as unset, as the sidebar inputs treat it.
        let price_min = self.price_min.filter(|p| *p != 0.0);
        let price_max = self.price_max.filter(|p| *p != 0.0);
        if price_min.is_some() || price_max.is_some() {
            let min = price_min.map_or_else(|| "$0".to_string(), thousands);
            let max = price_max.map_or_else(|| "∞".to_string(), thousands);
            add(FilterKind::Price, format!("Price: {min} - {max}"));
        }
        if !self.property_types.is_empty() {
            add(
                FilterKind::PropertyType,
                format!("Type: {}", self.property_types.join(", ")),
            );
        }
        if let Some(beds) = self.bedrooms.filter(|n| *n > 0) {
            add(FilterKind::Bedrooms, format!("{beds}+ beds"));
        }
        if let Some(baths) = self.bathrooms.filter(|n| *n > 0.0) {
            add(FilterKind::Bathrooms, format!("{baths}+ baths"));
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            add(FilterKind::Location, format!("Location: {location}"));
        }

        active
    }

    pub fn active_count(&self) -> usize {
        self.active_filters().len()
    }

    pub fn has_constraints(&self) -> bool {
        self.active_count() > 0
    }

    /// Drop one kind of constraint, leaving the rest untouched
    pub fn clear_filter(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Price => {
                self.price_min = None;
                self.price_max = None;
            }
            FilterKind::PropertyType => self.property_types.clear(),
            FilterKind::Bedrooms => self.bedrooms = None,
            FilterKind::Bathrooms => self.bathrooms = None,
            FilterKind::Location => self.location = None,
        }
    }
}

fn thousands(price: f64) -> String {
    format!("${}k", price / 1000.0)
}

/// "3 properties found" when filtered, "3 properties available" otherwise
pub fn results_heading(count: usize, filtered: bool) -> String {
    let noun = if count == 1 { "property" } else { "properties" };
    let verb = if filtered { "found" } else { "available" };
    format!("{count} {noun} {verb}")
}

/// Header badge text for the saved count
pub fn saved_badge(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}
