//! Filter predicate building.
//!
//! A `FilterSpec` compiles into a list of sub-predicates that are AND-ed
//! together. Unset fields contribute nothing, so an empty spec accepts
//! every record.

use crate::filters::spec::FilterSpec;
use crate::models::Property;

type Check = Box<dyn Fn(&Property) -> bool + Send + Sync>;

/// Compiled filter over property records
pub struct PropertyPredicate {
    checks: Vec<Check>,
}

impl PropertyPredicate {
    /// A predicate that accepts everything
    pub fn always() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn build(spec: &FilterSpec) -> Self {
        let mut predicate = Self::always();

        if let Some(min) = spec.price_min {
            predicate.push(move |p| p.price >= min);
        }
        if let Some(max) = spec.price_max {
            predicate.push(move |p| p.price <= max);
        }

        if !spec.property_types.is_empty() {
            let types = spec.property_types.clone();
            predicate.push(move |p| types.iter().any(|t| *t == p.property_type));
        }

        if let Some(min) = spec.bedrooms.filter(|n| *n > 0) {
            predicate.push(move |p| p.bedrooms >= min);
        }
        if let Some(min) = spec.bathrooms.filter(|n| *n > 0.0) {
            predicate.push(move |p| p.bathrooms >= min);
        }

        if let Some(term) = location_term(spec.location.as_deref()) {
            predicate.push(move |p| matches_location(p, &term));
        }

        if let Some(status) = spec.status {
            predicate.push(move |p| p.status == status);
        }

        predicate
    }

    /// Add an arbitrary check
    pub fn push(&mut self, check: impl Fn(&Property) -> bool + Send + Sync + 'static) {
        self.checks.push(Box::new(check));
    }

    /// Conjunction of two predicates
    pub fn and(mut self, other: PropertyPredicate) -> Self {
        self.checks.extend(other.checks);
        self
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.checks.iter().all(|check| check(property))
    }

    /// Number of active sub-predicates
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for PropertyPredicate {
    fn default() -> Self {
        Self::always()
    }
}

/// Trimmed, lowercased location term; `None` when blank
fn location_term(location: Option<&str>) -> Option<String> {
    let term = location?.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn matches_location(property: &Property, term: &str) -> bool {
    property.city.to_lowercase().contains(term)
        || property.state.to_lowercase().contains(term)
        || property.address.to_lowercase().contains(term)
        || property.zip_code.contains(term)
}
