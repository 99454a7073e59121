use crate::error::FinderError;
use crate::models::PropertyStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

/// Status value meaning "no status restriction"
pub const ALL_STATUSES: &str = "All";

/// Ordering applied to query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "sqft")]
    Sqft,
    /// Only offered on the saved view
    #[serde(rename = "title")]
    Title,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Sqft => "sqft",
            SortKey::Title => "title",
        }
    }

    /// Keys offered when browsing the catalog
    pub fn parse_browse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(SortKey::Newest),
            "price-low" => Some(SortKey::PriceLow),
            "price-high" => Some(SortKey::PriceHigh),
            "sqft" => Some(SortKey::Sqft),
            _ => None,
        }
    }

    /// Keys offered on the saved view; adds `title`
    pub fn parse_saved(value: &str) -> Option<Self> {
        match value {
            "title" => Some(SortKey::Title),
            other => Self::parse_browse(other),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and sort request over the catalog.
///
/// Every constraint is an explicit `Option`: `None` never narrows the
/// result. Zero thresholds and blank locations are also treated as no
/// constraint by the predicate builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub property_types: Vec<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub location: Option<String>,
    pub status: Option<PropertyStatus>,
    pub sort_by: SortKey,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price_min(mut self, min: f64) -> Self {
        self.price_min = Some(min);
        self
    }

    pub fn price_max(mut self, max: f64) -> Self {
        self.price_max = Some(max);
        self
    }

    pub fn property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_types.push(property_type.into());
        self
    }

    pub fn bedrooms(mut self, min: u32) -> Self {
        self.bedrooms = Some(min);
        self
    }

    pub fn bathrooms(mut self, min: f32) -> Self {
        self.bathrooms = Some(min);
        self
    }

    pub fn location(mut self, term: impl Into<String>) -> Self {
        self.location = Some(term.into());
        self
    }

    pub fn status(mut self, status: PropertyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sort_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Lenient parse of a loosely-typed filter object.
    ///
    /// Missing and `null` keys are unset. A key with an unexpected shape is
    /// logged and treated as unset; this never fails.
    pub fn from_json(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            if !value.is_null() {
                warn!("Filter spec is not an object, ignoring: {}", value);
            }
            return Self::default();
        };

        Self {
            price_min: lenient("priceMin", number_field(fields, "priceMin")),
            price_max: lenient("priceMax", number_field(fields, "priceMax")),
            property_types: property_types_field(fields),
            bedrooms: lenient("bedrooms", bedrooms_field(fields)),
            bathrooms: lenient("bathrooms", number_field(fields, "bathrooms"))
                .map(|n| n as f32),
            location: lenient("location", string_field(fields, "location", "string")),
            status: lenient("status", status_field(fields)),
            sort_by: lenient("sortBy", sort_field(fields)).unwrap_or_default(),
        }
    }
}

type FieldResult<T> = Result<Option<T>, FinderError>;

fn lenient<T>(field: &str, parsed: FieldResult<T>) -> Option<T> {
    parsed.unwrap_or_else(|err| {
        warn!("Ignoring filter field {}: {}", field, err);
        None
    })
}

fn present<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

fn number_field(fields: &Map<String, Value>, key: &'static str) -> FieldResult<f64> {
    match present(fields, key) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or(FinderError::InvalidFilterField {
            field: key,
            expected: "number",
        }),
    }
}

fn bedrooms_field(fields: &Map<String, Value>) -> FieldResult<u32> {
    match present(fields, "bedrooms") {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or(FinderError::InvalidFilterField {
                field: "bedrooms",
                expected: "non-negative integer",
            }),
    }
}

fn string_field(
    fields: &Map<String, Value>,
    key: &'static str,
    expected: &'static str,
) -> FieldResult<String> {
    match present(fields, key) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or(FinderError::InvalidFilterField { field: key, expected }),
    }
}

fn status_field(fields: &Map<String, Value>) -> FieldResult<PropertyStatus> {
    const EXPECTED: &str = "All, Available, Pending or Sold";
    match string_field(fields, "status", EXPECTED)? {
        None => Ok(None),
        Some(s) if s == ALL_STATUSES => Ok(None),
        Some(s) => PropertyStatus::parse(&s)
            .map(Some)
            .ok_or(FinderError::InvalidFilterField {
                field: "status",
                expected: EXPECTED,
            }),
    }
}

fn sort_field(fields: &Map<String, Value>) -> FieldResult<SortKey> {
    const EXPECTED: &str = "newest, price-low, price-high or sqft";
    match string_field(fields, "sortBy", EXPECTED)? {
        None => Ok(None),
        Some(s) => SortKey::parse_browse(&s)
            .map(Some)
            .ok_or(FinderError::InvalidFilterField {
                field: "sortBy",
                expected: EXPECTED,
            }),
    }
}

fn property_types_field(fields: &Map<String, Value>) -> Vec<String> {
    match present(fields, "propertyTypes") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(s) => Some(s.to_string()),
                None => {
                    warn!("Dropping non-string property type: {}", item);
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(
                "Ignoring filter field propertyTypes: expected array of strings, got {}",
                other
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full() {
        let spec = FilterSpec::from_json(&json!({
            "priceMin": 150000,
            "priceMax": 500000.5,
            "propertyTypes": ["Condo", "House"],
            "bedrooms": 3,
            "bathrooms": 1.5,
            "location": " Austin ",
            "status": "Pending",
            "sortBy": "price-high"
        }));

        assert_eq!(spec.price_min, Some(150_000.0));
        assert_eq!(spec.price_max, Some(500_000.5));
        assert_eq!(spec.property_types, vec!["Condo", "House"]);
        assert_eq!(spec.bedrooms, Some(3));
        assert_eq!(spec.bathrooms, Some(1.5));
        assert_eq!(spec.location.as_deref(), Some(" Austin "));
        assert_eq!(spec.status, Some(PropertyStatus::Pending));
        assert_eq!(spec.sort_by, SortKey::PriceHigh);
    }

    #[test]
    fn test_from_json_nulls_and_missing_are_unset() {
        let spec = FilterSpec::from_json(&json!({
            "priceMin": null,
            "status": "All"
        }));
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn test_from_json_wrong_types_are_ignored() {
        let spec = FilterSpec::from_json(&json!({
            "priceMin": "cheap",
            "priceMax": 300000,
            "propertyTypes": "Condo",
            "bedrooms": -2,
            "bathrooms": [2],
            "location": 90210,
            "status": "Foreclosed",
            "sortBy": 7
        }));

        assert_eq!(spec.price_min, None);
        assert_eq!(spec.price_max, Some(300_000.0));
        assert!(spec.property_types.is_empty());
        assert_eq!(spec.bedrooms, None);
        assert_eq!(spec.bathrooms, None);
        assert_eq!(spec.location, None);
        assert_eq!(spec.status, None);
        assert_eq!(spec.sort_by, SortKey::Newest);
    }

    #[test]
    fn test_from_json_drops_non_string_types() {
        let spec = FilterSpec::from_json(&json!({ "propertyTypes": ["Condo", 3, null, "House"] }));
        assert_eq!(spec.property_types, vec!["Condo", "House"]);
    }

    #[test]
    fn test_from_json_non_object() {
        assert_eq!(FilterSpec::from_json(&json!([1, 2])), FilterSpec::default());
        assert_eq!(FilterSpec::from_json(&Value::Null), FilterSpec::default());
    }

    #[test]
    fn test_title_sort_not_offered_when_browsing() {
        let spec = FilterSpec::from_json(&json!({ "sortBy": "title" }));
        assert_eq!(spec.sort_by, SortKey::Newest);
        assert_eq!(SortKey::parse_saved("title"), Some(SortKey::Title));
        assert_eq!(SortKey::parse_saved("sqft"), Some(SortKey::Sqft));
    }

    #[test]
    fn test_builder() {
        let spec = FilterSpec::new()
            .price_min(100_000.0)
            .property_type("Condo")
            .sort_by(SortKey::Sqft);
        assert_eq!(spec.price_min, Some(100_000.0));
        assert_eq!(spec.property_types, vec!["Condo"]);
        assert_eq!(spec.sort_by, SortKey::Sqft);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let spec = FilterSpec::new().price_max(250_000.0).sort_by(SortKey::PriceLow);
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["priceMax"], 250_000.0);
        assert_eq!(value["sortBy"], "price-low");

        let back: FilterSpec = serde_json::from_value(value).unwrap();
        assert_eq!(back, spec);
    }
}
