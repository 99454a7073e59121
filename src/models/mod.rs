use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Catalog identifier of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub u32);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PropertyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Market status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "Available",
            PropertyStatus::Pending => "Pending",
            PropertyStatus::Sold => "Sold",
        }
    }

    /// Exact, case-sensitive match on the wire name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Available" => Some(PropertyStatus::Available),
            "Pending" => Some(PropertyStatus::Pending),
            "Sold" => Some(PropertyStatus::Sold),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing agent contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentContact {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Map position of a listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Core property data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "Id")]
    pub id: PropertyId,
    #[serde(default)]
    pub title: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub property_type: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub status: PropertyStatus,
    #[serde(deserialize_with = "de_listing_date")]
    pub listing_date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub agent: Option<AgentContact>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub year_built: Option<u32>,
    #[serde(default)]
    pub lot_size: Option<f64>,
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
fn de_listing_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_listing_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid listing date: {raw}"))
    })
}

pub fn parse_listing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.date_naive())
}

/// Fields accepted when a listing is created; the catalog assigns the rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    pub property_type: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub agent: Option<AgentContact>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl NewProperty {
    pub fn into_property(self, id: PropertyId, listing_date: NaiveDate) -> Property {
        Property {
            id,
            title: self.title,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            property_type: self.property_type,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            status: PropertyStatus::Available,
            listing_date,
            description: self.description,
            images: self.images,
            features: self.features,
            amenities: self.amenities,
            agent: self.agent,
            coordinates: self.coordinates,
            year_built: None,
            lot_size: None,
        }
    }
}

/// Partial update of a listing. The id is never part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub square_feet: Option<u32>,
    pub property_type: Option<String>,
    pub status: Option<PropertyStatus>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
}

impl PropertyPatch {
    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(square_feet) = self.square_feet {
            property.square_feet = square_feet;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(status) = self.status {
            property.status = status;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(features) = self.features {
            property.features = features;
        }
        if let Some(amenities) = self.amenities {
            property.amenities = amenities;
        }
    }
}
