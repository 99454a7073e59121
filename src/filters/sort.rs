use crate::filters::spec::SortKey;
use crate::models::Property;
use std::cmp::Ordering;

pub type Comparator = fn(&Property, &Property) -> Ordering;

/// Comparator for a sort key. Use with a stable sort so ties keep catalog order.
pub fn comparator_for(key: SortKey) -> Comparator {
    match key {
        SortKey::PriceLow => price_low,
        SortKey::PriceHigh => price_high,
        SortKey::Newest => newest,
        SortKey::Sqft => largest,
        SortKey::Title => title,
    }
}

/// Stable in-place sort
pub fn sort_properties(properties: &mut [Property], key: SortKey) {
    properties.sort_by(comparator_for(key));
}

fn price_low(a: &Property, b: &Property) -> Ordering {
    a.price.total_cmp(&b.price)
}

fn price_high(a: &Property, b: &Property) -> Ordering {
    b.price.total_cmp(&a.price)
}

fn newest(a: &Property, b: &Property) -> Ordering {
    b.listing_date.cmp(&a.listing_date)
}

fn largest(a: &Property, b: &Property) -> Ordering {
    b.square_feet.cmp(&a.square_feet)
}

fn title(a: &Property, b: &Property) -> Ordering {
    a.title.to_lowercase().cmp(&b.title.to_lowercase())
}
