use chrono::NaiveDate;
use home_finder::{
    query, FilterSpec, MemoryStore, PersistenceAdapter, Property, PropertyId, PropertyStatus,
    SavedSetManager, SortKey, SAVED_PROPERTIES_KEY,
};
use proptest::prelude::*;
use std::sync::Arc;

const TYPES: [&str; 3] = ["House", "Apartment", "Condo"];
const CITIES: [&str; 3] = ["Austin", "Denver", "Boston"];

fn arb_property(id: u32) -> impl Strategy<Value = Property> {
    (
        0u32..20,
        0u32..6,
        0u32..8,
        0usize..3,
        0usize..3,
        0u32..3,
        0i64..10,
    )
        .prop_map(move |(price_step, beds, half_baths, kind, city, status, day)| Property {
            id: PropertyId(id),
            title: format!("Listing {id}"),
            price: f64::from(price_step) * 50_000.0,
            bedrooms: beds,
            bathrooms: half_baths as f32 / 2.0,
            square_feet: 500 + price_step * 100,
            property_type: TYPES[kind].to_string(),
            address: format!("{id} Pine St"),
            city: CITIES[city].to_string(),
            state: "ZZ".to_string(),
            zip_code: format!("0{}", 1000 + city),
            status: match status {
                0 => PropertyStatus::Available,
                1 => PropertyStatus::Pending,
                _ => PropertyStatus::Sold,
            },
            // Few distinct dates so ties are common.
            listing_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(day % 3),
            description: String::new(),
            images: vec![],
            features: vec![],
            amenities: vec![],
            agent: None,
            coordinates: None,
            year_built: None,
            lot_size: None,
        })
}

fn arb_catalog() -> impl Strategy<Value = Vec<Property>> {
    (0usize..25).prop_flat_map(|len| {
        (0..len)
            .map(|i| arb_property(i as u32 + 1))
            .collect::<Vec<_>>()
    })
}

fn arb_sort() -> impl Strategy<Value = SortKey> {
    prop_oneof![
        Just(SortKey::Newest),
        Just(SortKey::PriceLow),
        Just(SortKey::PriceHigh),
        Just(SortKey::Sqft),
    ]
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        proptest::option::of(0u32..20),
        proptest::option::of(0u32..20),
        proptest::sample::subsequence(TYPES.to_vec(), 0..=3),
        proptest::option::of(0u32..6),
        proptest::option::of(0u32..8),
        proptest::option::of(prop_oneof![Just("austin"), Just("DEN"), Just("0100"), Just("  ")]),
        arb_sort(),
    )
        .prop_map(|(min, max, types, beds, baths, location, sort_by)| FilterSpec {
            price_min: min.map(|s| f64::from(s) * 50_000.0),
            price_max: max.map(|s| f64::from(s) * 50_000.0),
            property_types: types.into_iter().map(String::from).collect(),
            bedrooms: beds,
            bathrooms: baths.map(|b| b as f32 / 2.0),
            location: location.map(String::from),
            status: None,
            sort_by,
        })
}

/// Every way to add one more constraint to `spec`
fn tightened(spec: &FilterSpec) -> Vec<FilterSpec> {
    let mut out = Vec::new();
    if spec.price_min.is_none() {
        out.push(FilterSpec { price_min: Some(300_000.0), ..spec.clone() });
    }
    if spec.price_max.is_none() {
        out.push(FilterSpec { price_max: Some(400_000.0), ..spec.clone() });
    }
    if spec.property_types.is_empty() {
        out.push(FilterSpec { property_types: vec!["Condo".to_string()], ..spec.clone() });
    }
    if spec.bedrooms.is_none() {
        out.push(FilterSpec { bedrooms: Some(2), ..spec.clone() });
    }
    if spec.bathrooms.is_none() {
        out.push(FilterSpec { bathrooms: Some(1.5), ..spec.clone() });
    }
    if spec.location.is_none() {
        out.push(FilterSpec { location: Some("denver".to_string()), ..spec.clone() });
    }
    if spec.status.is_none() {
        out.push(FilterSpec { status: Some(PropertyStatus::Pending), ..spec.clone() });
    }
    out
}

proptest! {
    #[test]
    fn query_is_deterministic(catalog in arb_catalog(), spec in arb_spec()) {
        let before = catalog.clone();
        prop_assert_eq!(query(&catalog, &spec), query(&catalog, &spec));
        prop_assert_eq!(catalog, before);
    }

    #[test]
    fn adding_a_constraint_never_grows_results(catalog in arb_catalog(), spec in arb_spec()) {
        let base = query(&catalog, &spec).len();
        for narrower in tightened(&spec) {
            prop_assert!(query(&catalog, &narrower).len() <= base);
        }
    }

    #[test]
    fn results_are_a_subset_in_sorted_order(catalog in arb_catalog(), spec in arb_spec()) {
        let results = query(&catalog, &spec);
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match spec.sort_by {
                SortKey::PriceLow => prop_assert!(a.price <= b.price),
                SortKey::PriceHigh => prop_assert!(a.price >= b.price),
                SortKey::Sqft => prop_assert!(a.square_feet >= b.square_feet),
                _ => prop_assert!(a.listing_date >= b.listing_date),
            }
        }
        for property in &results {
            prop_assert!(catalog.contains(property));
        }
    }

    #[test]
    fn newest_keeps_catalog_order_for_equal_dates(catalog in arb_catalog()) {
        let results = query(&catalog, &FilterSpec::new().sort_by(SortKey::Newest));
        let position = |id: PropertyId| catalog.iter().position(|p| p.id == id).unwrap();
        for pair in results.windows(2) {
            if pair[0].listing_date == pair[1].listing_date {
                prop_assert!(position(pair[0].id) < position(pair[1].id));
            }
        }
    }

    #[test]
    fn double_toggle_restores_saved_set(
        initial in proptest::collection::vec(1u32..50, 0..10),
        id in 1u32..60,
    ) {
        let store = MemoryStore::new();
        let saved = SavedSetManager::new(Arc::new(store.clone()));
        for existing in initial {
            saved.save(PropertyId(existing)).unwrap();
        }
        let before = saved.list();

        saved.toggle(PropertyId(id)).unwrap();
        saved.toggle(PropertyId(id)).unwrap();

        let after = saved.list();
        if before.contains(&PropertyId(id)) {
            // Re-added at the end; everything else keeps its order.
            let others: Vec<_> = before.iter().copied().filter(|x| *x != PropertyId(id)).collect();
            prop_assert_eq!(&after[..after.len() - 1], &others[..]);
            prop_assert_eq!(after.last().copied(), Some(PropertyId(id)));
        } else {
            prop_assert_eq!(after, before);
        }
    }

    #[test]
    fn store_matches_membership(ops in proptest::collection::vec(1u32..8, 0..30)) {
        let store = MemoryStore::new();
        let saved = SavedSetManager::new(Arc::new(store.clone()));
        for id in ops {
            saved.toggle(PropertyId(id)).unwrap();
            let raw = store.read(SAVED_PROPERTIES_KEY).unwrap().unwrap();
            let persisted: Vec<PropertyId> = serde_json::from_str(&raw).unwrap();
            prop_assert_eq!(&persisted, &saved.list());
            for id in 1..8 {
                prop_assert_eq!(persisted.contains(&PropertyId(id)), saved.contains(PropertyId(id)));
            }
        }
    }
}
