//! Property-based tests for the facility directory queries.
//!
//! # Invariants tested
//!
//! - **Ordering:** `nearby` distances never decrease and are never `NaN`.
//! - **Filtering:** every returned name contains the filter, ignoring case.
//! - **Limits:** `nearby` honours its limit, `search` never exceeds 100 rows.
//! - **Agreement:** the SQLite store and the in-memory directory return the
//!   same rows in the same order.

use chrono::{DateTime, TimeZone, Utc};
use eatsafe_core::{
    Facility, FacilityDirectory, NearbyQuery, SEARCH_LIMIT, SearchTerm, SqliteFacilityStore,
    name_contains, test_support::MemoryDirectory,
};
use proptest::prelude::*;

const NAMES: &[&str] = &[
    "Cafe Nero",
    "Bridgehead CAFE",
    "Pizza Hut",
    "Luigi's pizzeria",
    "Burger King",
    "Shawarma Palace",
];

const FILTERS: &[&str] = &["", "cafe", "Pizza", "king", "sushi"];

fn imported_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn facility_strategy() -> impl Strategy<Value = (String, Option<(f64, f64)>)> {
    (
        prop::sample::select(NAMES),
        prop::option::weighted(0.8, (-90.0..=90.0_f64, -180.0..=180.0_f64)),
    )
        .prop_map(|(name, location)| (name.to_owned(), location))
}

fn facilities_strategy(max: usize) -> impl Strategy<Value = Vec<Facility>> {
    prop::collection::vec(facility_strategy(), 0..max).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (name, location))| {
                let mut facility = Facility::new(format!("F-{index:03}"), name);
                if let Some((lat, lon)) = location {
                    facility = facility.with_location(lat, lon);
                }
                facility.created_at = Some(imported_at());
                facility.updated_at = Some(imported_at());
                facility
            })
            .collect()
    })
}

fn query_strategy() -> impl Strategy<Value = NearbyQuery> {
    (
        -90.0..=90.0_f64,
        -180.0..=180.0_f64,
        prop::sample::select(FILTERS),
        0_usize..40,
    )
        .prop_map(|(lat, lon, filter, limit)| {
            NearbyQuery::at(lat, lon).with_filter(filter).with_limit(limit)
        })
}

fn sqlite_store(facilities: &[Facility]) -> SqliteFacilityStore {
    let store = SqliteFacilityStore::open_in_memory().expect("open store");
    for facility in facilities {
        store.insert(facility.clone()).expect("insert facility");
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: `nearby` is sorted, filtered, bounded and free of `NaN`.
    #[test]
    fn nearby_results_are_sorted_and_filtered(
        facilities in facilities_strategy(40),
        query in query_strategy(),
    ) {
        let store = sqlite_store(&facilities);
        let results = store.nearby(&query).expect("nearby query");

        prop_assert!(results.len() <= query.limit);
        for hit in &results {
            prop_assert!(!hit.distance.is_nan());
            prop_assert!(hit.facility.location().is_some());
            prop_assert!(name_contains(&hit.facility.name, &query.filter));
        }
        for pair in results.windows(2) {
            if let [nearer, farther] = pair {
                prop_assert!(nearer.distance <= farther.distance);
            }
        }
    }

    /// Property: the SQLite store and the in-memory directory agree.
    #[test]
    fn sqlite_and_memory_directories_agree(
        facilities in facilities_strategy(40),
        query in query_strategy(),
    ) {
        let store = sqlite_store(&facilities);
        let memory = MemoryDirectory::with_facilities(facilities);

        let from_sql = store.nearby(&query).expect("nearby query");
        let from_memory = memory.nearby(&query).expect("infallible");
        prop_assert_eq!(from_sql, from_memory);

        if let Ok(term) = SearchTerm::new(query.filter.clone()) {
            let from_sql = store.search(&term).expect("search query");
            let from_memory = memory.search(&term).expect("infallible");
            prop_assert_eq!(from_sql, from_memory);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: `search` returns at most 100 matching rows in id order.
    #[test]
    fn search_is_capped_and_ordered(facilities in facilities_strategy(160)) {
        let store = sqlite_store(&facilities);
        let term = SearchTerm::new("cafe").expect("valid term");
        let results = store.search(&term).expect("search query");

        let matching = facilities
            .iter()
            .filter(|facility| name_contains(&facility.name, "cafe"))
            .count();
        prop_assert_eq!(results.len(), matching.min(SEARCH_LIMIT));
        prop_assert!(results.iter().all(|facility| name_contains(&facility.name, "cafe")));
        for pair in results.windows(2) {
            if let [first, second] = pair {
                prop_assert!(first.id < second.id);
            }
        }
    }
}
