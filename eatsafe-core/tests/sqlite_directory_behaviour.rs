//! Behavioural tests for `SqliteFacilityStore` queries using rstest-bdd.

use std::cell::RefCell;

use eatsafe_core::{
    Facility, FacilityDirectory, NearbyFacility, NearbyQuery, SearchTerm, SqliteFacilityStore,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Shared state for directory scenarios.
struct DirectoryWorld {
    store: SqliteFacilityStore,
    nearby: RefCell<Vec<NearbyFacility>>,
    found: RefCell<Vec<Facility>>,
}

impl DirectoryWorld {
    fn new() -> Self {
        Self {
            store: SqliteFacilityStore::open_in_memory().expect("open in-memory store"),
            nearby: RefCell::new(Vec::new()),
            found: RefCell::new(Vec::new()),
        }
    }

    fn seed<I>(&self, facilities: I)
    where
        I: IntoIterator<Item = Facility>,
    {
        for facility in facilities {
            self.store.insert(facility).expect("insert facility");
        }
    }

    fn run_nearby(&self, query: &NearbyQuery) {
        let results = self.store.nearby(query).expect("nearby query");
        self.nearby.replace(results);
    }

    fn run_search(&self, term: &str) {
        let term = SearchTerm::new(term).expect("valid search term");
        let results = self.store.search(&term).expect("search query");
        self.found.replace(results);
    }

    fn nearby_ids(&self) -> Vec<String> {
        self.nearby
            .borrow()
            .iter()
            .map(|hit| hit.facility.id.clone())
            .collect()
    }
}

#[fixture]
fn world() -> DirectoryWorld {
    DirectoryWorld::new()
}

#[given("a SQLite directory with one facility at the origin")]
fn given_origin_facility(world: &DirectoryWorld) {
    world.seed([Facility::new("F-0", "Null Island Diner").with_location(0.0, 0.0)]);
}

#[given("a SQLite directory with pizza and burger restaurants")]
fn given_pizza_and_burgers(world: &DirectoryWorld) {
    world.seed([
        Facility::new("F-1", "Pizza Hut").with_location(0.02, 0.0),
        Facility::new("F-2", "Luigi's pizzeria").with_location(0.01, 0.0),
        Facility::new("F-3", "Burger King").with_location(0.0, 0.0),
    ]);
}

#[given("a SQLite directory with a facility that has no coordinates")]
fn given_unplaced_facility(world: &DirectoryWorld) {
    world.seed([
        Facility::new("F-1", "Corner Store").with_location(0.5, 0.5),
        Facility::new("F-2", "Food Truck"),
    ]);
}

#[given("a SQLite directory with cafes and other restaurants")]
fn given_cafes(world: &DirectoryWorld) {
    world.seed([
        Facility::new("F-1", "Bridgehead Cafe"),
        Facility::new("F-2", "CAFE MOZART").with_location(45.0, -75.0),
        Facility::new("F-3", "Shawarma Palace"),
        Facility::new("F-4", "Little Cafeteria"),
    ]);
}

#[when("I ask for the single nearest facility to the origin")]
fn when_single_nearest(world: &DirectoryWorld) {
    world.run_nearby(&NearbyQuery::at(0.0, 0.0).with_limit(1));
}

#[when("I ask for facilities near the origin named like \"Pizza\"")]
fn when_nearby_pizza(world: &DirectoryWorld) {
    world.run_nearby(&NearbyQuery::at(0.0, 0.0).with_filter("Pizza"));
}

#[when("I ask for facilities near the origin")]
fn when_nearby_origin(world: &DirectoryWorld) {
    world.run_nearby(&NearbyQuery::at(0.0, 0.0));
}

#[when("I search for \"cafe\"")]
fn when_search_cafe(world: &DirectoryWorld) {
    world.run_search("cafe");
}

#[when("I search for a name that matches nothing")]
fn when_search_nothing(world: &DirectoryWorld) {
    world.run_search("sushi");
}

#[then("the origin facility is returned with distance zero")]
fn then_origin_at_zero(world: &DirectoryWorld) {
    let results = world.nearby.borrow();
    assert_eq!(results.len(), 1, "expected exactly one facility");
    let hit = results.first().expect("one result");
    assert_eq!(hit.facility.id, "F-0");
    assert_eq!(hit.distance, 0.0);
}

#[then("only the pizza restaurants are returned closest first")]
fn then_pizza_only(world: &DirectoryWorld) {
    assert_eq!(world.nearby_ids(), vec!["F-2", "F-1"]);
    let results = world.nearby.borrow();
    assert!(
        results
            .windows(2)
            .all(|pair| pair.first().map(|hit| hit.distance)
                <= pair.last().map(|hit| hit.distance)),
        "distances must not decrease"
    );
}

#[then("the facility without coordinates is not returned")]
fn then_unplaced_skipped(world: &DirectoryWorld) {
    assert_eq!(world.nearby_ids(), vec!["F-1"]);
}

#[then("every returned facility has \"cafe\" in its name")]
fn then_cafes_only(world: &DirectoryWorld) {
    let found = world.found.borrow();
    let ids: Vec<_> = found.iter().map(|facility| facility.id.as_str()).collect();
    assert_eq!(ids, vec!["F-1", "F-2", "F-4"]);
    assert!(
        found
            .iter()
            .all(|facility| facility.name.to_lowercase().contains("cafe"))
    );
}

#[then("no facilities are returned")]
fn then_nothing_found(world: &DirectoryWorld) {
    assert!(world.found.borrow().is_empty());
}

#[scenario(path = "tests/features/sqlite_directory.feature", index = 0)]
fn facility_at_query_point(world: DirectoryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_directory.feature", index = 1)]
fn name_filter_is_case_insensitive(world: DirectoryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_directory.feature", index = 2)]
fn unplaced_facilities_are_skipped(world: DirectoryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_directory.feature", index = 3)]
fn search_for_cafes(world: DirectoryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/sqlite_directory.feature", index = 4)]
fn search_without_matches(world: DirectoryWorld) {
    let _ = world;
}
