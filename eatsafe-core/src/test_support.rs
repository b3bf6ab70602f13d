//! Test-only, in-memory `FacilityDirectory` implementation and seed data used
//! by unit and behaviour tests.

use std::{cmp::Ordering, convert::Infallible};

use crate::{
    Facility, FacilityDirectory, NearbyFacility, NearbyQuery, SEARCH_LIMIT, SearchTerm,
    great_circle_km, name_contains, round_distance,
};

/// In-memory `FacilityDirectory` implementation used in tests.
///
/// The directory performs a linear scan and is intended only for small
/// datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryDirectory {
    facilities: Vec<Facility>,
}

impl MemoryDirectory {
    /// Create a directory from a collection of facilities.
    #[must_use]
    pub fn with_facilities<I>(facilities: I) -> Self
    where
        I: IntoIterator<Item = Facility>,
    {
        Self {
            facilities: facilities.into_iter().collect(),
        }
    }
}

impl FacilityDirectory for MemoryDirectory {
    type Error = Infallible;

    fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyFacility>, Infallible> {
        let mut ranked: Vec<(f64, &Facility)> = self
            .facilities
            .iter()
            .filter(|facility| name_contains(&facility.name, &query.filter))
            .filter_map(|facility| {
                facility
                    .location()
                    .map(|location| (great_circle_km(location, query.origin), facility))
            })
            .collect();
        ranked.sort_by(|(left_km, left), (right_km, right)| {
            rank_distance(*left_km, *right_km).then_with(|| left.id.cmp(&right.id))
        });
        Ok(ranked
            .into_iter()
            .take(query.limit)
            .map(|(distance, facility)| NearbyFacility {
                facility: facility.clone(),
                distance: round_distance(distance),
            })
            .collect())
    }

    fn search(&self, term: &SearchTerm) -> Result<Vec<Facility>, Infallible> {
        let mut matches: Vec<Facility> = self
            .facilities
            .iter()
            .filter(|facility| name_contains(&facility.name, term.as_str()))
            .cloned()
            .collect();
        matches.sort_by(|left, right| left.id.cmp(&right.id));
        matches.truncate(SEARCH_LIMIT);
        Ok(matches)
    }
}

/// Finite distances ascending, then every `NaN` as an equal tail.
fn rank_distance(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (false, false) => left.total_cmp(&right),
        (left_nan, right_nan) => left_nan.cmp(&right_nan),
    }
}

/// Lookup rows and a fully populated facility for store tests.
#[cfg(feature = "store-sqlite")]
pub mod seed {
    use chrono::NaiveDate;

    use crate::{
        ComplianceCategory, ComplianceDescription, ComplianceResult, Facility, FacilityCategory,
        Inspection, NewComment, NewQuestion, RiskLevel, SqliteFacilityStore, StoreError,
    };

    /// Key of the seeded facility.
    pub const FACILITY_ID: &str = "F-100";

    /// Insert one row in every lookup table.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn lookups(store: &SqliteFacilityStore) -> Result<(), StoreError> {
        store.insert(RiskLevel::new("H", "High"))?;
        store.insert(RiskLevel::new("L", "Low"))?;
        store.insert(ComplianceResult::new("Y", "In compliance"))?;
        store.insert(ComplianceResult::new("N", "Not in compliance"))?;
        store.insert(ComplianceCategory::new("FH", "Food handling"))?;
        store.insert(ComplianceCategory::new("SAN", "Sanitation"))?;
        store.insert(ComplianceDescription::new(
            "HYG-01",
            "Hands washed before handling food",
            "H",
        ))?;
        store.insert(ComplianceDescription::new(
            "SAN-02",
            "Garbage removed daily",
            "L",
        ))?;
        store.insert(FacilityCategory::new("REST", "Restaurant"))?;
        Ok(())
    }

    /// Insert the lookups plus a facility with two inspections, three
    /// questions and a comment.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn inspected_facility(store: &SqliteFacilityStore) -> Result<(), StoreError> {
        lookups(store)?;
        store.insert(
            Facility::new(FACILITY_ID, "Pizza Palace")
                .with_location(45.4215, -75.6972)
                .with_category("REST"),
        )?;

        let mut older = Inspection::new("I-1", FACILITY_ID, date(2011, 3, 14));
        older.in_compliance = false;
        older.report_number = Some(1041);
        store.insert(older)?;
        store.insert(Inspection::new("I-2", FACILITY_ID, date(2012, 7, 2)))?;

        let hands = store.add_question(question("I-1", 2, "N", "FH", "HYG-01"))?;
        store.add_question(question("I-1", 1, "Y", "SAN", "SAN-02"))?;
        store.add_question(question("I-2", 1, "Y", "FH", "HYG-01"))?;
        store.add_comment(NewComment {
            question_id: hands.id,
            text_en: "No soap at the hand sink".into(),
        })?;
        Ok(())
    }

    fn question(
        inspection_id: &str,
        sort: i64,
        result: &str,
        category: &str,
        description: &str,
    ) -> NewQuestion {
        NewQuestion {
            inspection_id: inspection_id.to_owned(),
            sort,
            compliance_result_id: result.to_owned(),
            compliance_category_id: category.to_owned(),
            compliance_description_id: description.to_owned(),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn directory() -> MemoryDirectory {
        MemoryDirectory::with_facilities([
            Facility::new("B", "Pizza Hut").with_location(0.0, 1.0),
            Facility::new("A", "Luigi's pizzeria").with_location(0.0, 1.0),
            Facility::new("C", "Burger King").with_location(0.0, 0.5),
            Facility::new("D", "Pizza Nowhere"),
        ])
    }

    #[rstest]
    fn nearby_breaks_distance_ties_by_id(directory: MemoryDirectory) {
        let found = directory
            .nearby(&NearbyQuery::at(0.0, 0.0).with_filter("pizza"))
            .expect("infallible");
        let ids: Vec<_> = found.iter().map(|hit| hit.facility.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[rstest]
    fn search_includes_facilities_without_coordinates(directory: MemoryDirectory) {
        let term = SearchTerm::new("nowhere").expect("valid term");
        let found = directory.search(&term).expect("infallible");
        assert_eq!(found.len(), 1);
    }
}
