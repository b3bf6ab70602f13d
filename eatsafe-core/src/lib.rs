//! Core data model for the EatSafe food-inspection directory.
//!
//! Facilities, their inspections and the questions asked during each
//! inspection are plain structs validated against the column widths of the
//! schema. The [`FacilityDirectory`] trait answers the two read queries the
//! directory exists for: facilities ranked by distance from a point, and
//! facilities whose name contains some text. With the `store-sqlite` feature
//! [`SqliteFacilityStore`] persists everything in SQLite and resolves the
//! derived labels (facility category, question risk level) on every read.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod database;
mod directory;
mod distance;
mod facility;
mod field;
mod inspection;
mod lookup;
mod report;
#[cfg(feature = "store-sqlite")]
mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use database::{DATABASE_URL_ENV, DEFAULT_DATABASE_URL, DatabaseLocation, DatabaseUrlError};
pub use directory::{
    DEFAULT_NEARBY_LIMIT, FacilityDirectory, NearbyFacility, NearbyQuery, SEARCH_LIMIT,
    SearchTerm, SearchTermError,
};
pub use distance::{
    DISTANCE_DECIMALS, EARTH_RADIUS_KM, great_circle_km, name_contains, round_distance,
};
pub use facility::{Facility, FacilityCoordinate};
pub use field::{FieldError, RECORD_KEY_MAX, TEXT_MAX, Validate};
pub use inspection::{Comment, Inspection, NewComment, NewQuestion, Question, QuestionLabels};
pub use lookup::{
    ComplianceCategory, ComplianceDescription, ComplianceResult, FacilityCategory, RiskLevel,
};
pub use report::{FacilityReport, InspectionReport, QuestionReport};
#[cfg(feature = "store-sqlite")]
pub use store::{
    Record, SCHEMA_VERSION, SchemaError, SqliteFacilityStore, StoreError, initialise_schema,
};
