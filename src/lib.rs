//! Facade crate for the EatSafe inspection directory.
//!
//! This crate re-exports the core domain types and exposes the SQLite store
//! behind a feature flag.

#![forbid(unsafe_code)]

pub use eatsafe_core::{
    Comment, DATABASE_URL_ENV, DEFAULT_DATABASE_URL, DEFAULT_NEARBY_LIMIT, DatabaseLocation,
    DatabaseUrlError, Facility, FacilityCoordinate, FacilityDirectory, FacilityReport,
    FieldError, Inspection, InspectionReport, NearbyFacility, NearbyQuery, Question,
    QuestionLabels, QuestionReport, SEARCH_LIMIT, SearchTerm, SearchTermError, great_circle_km,
};

#[cfg(feature = "store-sqlite")]
pub use eatsafe_core::{SqliteFacilityStore, StoreError};
