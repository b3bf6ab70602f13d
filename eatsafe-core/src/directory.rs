//! Read-only query surface over a set of facilities.
//!
//! The [`FacilityDirectory`] trait answers the two questions the directory
//! is built for: which facilities are closest to a point, and which
//! facilities have a name containing some text.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Facility;

/// Number of facilities `nearby` returns when no limit is given.
pub const DEFAULT_NEARBY_LIMIT: usize = 25;

/// Maximum number of facilities `search` returns.
pub const SEARCH_LIMIT: usize = 100;

/// Parameters of a distance-ranked facility lookup.
///
/// The origin is not validated: out-of-range coordinates simply produce
/// meaningless distances.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use eatsafe_core::NearbyQuery;
///
/// let query = NearbyQuery::new(Coord { x: -75.69, y: 45.42 })
///     .with_filter("pizza")
///     .with_limit(5);
/// assert_eq!(query.limit, 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Query point (`x = longitude`, `y = latitude`).
    pub origin: Coord<f64>,
    /// Case-insensitive substring the facility name must contain.
    pub filter: String,
    /// Maximum number of results.
    pub limit: usize,
}

impl NearbyQuery {
    /// Query around `origin` with no name filter and the default limit.
    #[must_use]
    pub const fn new(origin: Coord<f64>) -> Self {
        Self {
            origin,
            filter: String::new(),
            limit: DEFAULT_NEARBY_LIMIT,
        }
    }

    /// Query around a latitude/longitude pair.
    #[must_use]
    pub const fn at(lat: f64, lon: f64) -> Self {
        Self::new(Coord { x: lon, y: lat })
    }

    /// Restrict results to names containing `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A facility paired with its distance from the query point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyFacility {
    /// The matching facility.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub facility: Facility,
    /// Great-circle distance in kilometres, rounded to four places. `NaN`
    /// when the query origin is not a finite coordinate.
    pub distance: f64,
}

/// Validated text fragment for name searches.
///
/// # Examples
/// ```
/// use eatsafe_core::SearchTerm;
///
/// assert!(SearchTerm::new("cafe").is_ok());
/// assert!(SearchTerm::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

/// Errors returned by [`SearchTerm::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchTermError {
    /// The term was empty or whitespace.
    #[error("search term must not be empty")]
    Empty,
}

impl SearchTerm {
    /// Validate and wrap a search fragment.
    ///
    /// # Errors
    /// Returns [`SearchTermError::Empty`] for empty or whitespace-only input.
    pub fn new(term: impl Into<String>) -> Result<Self, SearchTermError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(SearchTermError::Empty);
        }
        Ok(Self(term))
    }

    /// The fragment as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only facility lookups.
///
/// Implementations must agree on semantics: names match as case-insensitive
/// literal substrings, distances follow
/// [`great_circle_km`](crate::great_circle_km) rounded with
/// [`round_distance`](crate::round_distance), and facilities without
/// coordinates are skipped by `nearby`.
pub trait FacilityDirectory {
    /// Error raised by the backing storage.
    type Error: std::error::Error;

    /// Facilities whose name contains `query.filter`, closest first.
    ///
    /// Ties on distance are broken by facility id. At most `query.limit`
    /// results are returned. The origin is not validated: a non-finite
    /// origin yields `NaN` distances, ranked last, rather than an error.
    ///
    /// # Errors
    /// Propagates storage failures.
    fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyFacility>, Self::Error>;

    /// Up to [`SEARCH_LIMIT`] facilities whose name contains `term`,
    /// ordered by id.
    ///
    /// # Errors
    /// Propagates storage failures.
    fn search(&self, term: &SearchTerm) -> Result<Vec<Facility>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn query_defaults_match_all_names() {
        let query = NearbyQuery::at(1.0, 2.0);
        assert_eq!(query.origin, Coord { x: 2.0, y: 1.0 });
        assert!(query.filter.is_empty());
        assert_eq!(query.limit, DEFAULT_NEARBY_LIMIT);
    }

    #[rstest]
    #[case("")]
    #[case(" \t")]
    fn blank_terms_are_rejected(#[case] term: &str) {
        assert_eq!(SearchTerm::new(term), Err(SearchTermError::Empty));
    }

    #[rstest]
    fn terms_keep_surrounding_whitespace() {
        let term = SearchTerm::new(" cafe ").expect("valid term");
        assert_eq!(term.as_str(), " cafe ");
    }
}
