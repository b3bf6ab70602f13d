//! Facilities and the geocoded positions staged alongside them.

use chrono::{DateTime, Utc};
use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::{
    FieldError, RECORD_KEY_MAX, TEXT_MAX, Validate, check_latitude, check_longitude,
    limit_optional_text, require_key,
};

/// An inspected establishment such as a restaurant or grocery store.
///
/// Coordinates are WGS84 decimal degrees. A facility without both `lat` and
/// `lon` has no [`location`](Self::location) and never appears in
/// `nearby` results.
///
/// # Examples
/// ```
/// use eatsafe_core::Facility;
///
/// let facility = Facility::new("F-1", "Pizza Hut").with_location(45.42, -75.69);
/// assert_eq!(facility.name, "Pizza Hut");
/// assert!(facility.location().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facility {
    /// Opaque key assigned by the import process.
    pub id: String,
    /// Trading name.
    pub name: String,
    /// Civic number, kept as text because imports carry suffixes.
    pub street_number: Option<String>,
    /// Street name.
    pub street_name: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Neighbourhood or ward label.
    pub area_en: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    pub lon: Option<f64>,
    /// Key of the owning facility category.
    pub facility_category_id: Option<String>,
    /// Creation time, stamped by the store when absent.
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, touched by the store on every update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Facility {
    /// Column width of [`street_number`](Self::street_number).
    pub const STREET_NUMBER_MAX: usize = 50;
    /// Column width of [`postal_code`](Self::postal_code).
    pub const POSTAL_CODE_MAX: usize = 10;
    /// Column width of [`phone`](Self::phone).
    pub const PHONE_MAX: usize = 20;
    /// Column width of [`area_en`](Self::area_en).
    pub const AREA_MAX: usize = 25;
    /// Column width of [`city`](Self::city).
    pub const CITY_MAX: usize = 35;

    /// Construct a facility with the required columns and everything else
    /// unset.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the facility's coordinates.
    #[must_use]
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Assign the facility to a category.
    #[must_use]
    pub fn with_category(mut self, facility_category_id: impl Into<String>) -> Self {
        self.facility_category_id = Some(facility_category_id.into());
        self
    }

    /// Position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    ///
    /// Returns `None` unless both latitude and longitude are present.
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: self.lon?,
            y: self.lat?,
        })
    }
}

impl Validate for Facility {
    fn validate(&self) -> Result<(), FieldError> {
        const ENTITY: &str = "facility";
        require_key(ENTITY, "id", &self.id, RECORD_KEY_MAX)?;
        limit_optional_text(ENTITY, "name", Some(&self.name), TEXT_MAX)?;
        limit_optional_text(
            ENTITY,
            "street_number",
            self.street_number.as_deref(),
            Self::STREET_NUMBER_MAX,
        )?;
        limit_optional_text(ENTITY, "street_name", self.street_name.as_deref(), TEXT_MAX)?;
        limit_optional_text(
            ENTITY,
            "postal_code",
            self.postal_code.as_deref(),
            Self::POSTAL_CODE_MAX,
        )?;
        limit_optional_text(ENTITY, "phone", self.phone.as_deref(), Self::PHONE_MAX)?;
        limit_optional_text(ENTITY, "area_en", self.area_en.as_deref(), Self::AREA_MAX)?;
        limit_optional_text(ENTITY, "city", self.city.as_deref(), Self::CITY_MAX)?;
        if let Some(lat) = self.lat {
            check_latitude(ENTITY, lat)?;
        }
        if let Some(lon) = self.lon {
            check_longitude(ENTITY, lon)?;
        }
        Ok(())
    }
}

/// A geocoded position staged by the import process.
///
/// The table shares its key format with [`Facility`] but carries no foreign
/// key to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacilityCoordinate {
    /// Opaque key, usually a facility id.
    pub id: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Creation time, stamped by the store when absent.
    pub created_at: Option<DateTime<Utc>>,
}

impl FacilityCoordinate {
    /// Construct an unstamped coordinate row.
    #[must_use]
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            created_at: None,
        }
    }
}

impl Validate for FacilityCoordinate {
    fn validate(&self) -> Result<(), FieldError> {
        const ENTITY: &str = "facility_coordinate";
        require_key(ENTITY, "id", &self.id, RECORD_KEY_MAX)?;
        check_latitude(ENTITY, self.lat)?;
        check_longitude(ENTITY, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn location_requires_both_axes() {
        let mut facility = Facility::new("F-1", "Cafe");
        facility.lat = Some(1.0);
        assert_eq!(facility.location(), None);
        facility.lon = Some(2.0);
        assert_eq!(facility.location(), Some(Coord { x: 2.0, y: 1.0 }));
    }

    #[rstest]
    fn rejects_overlong_postal_code() {
        let mut facility = Facility::new("F-1", "Cafe");
        facility.postal_code = Some("K1A 0B1 EXTRA".into());
        assert!(matches!(
            facility.validate(),
            Err(FieldError::TooLong { field: "postal_code", max: 10, .. })
        ));
    }

    #[rstest]
    fn rejects_latitude_outside_range() {
        let facility = Facility::new("F-1", "Cafe").with_location(91.0, 0.0);
        assert!(matches!(
            facility.validate(),
            Err(FieldError::LatitudeOutOfRange { .. })
        ));
    }

    #[rstest]
    fn rejects_blank_id() {
        assert!(matches!(
            Facility::new("", "Cafe").validate(),
            Err(FieldError::Empty { field: "id", .. })
        ));
    }

    #[rstest]
    fn coordinate_validates_longitude() {
        let coordinate = FacilityCoordinate::new("F-1", 0.0, 200.0);
        assert!(matches!(
            coordinate.validate(),
            Err(FieldError::LongitudeOutOfRange { .. })
        ));
    }
}
