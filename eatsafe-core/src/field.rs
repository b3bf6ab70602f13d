//! Column constraints shared by every record type.
//!
//! The limits mirror the widths declared in the SQLite schema so a record
//! that passes [`validate`](crate::Validate::validate) is never rejected by
//! a `CHECK` constraint.

use thiserror::Error;

/// Default width of a free-text column.
pub const TEXT_MAX: usize = 255;

/// Width of the string keys used by facilities, inspections and coordinates.
pub const RECORD_KEY_MAX: usize = 40;

/// Errors raised when a record violates a column constraint.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    /// A required key or label was empty.
    #[error("{entity}.{field} must not be empty")]
    Empty {
        /// Record type owning the field.
        entity: &'static str,
        /// Column name.
        field: &'static str,
    },
    /// A value exceeded the column width.
    #[error("{entity}.{field} is {length} characters long; the limit is {max}")]
    TooLong {
        /// Record type owning the field.
        entity: &'static str,
        /// Column name.
        field: &'static str,
        /// Length of the rejected value, in characters.
        length: usize,
        /// Column width, in characters.
        max: usize,
    },
    /// A latitude fell outside `-90.0..=90.0`.
    #[error("{entity} latitude {value} is outside -90..=90")]
    LatitudeOutOfRange {
        /// Record type owning the coordinate.
        entity: &'static str,
        /// Rejected latitude.
        value: f64,
    },
    /// A longitude fell outside `-180.0..=180.0`.
    #[error("{entity} longitude {value} is outside -180..=180")]
    LongitudeOutOfRange {
        /// Record type owning the coordinate.
        entity: &'static str,
        /// Rejected longitude.
        value: f64,
    },
}

/// Records that can check their own column constraints before a write.
pub trait Validate {
    /// Return the first constraint the record violates, if any.
    ///
    /// # Errors
    /// Returns [`FieldError`] describing the offending column.
    fn validate(&self) -> Result<(), FieldError>;
}

pub(crate) fn require_key(
    entity: &'static str,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Empty { entity, field });
    }
    limit_text(entity, field, value, max)
}

pub(crate) fn limit_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldError> {
    let length = value.chars().count();
    if length > max {
        return Err(FieldError::TooLong {
            entity,
            field,
            length,
            max,
        });
    }
    Ok(())
}

pub(crate) fn limit_optional_text(
    entity: &'static str,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), FieldError> {
    value.map_or(Ok(()), |text| limit_text(entity, field, text, max))
}

pub(crate) fn check_latitude(entity: &'static str, value: f64) -> Result<(), FieldError> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(FieldError::LatitudeOutOfRange { entity, value })
    }
}

pub(crate) fn check_longitude(entity: &'static str, value: f64) -> Result<(), FieldError> {
    if (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(FieldError::LongitudeOutOfRange { entity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", FieldError::Empty { entity: "risk_level", field: "id" })]
    #[case("   ", FieldError::Empty { entity: "risk_level", field: "id" })]
    #[case("HIG", FieldError::TooLong { entity: "risk_level", field: "id", length: 3, max: 2 })]
    fn require_key_rejects(#[case] value: &str, #[case] expected: FieldError) {
        assert_eq!(require_key("risk_level", "id", value, 2), Err(expected));
    }

    #[rstest]
    fn limits_count_characters_not_bytes() {
        // Five characters, ten bytes.
        assert!(limit_text("facility", "city", "ÉÉÉÉÉ", 5).is_ok());
    }

    #[rstest]
    #[case(-90.0, true)]
    #[case(90.0, true)]
    #[case(90.5, false)]
    #[case(f64::NAN, false)]
    fn latitude_bounds(#[case] value: f64, #[case] accepted: bool) {
        assert_eq!(check_latitude("facility", value).is_ok(), accepted);
    }

    #[rstest]
    #[case(-180.0, true)]
    #[case(180.0, true)]
    #[case(-180.25, false)]
    fn longitude_bounds(#[case] value: f64, #[case] accepted: bool) {
        assert_eq!(check_longitude("facility", value).is_ok(), accepted);
    }
}
