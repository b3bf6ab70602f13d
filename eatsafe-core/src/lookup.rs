//! Lookup tables mapping short fixed codes to English labels.
//!
//! Each table is a closed enumeration maintained by the import process. Keys
//! are never rewritten once issued; only the label text may change.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::{FieldError, TEXT_MAX, Validate, limit_text, require_key};

macro_rules! lookup_table {
    ($(#[$meta:meta])* $name:ident, $entity:literal, $key_max:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name {
            /// Fixed code identifying the entry.
            pub id: String,
            /// English label.
            pub text_en: String,
        }

        impl $name {
            /// Longest key the table accepts.
            pub const KEY_MAX: usize = $key_max;

            /// Construct an entry from its code and label.
            #[must_use]
            pub fn new(id: impl Into<String>, text_en: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    text_en: text_en.into(),
                }
            }
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), FieldError> {
                require_key($entity, "id", &self.id, Self::KEY_MAX)?;
                limit_text($entity, "text_en", &self.text_en, TEXT_MAX)
            }
        }
    };
}

lookup_table!(
    /// Outcome of a question, e.g. "in compliance" or "not applicable".
    ComplianceResult,
    "compliance_result",
    3
);

lookup_table!(
    /// Grouping of related questions, e.g. "food handling".
    ComplianceCategory,
    "compliance_category",
    4
);

lookup_table!(
    /// Severity attached to a compliance description.
    RiskLevel,
    "risk_level",
    2
);

lookup_table!(
    /// Kind of establishment, e.g. "restaurant" or "caterer".
    FacilityCategory,
    "facility_category",
    5
);

/// The criterion a question evaluates, tied to the risk it carries.
///
/// # Examples
/// ```
/// use eatsafe_core::{ComplianceDescription, Validate};
///
/// let description = ComplianceDescription::new("HYG-01", "Hands washed", "H");
/// assert!(description.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComplianceDescription {
    /// Fixed code identifying the criterion.
    pub id: String,
    /// English label.
    pub text_en: String,
    /// Key of the [`RiskLevel`] the criterion carries.
    pub risk_level_id: String,
}

impl ComplianceDescription {
    /// Longest key the table accepts.
    pub const KEY_MAX: usize = 10;

    /// Construct a description from its code, label and risk level.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text_en: impl Into<String>,
        risk_level_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text_en: text_en.into(),
            risk_level_id: risk_level_id.into(),
        }
    }
}

impl Validate for ComplianceDescription {
    fn validate(&self) -> Result<(), FieldError> {
        const ENTITY: &str = "compliance_description";
        require_key(ENTITY, "id", &self.id, Self::KEY_MAX)?;
        limit_text(ENTITY, "text_en", &self.text_en, TEXT_MAX)?;
        require_key(ENTITY, "risk_level_id", &self.risk_level_id, RiskLevel::KEY_MAX)
    }
}
