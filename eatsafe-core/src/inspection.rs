//! Inspections, the questions asked during each one and the comments
//! recorded against a question.

use chrono::{DateTime, NaiveDate, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::{FieldError, RECORD_KEY_MAX, TEXT_MAX, Validate, limit_text, require_key};
use crate::lookup::{ComplianceCategory, ComplianceDescription, ComplianceResult};

/// A single compliance check carried out at a facility.
///
/// Listings of a facility's inspections are ordered by
/// [`inspection_date`](Self::inspection_date), newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inspection {
    /// Opaque key assigned by the import process.
    pub id: String,
    /// Key of the inspected facility.
    pub facility_id: String,
    /// Day the inspection took place.
    pub inspection_date: NaiveDate,
    /// Whether the facility passed.
    pub in_compliance: bool,
    /// When the facility was closed as a result, if it was.
    pub closure_date: Option<DateTime<Utc>>,
    /// Inspector's report number.
    pub report_number: Option<i64>,
}

impl Inspection {
    /// Construct a compliant inspection with no closure or report number.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        facility_id: impl Into<String>,
        inspection_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            facility_id: facility_id.into(),
            inspection_date,
            in_compliance: true,
            closure_date: None,
            report_number: None,
        }
    }
}

impl Validate for Inspection {
    fn validate(&self) -> Result<(), FieldError> {
        const ENTITY: &str = "inspection";
        require_key(ENTITY, "id", &self.id, RECORD_KEY_MAX)?;
        require_key(ENTITY, "facility_id", &self.facility_id, RECORD_KEY_MAX)
    }
}

/// One criterion evaluated during an inspection.
///
/// The human-readable labels are not stored on the row; resolve them with
/// `SqliteFacilityStore::question_labels`, which reads them afresh on every
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Question {
    /// Auto-assigned key.
    pub id: i64,
    /// Key of the owning inspection.
    pub inspection_id: String,
    /// Position of the question within its inspection.
    pub sort: i64,
    /// Key of the [`ComplianceResult`].
    pub compliance_result_id: String,
    /// Key of the [`ComplianceCategory`].
    pub compliance_category_id: String,
    /// Key of the [`ComplianceDescription`].
    pub compliance_description_id: String,
}

/// A question that has not been assigned a key yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewQuestion {
    /// Key of the owning inspection.
    pub inspection_id: String,
    /// Position of the question within its inspection.
    pub sort: i64,
    /// Key of the [`ComplianceResult`].
    pub compliance_result_id: String,
    /// Key of the [`ComplianceCategory`].
    pub compliance_category_id: String,
    /// Key of the [`ComplianceDescription`].
    pub compliance_description_id: String,
}

impl NewQuestion {
    /// Attach the key assigned by the store.
    #[must_use]
    pub fn into_question(self, id: i64) -> Question {
        Question {
            id,
            inspection_id: self.inspection_id,
            sort: self.sort,
            compliance_result_id: self.compliance_result_id,
            compliance_category_id: self.compliance_category_id,
            compliance_description_id: self.compliance_description_id,
        }
    }
}

fn validate_question_keys(
    inspection_id: &str,
    result_id: &str,
    category_id: &str,
    description_id: &str,
) -> Result<(), FieldError> {
    const ENTITY: &str = "question";
    require_key(ENTITY, "inspection_id", inspection_id, RECORD_KEY_MAX)?;
    require_key(
        ENTITY,
        "compliance_result_id",
        result_id,
        ComplianceResult::KEY_MAX,
    )?;
    require_key(
        ENTITY,
        "compliance_category_id",
        category_id,
        ComplianceCategory::KEY_MAX,
    )?;
    require_key(
        ENTITY,
        "compliance_description_id",
        description_id,
        ComplianceDescription::KEY_MAX,
    )
}

impl Validate for Question {
    fn validate(&self) -> Result<(), FieldError> {
        validate_question_keys(
            &self.inspection_id,
            &self.compliance_result_id,
            &self.compliance_category_id,
            &self.compliance_description_id,
        )
    }
}

impl Validate for NewQuestion {
    fn validate(&self) -> Result<(), FieldError> {
        validate_question_keys(
            &self.inspection_id,
            &self.compliance_result_id,
            &self.compliance_category_id,
            &self.compliance_description_id,
        )
    }
}

/// Labels derived from a question's lookup references.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuestionLabels {
    /// Label of the question's [`ComplianceCategory`].
    pub category: String,
    /// Label of the question's [`ComplianceDescription`].
    pub description: String,
    /// Label of the question's [`ComplianceResult`].
    pub result: String,
    /// Label of the risk level reached through the description.
    pub risk_level: String,
}

/// Free-text remark recorded against a question.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comment {
    /// Auto-assigned key.
    pub id: i64,
    /// Key of the question the remark belongs to.
    pub question_id: i64,
    /// English text.
    pub text_en: String,
}

/// A comment that has not been assigned a key yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewComment {
    /// Key of the question the remark belongs to.
    pub question_id: i64,
    /// English text.
    pub text_en: String,
}

impl NewComment {
    /// Attach the key assigned by the store.
    #[must_use]
    pub fn into_comment(self, id: i64) -> Comment {
        Comment {
            id,
            question_id: self.question_id,
            text_en: self.text_en,
        }
    }
}

impl Validate for Comment {
    fn validate(&self) -> Result<(), FieldError> {
        limit_text("comment", "text_en", &self.text_en, TEXT_MAX)
    }
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), FieldError> {
        limit_text("comment", "text_en", &self.text_en, TEXT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn new_question() -> NewQuestion {
        NewQuestion {
            inspection_id: "I-1".into(),
            sort: 1,
            compliance_result_id: "Y".into(),
            compliance_category_id: "FH".into(),
            compliance_description_id: "HYG-01".into(),
        }
    }

    #[rstest]
    fn new_question_keeps_columns_when_keyed() {
        let question = new_question().into_question(9);
        assert_eq!(question.id, 9);
        assert_eq!(question.compliance_description_id, "HYG-01");
        assert!(question.validate().is_ok());
    }

    #[rstest]
    fn question_rejects_oversized_category_key() {
        let mut question = new_question();
        question.compliance_category_id = "FOOD1".into();
        assert!(matches!(
            question.validate(),
            Err(FieldError::TooLong { field: "compliance_category_id", .. })
        ));
    }

    #[rstest]
    fn inspection_requires_facility() {
        let date = NaiveDate::from_ymd_opt(2010, 5, 1).expect("valid date");
        let inspection = Inspection::new("I-1", "", date);
        assert!(matches!(
            inspection.validate(),
            Err(FieldError::Empty { field: "facility_id", .. })
        ));
    }
}
