//! Resolved inspection history of a single facility.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Comment, Facility, Inspection, Question, QuestionLabels};

/// A facility with its full inspection history resolved.
///
/// Inspections appear newest first and questions in their `sort` order.
/// Every label is read at assembly time; the report is a snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacilityReport {
    /// The facility row.
    pub facility: Facility,
    /// Label of the facility's category, if it has one.
    pub category: Option<String>,
    /// Inspections with their questions.
    pub inspections: Vec<InspectionReport>,
}

/// An inspection with its questions resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InspectionReport {
    /// The inspection row.
    pub inspection: Inspection,
    /// Questions in `sort` order.
    pub questions: Vec<QuestionReport>,
}

/// A question with its derived labels and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuestionReport {
    /// The question row.
    pub question: Question,
    /// Labels resolved through the question's lookup keys.
    pub labels: QuestionLabels,
    /// Comments in insertion order.
    pub comments: Vec<Comment>,
}

impl FacilityReport {
    /// Number of inspections the facility failed.
    #[must_use]
    pub fn failed_inspections(&self) -> usize {
        self.inspections
            .iter()
            .filter(|report| !report.inspection.in_compliance)
            .count()
    }
}
