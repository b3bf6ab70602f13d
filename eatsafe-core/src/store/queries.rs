//! Relationship traversal: default-ordered listings, derived labels and
//! facility reports.
//!
//! Labels are joined on every call. Nothing here caches, so a label edited
//! in its lookup table shows up on the next read.

use rusqlite::OptionalExtension;

use crate::{
    Comment, Facility, FacilityReport, Inspection, InspectionReport, Question, QuestionLabels,
    QuestionReport,
};

use super::error::{StoreError, sqlite_failure};
use super::sqlite::SqliteFacilityStore;

impl SqliteFacilityStore {
    /// Inspections of a facility, newest first.
    ///
    /// # Errors
    /// Returns [`StoreError::Query`] when SQLite fails.
    pub fn inspections_for(&self, facility_id: &str) -> Result<Vec<Inspection>, StoreError> {
        self.find_by("facility_id", &facility_id)
    }

    /// Questions of an inspection in ascending `sort` order.
    ///
    /// # Errors
    /// Returns [`StoreError::Query`] when SQLite fails.
    pub fn questions_for(&self, inspection_id: &str) -> Result<Vec<Question>, StoreError> {
        self.find_by("inspection_id", &inspection_id)
    }

    /// Comments on a question in insertion order.
    ///
    /// # Errors
    /// Returns [`StoreError::Query`] when SQLite fails.
    pub fn comments_for(&self, question_id: i64) -> Result<Vec<Comment>, StoreError> {
        self.find_by("question_id", &question_id)
    }

    /// Label of a facility's category, or `None` when it has none.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when the facility does not exist.
    pub fn facility_category(&self, facility_id: &str) -> Result<Option<String>, StoreError> {
        self.connection
            .prepare_cached(
                "SELECT category.text_en
                 FROM facilities AS facility
                 LEFT JOIN facility_categories AS category
                    ON category.id = facility.facility_category_id
                 WHERE facility.id = ?1",
            )
            .and_then(|mut statement| {
                statement
                    .query_row([facility_id], |row| row.get::<_, Option<String>>(0))
                    .optional()
            })
            .map_err(sqlite_failure("read facility category"))?
            .ok_or_else(|| StoreError::NotFound {
                table: "facilities",
                key: facility_id.to_owned(),
            })
    }

    /// Category, description, result and risk-level labels of a question.
    ///
    /// The risk level is reached through the question's compliance
    /// description.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when the question does not exist.
    pub fn question_labels(&self, question_id: i64) -> Result<QuestionLabels, StoreError> {
        self.connection
            .prepare_cached(
                "SELECT category.text_en, description.text_en, result.text_en, risk.text_en
                 FROM questions AS question
                 JOIN compliance_categories AS category
                    ON category.id = question.compliance_category_id
                 JOIN compliance_descriptions AS description
                    ON description.id = question.compliance_description_id
                 JOIN compliance_results AS result
                    ON result.id = question.compliance_result_id
                 JOIN risk_levels AS risk
                    ON risk.id = description.risk_level_id
                 WHERE question.id = ?1",
            )
            .and_then(|mut statement| {
                statement
                    .query_row([question_id], |row| {
                        Ok(QuestionLabels {
                            category: row.get(0)?,
                            description: row.get(1)?,
                            result: row.get(2)?,
                            risk_level: row.get(3)?,
                        })
                    })
                    .optional()
            })
            .map_err(sqlite_failure("read question labels"))?
            .ok_or_else(|| StoreError::NotFound {
                table: "questions",
                key: question_id.to_string(),
            })
    }

    /// A facility with its inspections, questions, labels and comments.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when the facility does not exist.
    pub fn facility_report(&self, facility_id: &str) -> Result<FacilityReport, StoreError> {
        let facility = self
            .find::<Facility>(facility_id)?
            .ok_or_else(|| StoreError::NotFound {
                table: "facilities",
                key: facility_id.to_owned(),
            })?;
        let category = self.facility_category(facility_id)?;
        let inspections = self
            .inspections_for(facility_id)?
            .into_iter()
            .map(|inspection| self.inspection_report(inspection))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FacilityReport {
            facility,
            category,
            inspections,
        })
    }

    fn inspection_report(&self, inspection: Inspection) -> Result<InspectionReport, StoreError> {
        let questions = self
            .questions_for(&inspection.id)?
            .into_iter()
            .map(|question| {
                Ok(QuestionReport {
                    labels: self.question_labels(question.id)?,
                    comments: self.comments_for(question.id)?,
                    question,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(InspectionReport {
            inspection,
            questions,
        })
    }
}
