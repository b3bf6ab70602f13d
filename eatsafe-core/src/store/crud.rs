//! Generic row access driven by [`Record`] metadata.

use chrono::Utc;
use log::debug;
use rusqlite::{OptionalExtension, ToSql, params};

use crate::{Comment, NewComment, NewQuestion, Question, Validate};

use super::error::{StoreError, sqlite_failure};
use super::record::Record;
use super::sqlite::SqliteFacilityStore;

fn select_clause<R: Record>() -> String {
    format!("SELECT {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
}

impl SqliteFacilityStore {
    /// Fetch the row with primary key `key`.
    ///
    /// # Errors
    /// Returns [`StoreError::Query`] when SQLite fails.
    pub fn find<R: Record>(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let sql = format!("{} WHERE id = ?1", select_clause::<R>());
        self.connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.query_row([key], R::from_row).optional())
            .map_err(sqlite_failure("find row by key"))
    }

    /// Fetch every row in the entity's default order.
    ///
    /// # Errors
    /// Returns [`StoreError::Query`] when SQLite fails.
    pub fn all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("{} ORDER BY {}", select_clause::<R>(), R::ORDER_BY);
        self.collect_rows(&sql, params![], "list rows")
    }

    /// Fetch rows whose `column` equals `value`, in the entity's default
    /// order.
    ///
    /// # Errors
    /// Returns [`StoreError::UnknownColumn`] when `column` is not one of
    /// [`Record::COLUMNS`], or [`StoreError::Query`] when SQLite fails.
    pub fn find_by<R: Record>(
        &self,
        column: &str,
        value: &dyn ToSql,
    ) -> Result<Vec<R>, StoreError> {
        let Some(known_column) = R::COLUMNS.iter().find(|known| **known == column) else {
            return Err(StoreError::UnknownColumn {
                table: R::TABLE,
                column: column.to_owned(),
            });
        };
        let sql = format!(
            "{} WHERE {known_column} = ?1 ORDER BY {}",
            select_clause::<R>(),
            R::ORDER_BY
        );
        self.collect_rows(&sql, [value], "filter rows")
    }

    /// Validate, timestamp and insert `record`, returning the stored row.
    ///
    /// # Errors
    /// Returns [`StoreError::Invalid`] when validation fails and
    /// [`StoreError::Constraint`] when the key is taken or a foreign key
    /// dangles.
    pub fn insert<R: Record>(&self, mut record: R) -> Result<R, StoreError> {
        record.validate()?;
        record.stamp_created(Utc::now());
        let placeholders = (1..=R::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            R::TABLE,
            R::COLUMNS.join(", ")
        );
        self.connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.execute(record.values().as_slice()))
            .map_err(sqlite_failure("insert row"))?;
        debug!("inserted {} row {}", R::TABLE, record.key());
        Ok(record)
    }

    /// Validate and overwrite the stored row sharing `record`'s key.
    ///
    /// `updated_at` columns are touched on every call.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when no row has the key, plus the
    /// errors of [`insert`](Self::insert).
    pub fn update<R: Record>(&self, mut record: R) -> Result<R, StoreError> {
        record.validate()?;
        record.stamp_updated(Utc::now());
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {assignments} WHERE id = ?1", R::TABLE);
        let changed = self
            .connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.execute(record.values().as_slice()))
            .map_err(sqlite_failure("update row"))?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                table: R::TABLE,
                key: record.key().to_string(),
            });
        }
        debug!("updated {} row {}", R::TABLE, record.key());
        Ok(record)
    }

    /// Delete the row with primary key `key`, reporting whether it existed.
    ///
    /// Deletes never cascade: removing a row that others still reference
    /// fails with [`StoreError::Constraint`].
    ///
    /// # Errors
    /// Returns [`StoreError::Constraint`] or [`StoreError::Query`] on
    /// SQLite failure.
    pub fn delete<R: Record>(&self, key: &R::Key) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let changed = self
            .connection
            .prepare_cached(&sql)
            .and_then(|mut statement| statement.execute([key]))
            .map_err(sqlite_failure("delete row"))?;
        debug!("deleted {changed} {} row(s) with key {key}", R::TABLE);
        Ok(changed > 0)
    }

    /// Insert a question and return it with its assigned key.
    ///
    /// # Errors
    /// Returns [`StoreError::Invalid`] when validation fails and
    /// [`StoreError::Constraint`] when a referenced row is missing.
    pub fn add_question(&self, question: NewQuestion) -> Result<Question, StoreError> {
        question.validate()?;
        self.connection
            .prepare_cached(
                "INSERT INTO questions (
                    inspection_id, sort, compliance_result_id,
                    compliance_category_id, compliance_description_id
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .and_then(|mut statement| {
                statement.execute(params![
                    question.inspection_id,
                    question.sort,
                    question.compliance_result_id,
                    question.compliance_category_id,
                    question.compliance_description_id,
                ])
            })
            .map_err(sqlite_failure("insert question"))?;
        let id = self.connection.last_insert_rowid();
        debug!("inserted question {id} for inspection {}", question.inspection_id);
        Ok(question.into_question(id))
    }

    /// Insert a comment and return it with its assigned key.
    ///
    /// # Errors
    /// Returns [`StoreError::Invalid`] when validation fails and
    /// [`StoreError::Constraint`] when the question is missing.
    pub fn add_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        comment.validate()?;
        self.connection
            .prepare_cached("INSERT INTO comments (question_id, text_en) VALUES (?1, ?2)")
            .and_then(|mut statement| {
                statement.execute(params![comment.question_id, comment.text_en])
            })
            .map_err(sqlite_failure("insert comment"))?;
        let id = self.connection.last_insert_rowid();
        debug!("inserted comment {id} for question {}", comment.question_id);
        Ok(comment.into_comment(id))
    }

    pub(super) fn collect_rows<R: Record, P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
        operation: &'static str,
    ) -> Result<Vec<R>, StoreError> {
        let mut statement = self
            .connection
            .prepare_cached(sql)
            .map_err(sqlite_failure(operation))?;
        let rows = statement
            .query_map(params, R::from_row)
            .map_err(sqlite_failure(operation))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_failure(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Facility, FacilityCategory, FacilityCoordinate, FieldError, RiskLevel};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> SqliteFacilityStore {
        SqliteFacilityStore::open_in_memory().expect("open store")
    }

    #[rstest]
    fn insert_then_find_returns_the_stamped_row(store: SqliteFacilityStore) {
        let stored = store
            .insert(Facility::new("F-1", "Pizza Hut").with_location(45.0, -75.0))
            .expect("insert facility");
        assert!(stored.created_at.is_some());
        assert_eq!(stored.created_at, stored.updated_at);

        let found = store.find::<Facility>("F-1").expect("find facility");
        assert_eq!(found, Some(stored));
    }

    #[rstest]
    fn update_touches_only_updated_at(store: SqliteFacilityStore) {
        let stored = store
            .insert(Facility::new("F-1", "Pizza Hut"))
            .expect("insert facility");
        let mut renamed = stored.clone();
        renamed.name = "Pizza Hut Express".into();

        let updated = store.update(renamed).expect("update facility");
        assert_eq!(updated.created_at, stored.created_at);
        assert!(updated.updated_at >= stored.updated_at);
        let found = store.find::<Facility>("F-1").expect("find facility");
        assert_eq!(found.map(|facility| facility.name), Some("Pizza Hut Express".into()));
    }

    #[rstest]
    fn updating_a_missing_row_is_not_found(store: SqliteFacilityStore) {
        let err = store
            .update(RiskLevel::new("H", "High"))
            .expect_err("missing row");
        assert!(matches!(err, StoreError::NotFound { table: "risk_levels", .. }));
    }

    #[rstest]
    fn coordinate_rows_are_stamped_once(store: SqliteFacilityStore) {
        let stored = store
            .insert(FacilityCoordinate::new("F-1", 45.0, -75.0))
            .expect("insert coordinate");
        assert!(stored.created_at.is_some());
    }

    #[rstest]
    fn invalid_records_never_reach_sqlite(store: SqliteFacilityStore) {
        let err = store
            .insert(FacilityCategory::new("TOOLONG", "Restaurant"))
            .expect_err("key too long");
        assert!(matches!(err, StoreError::Invalid(FieldError::TooLong { .. })));
        assert!(store.all::<FacilityCategory>().expect("list").is_empty());
    }

    #[rstest]
    fn dangling_foreign_keys_are_constraint_errors(store: SqliteFacilityStore) {
        let err = store
            .insert(Facility::new("F-1", "Pizza Hut").with_category("NOPE"))
            .expect_err("dangling category");
        assert!(matches!(err, StoreError::Constraint { .. }));
    }

    #[rstest]
    fn find_by_rejects_unknown_columns(store: SqliteFacilityStore) {
        let err = store
            .find_by::<Facility>("name; DROP TABLE facilities", &"x")
            .expect_err("unknown column");
        assert!(matches!(err, StoreError::UnknownColumn { table: "facilities", .. }));
    }

    #[rstest]
    fn delete_reports_whether_a_row_existed(store: SqliteFacilityStore) {
        store
            .insert(RiskLevel::new("H", "High"))
            .expect("insert risk level");
        assert!(store.delete::<RiskLevel>("H").expect("delete"));
        assert!(!store.delete::<RiskLevel>("H").expect("delete again"));
    }
}
