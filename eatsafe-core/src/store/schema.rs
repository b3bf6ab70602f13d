use log::debug;
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Version recorded in `eatsafe_schema_version` by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Create the facility directory schema inside an SQLite database.
///
/// Enables foreign keys, creates every table and index that does not exist
/// yet, and records the schema version. Running it against an initialised
/// database is a no-op; a database stamped with a different version is
/// rejected.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use eatsafe_core::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
/// initialise_schema(&mut conn).expect("schema creation is repeatable");
///
/// let tables: i64 = conn
///     .query_row(
///         "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'facilities'",
///         [],
///         |row| row.get(0),
///     )
///     .expect("count tables");
/// assert_eq!(tables, 1);
/// ```
///
/// # Errors
/// Returns [`SchemaError`] when a statement fails or the stored version
/// differs from [`SCHEMA_VERSION`].
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_lookup_tables(&transaction)?;
    create_facility_tables(&transaction)?;
    create_inspection_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    debug!("facility schema at version {SCHEMA_VERSION}");
    Ok(())
}

fn create_lookup_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create risk_levels",
        "CREATE TABLE IF NOT EXISTS risk_levels (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 2),
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255)
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create compliance_results",
        "CREATE TABLE IF NOT EXISTS compliance_results (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 3),
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255)
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create compliance_categories",
        "CREATE TABLE IF NOT EXISTS compliance_categories (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 4),
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255)
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create compliance_descriptions",
        "CREATE TABLE IF NOT EXISTS compliance_descriptions (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 10),
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255),
            risk_level_id TEXT NOT NULL,
            FOREIGN KEY (risk_level_id) REFERENCES risk_levels(id)
        ) WITHOUT ROWID",
    )?;
    run_migration_step(
        transaction,
        "create facility_categories",
        "CREATE TABLE IF NOT EXISTS facility_categories (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 5),
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255)
        ) WITHOUT ROWID",
    )
}

fn create_facility_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create facilities",
        "CREATE TABLE IF NOT EXISTS facilities (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 40),
            name TEXT NOT NULL CHECK (length(name) <= 255),
            street_number TEXT CHECK (street_number IS NULL OR length(street_number) <= 50),
            street_name TEXT CHECK (street_name IS NULL OR length(street_name) <= 255),
            postal_code TEXT CHECK (postal_code IS NULL OR length(postal_code) <= 10),
            phone TEXT CHECK (phone IS NULL OR length(phone) <= 20),
            area_en TEXT CHECK (area_en IS NULL OR length(area_en) <= 25),
            city TEXT CHECK (city IS NULL OR length(city) <= 35),
            lat REAL CHECK (lat IS NULL OR lat BETWEEN -90 AND 90),
            lon REAL CHECK (lon IS NULL OR lon BETWEEN -180 AND 180),
            facility_category_id TEXT,
            created_at TEXT,
            updated_at TEXT,
            FOREIGN KEY (facility_category_id) REFERENCES facility_categories(id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create facility_coordinates",
        "CREATE TABLE IF NOT EXISTS facility_coordinates (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 40),
            lat REAL NOT NULL CHECK (lat BETWEEN -90 AND 90),
            lon REAL NOT NULL CHECK (lon BETWEEN -180 AND 180),
            created_at TEXT
        )",
    )
}

fn create_inspection_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create inspections",
        "CREATE TABLE IF NOT EXISTS inspections (
            id TEXT PRIMARY KEY CHECK (length(trim(id)) > 0 AND length(id) <= 40),
            facility_id TEXT NOT NULL,
            inspection_date TEXT NOT NULL,
            in_compliance INTEGER NOT NULL CHECK (in_compliance IN (0, 1)),
            closure_date TEXT,
            report_number INTEGER,
            FOREIGN KEY (facility_id) REFERENCES facilities(id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create questions",
        "CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            inspection_id TEXT NOT NULL,
            sort INTEGER NOT NULL,
            compliance_result_id TEXT NOT NULL,
            compliance_category_id TEXT NOT NULL,
            compliance_description_id TEXT NOT NULL,
            FOREIGN KEY (inspection_id) REFERENCES inspections(id),
            FOREIGN KEY (compliance_result_id) REFERENCES compliance_results(id),
            FOREIGN KEY (compliance_category_id) REFERENCES compliance_categories(id),
            FOREIGN KEY (compliance_description_id) REFERENCES compliance_descriptions(id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create comments",
        "CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL,
            text_en TEXT NOT NULL CHECK (length(text_en) <= 255),
            FOREIGN KEY (question_id) REFERENCES questions(id)
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index facilities by category",
        "CREATE INDEX IF NOT EXISTS idx_facilities_category
            ON facilities(facility_category_id)",
    )?;
    run_migration_step(
        transaction,
        "index inspections by facility",
        "CREATE INDEX IF NOT EXISTS idx_inspections_facility_date
            ON inspections(facility_id, inspection_date DESC)",
    )?;
    run_migration_step(
        transaction,
        "index questions by inspection",
        "CREATE INDEX IF NOT EXISTS idx_questions_inspection_sort
            ON questions(inspection_id, sort)",
    )?;
    run_migration_step(
        transaction,
        "index questions by result",
        "CREATE INDEX IF NOT EXISTS idx_questions_result ON questions(compliance_result_id)",
    )?;
    run_migration_step(
        transaction,
        "index questions by category",
        "CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(compliance_category_id)",
    )?;
    run_migration_step(
        transaction,
        "index questions by description",
        "CREATE INDEX IF NOT EXISTS idx_questions_description
            ON questions(compliance_description_id)",
    )?;
    run_migration_step(
        transaction,
        "index comments by question",
        "CREATE INDEX IF NOT EXISTS idx_comments_question ON comments(question_id)",
    )?;
    run_migration_step(
        transaction,
        "index compliance_descriptions by risk level",
        "CREATE INDEX IF NOT EXISTS idx_compliance_descriptions_risk
            ON compliance_descriptions(risk_level_id)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS eatsafe_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM eatsafe_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO eatsafe_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the facility schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Foreign-key enforcement could not be switched on.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A DDL statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Step being executed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected facility schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build writes.
        expected: i64,
        /// Version found in the database.
        found: i64,
    },
}
