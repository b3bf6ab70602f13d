//! SQLite connection management and the directory queries.

use std::fmt;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use geo::Coord;
use log::{debug, warn};
use rusqlite::{Connection, functions::FunctionFlags, params};

use crate::{
    DatabaseLocation, Facility, FacilityDirectory, NearbyFacility, NearbyQuery, SEARCH_LIMIT,
    SearchTerm, great_circle_km, name_contains, round_distance,
};

use super::error::{StoreError, sqlite_failure};
use super::record::Record;
use super::schema::initialise_schema;

/// Facility directory persisted in SQLite.
///
/// Opening a store switches on foreign keys, registers the
/// `great_circle_km` and `name_contains` SQL functions, and creates the
/// schema when it is missing. A store wraps a single connection and is not
/// shared between threads; open one per thread instead.
///
/// # Examples
/// ```
/// use eatsafe_core::{Facility, FacilityDirectory, NearbyQuery, SqliteFacilityStore};
///
/// let store = SqliteFacilityStore::open_in_memory()?;
/// store.insert(Facility::new("F-1", "Pizza Hut").with_location(0.0, 0.0))?;
///
/// let found = store.nearby(&NearbyQuery::at(0.0, 0.0))?;
/// assert_eq!(found[0].facility.id, "F-1");
/// assert_eq!(found[0].distance, 0.0);
/// # Ok::<(), eatsafe_core::StoreError>(())
/// ```
pub struct SqliteFacilityStore {
    pub(super) connection: Connection,
    location: DatabaseLocation,
}

impl fmt::Debug for SqliteFacilityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteFacilityStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteFacilityStore {
    /// Open the database at `location`, creating file and schema as needed.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the parent directory cannot be created,
    /// SQLite cannot open the database, or the schema cannot be initialised.
    pub fn open(location: &DatabaseLocation) -> Result<Self, StoreError> {
        let connection = match location {
            DatabaseLocation::File(path) => {
                ensure_parent_dir(path)?;
                Connection::open(path.as_std_path())
            }
            DatabaseLocation::Memory => Connection::open_in_memory(),
        }
        .map_err(|source| StoreError::Open {
            location: location.to_string(),
            source,
        })?;

        Self::from_connection(connection, location.clone())
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the schema cannot be initialised.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(&DatabaseLocation::Memory)
    }

    fn from_connection(
        mut connection: Connection,
        location: DatabaseLocation,
    ) -> Result<Self, StoreError> {
        register_functions(&connection)?;
        initialise_schema(&mut connection)?;
        debug!("opened facility store at {location}");
        Ok(Self {
            connection,
            location,
        })
    }

    /// Where this store's data lives.
    #[must_use]
    pub const fn location(&self) -> &DatabaseLocation {
        &self.location
    }
}

fn register_functions(connection: &Connection) -> Result<(), StoreError> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    connection
        .create_scalar_function("great_circle_km", 4, flags, |ctx| {
            // SQLite binds NaN as NULL, in both directions.
            let degrees = |index: usize| {
                ctx.get::<Option<f64>>(index)
                    .map(|value| value.unwrap_or(f64::NAN))
            };
            let from = Coord {
                x: degrees(1)?,
                y: degrees(0)?,
            };
            let to = Coord {
                x: degrees(3)?,
                y: degrees(2)?,
            };
            let distance = great_circle_km(from, to);
            Ok((!distance.is_nan()).then_some(distance))
        })
        .map_err(|source| StoreError::Configure {
            step: "register great_circle_km",
            source,
        })?;
    connection
        .create_scalar_function("name_contains", 2, flags, |ctx| {
            let name = ctx.get::<String>(0)?;
            let needle = ctx.get::<String>(1)?;
            Ok(name_contains(&name, &needle))
        })
        .map_err(|source| StoreError::Configure {
            step: "register name_contains",
            source,
        })
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    fs_utf8::Dir::open_ambient_dir(base, ambient_authority())
        .and_then(|base_dir| base_dir.create_dir_all(relative))
        .map_err(|source| StoreError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })
}

fn facility_columns() -> String {
    Facility::COLUMNS.join(", ")
}

impl FacilityDirectory for SqliteFacilityStore {
    type Error = StoreError;

    fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyFacility>, StoreError> {
        debug!(
            "nearby ({}, {}) filter {:?} limit {}",
            query.origin.y, query.origin.x, query.filter, query.limit
        );
        let limit = i64::try_from(query.limit).unwrap_or_else(|_| {
            warn!("nearby limit {} exceeds SQLite range; clamping", query.limit);
            i64::MAX
        });
        let sql = format!(
            "SELECT {columns}, great_circle_km(lat, lon, ?1, ?2) AS distance
             FROM facilities
             WHERE lat IS NOT NULL AND lon IS NOT NULL AND name_contains(name, ?3)
             ORDER BY distance IS NULL, distance ASC, id ASC
             LIMIT ?4",
            columns = facility_columns(),
        );
        let mut statement = self
            .connection
            .prepare_cached(&sql)
            .map_err(sqlite_failure("prepare nearby query"))?;
        let rows = statement
            .query_map(
                params![query.origin.y, query.origin.x, query.filter, limit],
                |row| {
                    Ok(NearbyFacility {
                        facility: Facility::from_row(row)?,
                        distance: row
                            .get::<_, Option<f64>>("distance")?
                            .map_or(f64::NAN, round_distance),
                    })
                },
            )
            .map_err(sqlite_failure("run nearby query"))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_failure("read nearby facilities"))
    }

    fn search(&self, term: &SearchTerm) -> Result<Vec<Facility>, StoreError> {
        debug!("search {:?}", term.as_str());
        let sql = format!(
            "SELECT {columns} FROM facilities
             WHERE name_contains(name, ?1)
             ORDER BY id ASC
             LIMIT {SEARCH_LIMIT}",
            columns = facility_columns(),
        );
        let mut statement = self
            .connection
            .prepare_cached(&sql)
            .map_err(sqlite_failure("prepare search query"))?;
        let rows = statement
            .query_map([term.as_str()], Facility::from_row)
            .map_err(sqlite_failure("run search query"))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_failure("read matching facilities"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn opening_a_nested_path_creates_directories() {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        let path = root.join("nested/deeper/eatsafe.db");

        let store = SqliteFacilityStore::open(&DatabaseLocation::File(path.clone()))
            .expect("open store");
        assert!(path.exists());
        assert_eq!(store.location(), &DatabaseLocation::File(path));
    }

    #[rstest]
    fn sql_functions_match_their_rust_counterparts() {
        let store = SqliteFacilityStore::open_in_memory().expect("open store");
        let (distance, matched): (f64, bool) = store
            .connection
            .query_row(
                "SELECT great_circle_km(0.0, 0.0, 0.0, 1.0), name_contains('Pizza Hut', 'PIZZA')",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .expect("call SQL functions");
        assert_eq!(round_distance(distance), 111.1949);
        assert!(matched);
    }

    #[rstest]
    fn null_coordinates_yield_null_distances() {
        let store = SqliteFacilityStore::open_in_memory().expect("open store");
        let distance: Option<f64> = store
            .connection
            .query_row(
                "SELECT great_circle_km(NULL, 0.0, 1.0, 1.0)",
                [],
                |row| row.get(0),
            )
            .expect("call great_circle_km");
        assert_eq!(distance, None);
    }
}
