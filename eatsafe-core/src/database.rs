//! Connection strings for the facility database.

use std::{fmt, str::FromStr};

use camino::Utf8PathBuf;
use thiserror::Error;

/// Environment variable consulted when no connection string is configured.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Connection string used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://eatsafe.db";

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_URL: &str = "sqlite::memory:";

/// Where the facility database lives.
///
/// # Examples
/// ```
/// use eatsafe_core::DatabaseLocation;
///
/// let location = "sqlite://data/eatsafe.db".parse::<DatabaseLocation>()?;
/// assert_eq!(location, DatabaseLocation::File("data/eatsafe.db".into()));
/// assert_eq!("sqlite::memory:".parse::<DatabaseLocation>(), Ok(DatabaseLocation::Memory));
/// # Ok::<(), eatsafe_core::DatabaseUrlError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database file on disk.
    File(Utf8PathBuf),
    /// A private in-memory database that disappears with its connection.
    Memory,
}

/// Errors raised when parsing a connection string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseUrlError {
    /// The connection string was blank.
    #[error("database URL must not be empty")]
    Empty,
    /// The connection string named a backend other than SQLite.
    #[error("unsupported database scheme `{scheme}`; expected sqlite:// or a file path")]
    UnsupportedScheme {
        /// Scheme found before `://`.
        scheme: String,
    },
}

impl DatabaseLocation {
    /// Pick the connection string from the first configured source.
    ///
    /// `explicit` comes from flags or configuration files, `environment`
    /// from [`DATABASE_URL_ENV`]; [`DEFAULT_DATABASE_URL`] applies when
    /// neither is set.
    ///
    /// # Errors
    /// Returns [`DatabaseUrlError`] when the chosen string cannot be parsed.
    pub fn resolve(
        explicit: Option<&str>,
        environment: Option<&str>,
    ) -> Result<Self, DatabaseUrlError> {
        explicit
            .or(environment)
            .unwrap_or(DEFAULT_DATABASE_URL)
            .parse()
    }
}

impl FromStr for DatabaseLocation {
    type Err = DatabaseUrlError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DatabaseUrlError::Empty);
        }
        if url == MEMORY_URL || url == ":memory:" {
            return Ok(Self::Memory);
        }
        if let Some(path) = url.strip_prefix(SQLITE_SCHEME) {
            if path.is_empty() {
                return Err(DatabaseUrlError::Empty);
            }
            return Ok(Self::File(Utf8PathBuf::from(path)));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(DatabaseUrlError::UnsupportedScheme {
                scheme: scheme.to_owned(),
            });
        }
        Ok(Self::File(Utf8PathBuf::from(url)))
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{SQLITE_SCHEME}{path}"),
            Self::Memory => f.write_str(MEMORY_URL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sqlite://eatsafe.db", DatabaseLocation::File("eatsafe.db".into()))]
    #[case("sqlite:///var/lib/eatsafe.db", DatabaseLocation::File("/var/lib/eatsafe.db".into()))]
    #[case("./eatsafe.db", DatabaseLocation::File("./eatsafe.db".into()))]
    #[case(":memory:", DatabaseLocation::Memory)]
    #[case(" sqlite::memory: ", DatabaseLocation::Memory)]
    fn parses_supported_urls(#[case] url: &str, #[case] expected: DatabaseLocation) {
        assert_eq!(url.parse::<DatabaseLocation>(), Ok(expected));
    }

    #[rstest]
    fn rejects_other_backends() {
        let outcome: Result<DatabaseLocation, _> = "postgres://localhost/eatsafe".parse();
        assert_eq!(
            outcome,
            Err(DatabaseUrlError::UnsupportedScheme {
                scheme: "postgres".into()
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("sqlite://")]
    fn rejects_empty_urls(#[case] url: &str) {
        assert_eq!(url.parse::<DatabaseLocation>(), Err(DatabaseUrlError::Empty));
    }

    #[rstest]
    #[case(Some("sqlite://flag.db"), Some("sqlite://env.db"), "flag.db")]
    #[case(None, Some("sqlite://env.db"), "env.db")]
    #[case(None, None, "eatsafe.db")]
    fn resolution_prefers_explicit_then_environment(
        #[case] explicit: Option<&str>,
        #[case] environment: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            DatabaseLocation::resolve(explicit, environment),
            Ok(DatabaseLocation::File(expected.into()))
        );
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        let location = DatabaseLocation::File("data/eatsafe.db".into());
        assert_eq!(location.to_string().parse::<DatabaseLocation>(), Ok(location));
    }
}
