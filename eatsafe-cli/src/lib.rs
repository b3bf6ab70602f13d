//! Command-line interface for querying an EatSafe facility database.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use eatsafe_core::{DATABASE_URL_ENV, DatabaseLocation};
use serde::Serialize;

mod error;
mod init;
mod logging;
mod nearby;
mod search;
mod show;

pub use error::CliError;

use init::InitArgs;
use nearby::NearbyArgs;
use search::SearchArgs;
use show::ShowArgs;

pub(crate) const ARG_DATABASE_URL: &str = "database-url";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_FILTER: &str = "filter";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ARG_SEARCH_TERM: &str = "term";
pub(crate) const ARG_FACILITY_ID: &str = "facility-id";
pub(crate) const ENV_NEARBY_LAT: &str = "EATSAFE_CMDS_NEARBY_LAT";
pub(crate) const ENV_NEARBY_LON: &str = "EATSAFE_CMDS_NEARBY_LON";
pub(crate) const ENV_SEARCH_TERM: &str = "EATSAFE_CMDS_SEARCH_TERM";
pub(crate) const ENV_SHOW_FACILITY_ID: &str = "EATSAFE_CMDS_SHOW_FACILITY_ID";

/// Run the EatSafe CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the store or the
/// output stream fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init(cli.verbose)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Init(args) => init::run_init(args, &mut stdout),
        Command::Nearby(args) => nearby::run_nearby(args, &mut stdout),
        Command::Search(args) => search::run_search(args, &mut stdout),
        Command::Show(args) => show::run_show(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "eatsafe",
    about = "Query food safety inspection results for nearby facilities",
    version
)]
struct Cli {
    /// Log executed queries and schema steps.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or verify the database schema.
    Init(InitArgs),
    /// List facilities closest to a point.
    Nearby(NearbyArgs),
    /// Find facilities by name.
    Search(SearchArgs),
    /// Print a facility with its inspection history.
    Show(ShowArgs),
}

/// Pick the database from the merged flag, then `DATABASE_URL`, then the
/// built-in default.
pub(crate) fn resolve_database(explicit: Option<&str>) -> Result<DatabaseLocation, CliError> {
    let environment = std::env::var(DATABASE_URL_ENV).ok();
    DatabaseLocation::resolve(explicit, environment.as_deref()).map_err(CliError::from)
}

/// Write `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
