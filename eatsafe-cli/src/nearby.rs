//! `nearby` command: facilities ranked by distance from a point.

use std::io::Write;

use clap::Parser;
use eatsafe_core::{
    DEFAULT_NEARBY_LIMIT, DatabaseLocation, FacilityDirectory, NearbyFacility, NearbyQuery,
    SqliteFacilityStore,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE_URL, ARG_FILTER, ARG_LAT, ARG_LIMIT, ARG_LON, CliError, ENV_NEARBY_LAT,
    ENV_NEARBY_LON, resolve_database, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank facilities by great-circle distance from a point. \
                 Facilities without coordinates are skipped. Distances are \
                 reported in kilometres.",
    about = "List facilities closest to a point"
)]
#[ortho_config(prefix = "EATSAFE")]
pub(crate) struct NearbyArgs {
    /// Connection string, e.g. `sqlite://eatsafe.db`.
    #[arg(long = ARG_DATABASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) database_url: Option<String>,
    /// Latitude of the query point in decimal degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the query point in decimal degrees.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Only include facilities whose name contains this text.
    #[arg(long = ARG_FILTER, value_name = "text")]
    #[serde(default)]
    pub(crate) filter: Option<String>,
    /// Maximum number of facilities to print (default 25).
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl NearbyArgs {
    fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    pub(crate) database: DatabaseLocation,
    pub(crate) query: NearbyQuery,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_NEARBY_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_NEARBY_LON,
        })?;
        let query = NearbyQuery::at(lat, lon)
            .with_filter(args.filter.unwrap_or_default())
            .with_limit(args.limit.unwrap_or(DEFAULT_NEARBY_LIMIT));
        Ok(Self {
            database: resolve_database(args.database_url.as_deref())?,
            query,
        })
    }
}

pub(crate) fn execute_nearby(config: &NearbyConfig) -> Result<Vec<NearbyFacility>, CliError> {
    let store = SqliteFacilityStore::open(&config.database)?;
    let results = store.nearby(&config.query)?;
    info!(
        "{} facilities near ({}, {})",
        results.len(),
        config.query.origin.y,
        config.query.origin.x
    );
    Ok(results)
}

pub(crate) fn run_nearby(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let results = execute_nearby(&config)?;
    write_json(writer, &results)
}
