//! `show` command: one facility with its inspection history.

use std::io::Write;

use clap::Parser;
use eatsafe_core::{DatabaseLocation, FacilityReport, SqliteFacilityStore};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE_URL, ARG_FACILITY_ID, CliError, ENV_SHOW_FACILITY_ID, resolve_database,
    write_json,
};

/// CLI arguments for the `show` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print a facility, its category, and every inspection with \
                 the questions asked, their labels and any comments. \
                 Inspections appear newest first.",
    about = "Print a facility with its inspection history"
)]
#[ortho_config(prefix = "EATSAFE")]
pub(crate) struct ShowArgs {
    /// Connection string, e.g. `sqlite://eatsafe.db`.
    #[arg(long = ARG_DATABASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) database_url: Option<String>,
    /// Key of the facility to print.
    #[arg(value_name = "facility-id")]
    #[serde(default)]
    pub(crate) facility_id: Option<String>,
}

impl ShowArgs {
    fn into_config(self) -> Result<ShowConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ShowConfig::try_from(merged)
    }
}

/// Resolved `show` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShowConfig {
    pub(crate) database: DatabaseLocation,
    pub(crate) facility_id: String,
}

impl TryFrom<ShowArgs> for ShowConfig {
    type Error = CliError;

    fn try_from(args: ShowArgs) -> Result<Self, Self::Error> {
        let facility_id = args.facility_id.ok_or(CliError::MissingArgument {
            field: ARG_FACILITY_ID,
            env: ENV_SHOW_FACILITY_ID,
        })?;
        Ok(Self {
            database: resolve_database(args.database_url.as_deref())?,
            facility_id,
        })
    }
}

pub(crate) fn execute_show(config: &ShowConfig) -> Result<FacilityReport, CliError> {
    let store = SqliteFacilityStore::open(&config.database)?;
    Ok(store.facility_report(&config.facility_id)?)
}

pub(crate) fn run_show(args: ShowArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_show(&config)?;
    write_json(writer, &report)
}
