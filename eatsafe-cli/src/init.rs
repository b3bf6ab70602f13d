//! `init` command: create or verify the schema.

use std::io::Write;

use clap::Parser;
use eatsafe_core::{DatabaseLocation, SCHEMA_VERSION, SqliteFacilityStore};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DATABASE_URL, CliError, resolve_database, write_json};

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Open the configured database, creating the file and \
                 schema when missing. An existing database must already be \
                 at the current schema version.",
    about = "Create or verify the database schema"
)]
#[ortho_config(prefix = "EATSAFE")]
pub(crate) struct InitArgs {
    /// Connection string, e.g. `sqlite://eatsafe.db`.
    #[arg(long = ARG_DATABASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) database_url: Option<String>,
}

impl InitArgs {
    fn into_config(self) -> Result<InitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InitConfig::try_from(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InitConfig {
    pub(crate) database: DatabaseLocation,
}

impl TryFrom<InitArgs> for InitConfig {
    type Error = CliError;

    fn try_from(args: InitArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            database: resolve_database(args.database_url.as_deref())?,
        })
    }
}

/// Summary printed after the schema is in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct InitReport {
    pub(crate) database: String,
    pub(crate) schema_version: i64,
}

pub(crate) fn execute_init(config: &InitConfig) -> Result<InitReport, CliError> {
    let store = SqliteFacilityStore::open(&config.database)?;
    info!("schema ready in {}", store.location());
    Ok(InitReport {
        database: store.location().to_string(),
        schema_version: SCHEMA_VERSION,
    })
}

pub(crate) fn run_init(args: InitArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_init(&config)?;
    write_json(writer, &report)
}
