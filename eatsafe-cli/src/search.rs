//! `search` command: facilities by name.

use std::io::Write;

use clap::Parser;
use eatsafe_core::{DatabaseLocation, Facility, FacilityDirectory, SearchTerm, SqliteFacilityStore};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_DATABASE_URL, ARG_SEARCH_TERM, CliError, ENV_SEARCH_TERM, resolve_database, write_json,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print up to 100 facilities whose name contains the term, \
                 ignoring case, ordered by facility id.",
    about = "Find facilities by name"
)]
#[ortho_config(prefix = "EATSAFE")]
pub(crate) struct SearchArgs {
    /// Connection string, e.g. `sqlite://eatsafe.db`.
    #[arg(long = ARG_DATABASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) database_url: Option<String>,
    /// Text the facility name must contain.
    #[arg(value_name = "term")]
    #[serde(default)]
    pub(crate) term: Option<String>,
}

impl SearchArgs {
    fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) database: DatabaseLocation,
    pub(crate) term: SearchTerm,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let term = args.term.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_TERM,
            env: ENV_SEARCH_TERM,
        })?;
        Ok(Self {
            database: resolve_database(args.database_url.as_deref())?,
            term: SearchTerm::new(term)?,
        })
    }
}

pub(crate) fn execute_search(config: &SearchConfig) -> Result<Vec<Facility>, CliError> {
    let store = SqliteFacilityStore::open(&config.database)?;
    let results = store.search(&config.term)?;
    info!("{} facilities match {:?}", results.len(), config.term.as_str());
    Ok(results)
}

pub(crate) fn run_search(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let results = execute_search(&config)?;
    write_json(writer, &results)
}
