//! Log output for the command-line binary.
//!
//! Library crates emit through the `log` facade; the subscriber installed
//! here picks those records up through its `tracing-log` bridge and writes
//! them to stderr so stdout stays valid JSON.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::CliError;

const DEFAULT_FILTER: &str = "eatsafe=info";
const VERBOSE_FILTER: &str = "eatsafe=debug";

/// Filter directives used when `RUST_LOG` is unset.
pub(crate) const fn default_directives(verbose: bool) -> &'static str {
    if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }
}

/// Install the global subscriber. `RUST_LOG` overrides the defaults.
pub(crate) fn init(verbose: bool) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(CliError::Logging)
}
