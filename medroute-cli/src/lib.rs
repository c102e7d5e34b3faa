//! Command-line interface for requesting hospital routes.
//!
//! The `route` command runs one map interaction against a routing server and
//! prints the resulting overlay as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod route;

pub use error::CliError;

use route::{RouteArgs, run_route};

const ARG_LAT: &str = "lat";
const ARG_LNG: &str = "lng";
const ARG_HOSPITAL: &str = "hospital";
const ARG_ENDPOINT: &str = "endpoint";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_LAT: &str = "MEDROUTE_CMDS_ROUTE_LAT";
const ENV_LNG: &str = "MEDROUTE_CMDS_ROUTE_LNG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when
/// the routing service cannot be reached or when no route was rendered.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Route(args) => run_route(args),
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` selects the filter; warnings and errors are shown otherwise.
/// Records emitted through the `log` facade are forwarded as well.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "medroute",
    about = "Request the route from a hospital to a point on the map",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Route from the selected hospital to a point and print the overlay.
    Route(RouteArgs),
}

#[cfg(test)]
mod tests;
