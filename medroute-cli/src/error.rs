//! Error types emitted by the medroute CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use medroute_data::routing::ProviderBuildError;
use thiserror::Error;

/// Errors emitted by the medroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Long flag name of the option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A coordinate lies outside its valid range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    CoordinateOutOfRange {
        /// Long flag name of the coordinate.
        field: &'static str,
        /// Rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// A zero request timeout was configured.
    #[error("timeout-secs must be at least 1")]
    ZeroTimeout,
    /// Constructing the routing service client failed.
    #[error("failed to build routing service for {base_url:?}: {source}")]
    BuildRouteService {
        /// Configured base URL.
        base_url: String,
        /// Underlying construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serialising the report failed.
    #[error("failed to serialise route report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing the report failed.
    #[error("failed to write route report: {0}")]
    WriteReport(#[source] std::io::Error),
    /// The interaction finished without drawing a route.
    #[error("no route rendered: {reason}")]
    Interaction {
        /// Why the interaction stopped.
        reason: String,
    },
}
