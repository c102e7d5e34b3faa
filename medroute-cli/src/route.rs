//! Route command implementation for the medroute CLI.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use medroute_core::{
    Bounds, FixedDestination, InteractionController, InteractionOutcome, LatLng, MapSnapshot,
    MemoryMap, RouteService, Session,
};
use medroute_data::routing::{HttpRouteService, HttpRouteServiceConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ENDPOINT, ARG_HOSPITAL, ARG_LAT, ARG_LNG, ARG_TIMEOUT_SECS, CliError, ENV_LAT, ENV_LNG,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    long_about = "Select a point on the map and draw the route from the \
                 chosen hospital to it. Options can come from CLI flags, \
                 configuration files, or environment variables. The \
                 resulting overlay is printed as JSON.",
    about = "Route from a hospital to a selected point",
    allow_negative_numbers = true
)]
#[ortho_config(prefix = "MEDROUTE")]
pub(crate) struct RouteArgs {
    /// Latitude of the selected point in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees")]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the selected point in degrees.
    #[arg(long = ARG_LNG, value_name = "degrees")]
    #[serde(default)]
    pub(crate) lng: Option<f64>,
    /// Identifier of the destination hospital.
    #[arg(long = ARG_HOSPITAL, value_name = "id")]
    #[serde(default)]
    pub(crate) hospital: Option<String>,
    /// Base URL of the routing server (e.g. "http://localhost:5000").
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    /// Selected point.
    pub(crate) point: LatLng,
    /// Hospital selection; `None` exercises the validation path.
    pub(crate) hospital: Option<String>,
    /// Routing service client settings.
    pub(crate) service: HttpRouteServiceConfig,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lng = args.lng.ok_or(CliError::MissingArgument {
            field: ARG_LNG,
            env: ENV_LNG,
        })?;
        let point = LatLng::new(
            require_range(ARG_LAT, lat, -90.0, 90.0)?,
            require_range(ARG_LNG, lng, -180.0, 180.0)?,
        );

        let mut service = HttpRouteServiceConfig::default();
        if let Some(endpoint) = args.endpoint {
            service.base_url = endpoint;
        }
        if let Some(secs) = args.timeout_secs {
            if secs == 0 {
                return Err(CliError::ZeroTimeout);
            }
            service.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            point,
            hospital: args.hospital,
            service,
        })
    }
}

fn require_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, CliError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::CoordinateOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Builds the routing service for the current invocation.
pub(super) trait RouteServiceBuilder {
    fn build(&self, config: &RouteConfig) -> Result<Box<dyn RouteService>, CliError>;
}

pub(super) struct DefaultRouteServiceBuilder;

impl RouteServiceBuilder for DefaultRouteServiceBuilder {
    fn build(&self, config: &RouteConfig) -> Result<Box<dyn RouteService>, CliError> {
        let service = HttpRouteService::with_config(config.service.clone()).map_err(|source| {
            CliError::BuildRouteService {
                base_url: config.service.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(service))
    }
}

/// JSON document printed by the `route` command.
#[derive(Debug, Serialize)]
pub(super) struct RouteReport {
    pub(super) outcome: OutcomeReport,
    pub(super) map: MapSnapshot,
}

/// Serialisable summary of an [`InteractionOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(super) enum OutcomeReport {
    DestinationMissing {
        interaction: u64,
    },
    RouteRendered {
        interaction: u64,
        bounds: Bounds,
    },
    RequestFailed {
        interaction: u64,
        error: String,
    },
    Discarded {
        interaction: u64,
        latest: u64,
    },
}

impl OutcomeReport {
    /// Reason to exit unsuccessfully, if any.
    pub(super) fn failure_reason(&self) -> Option<String> {
        match self {
            Self::RouteRendered { .. } => None,
            Self::DestinationMissing { .. } => Some("no hospital selected".to_owned()),
            Self::RequestFailed { error, .. } => Some(error.clone()),
            Self::Discarded { latest, .. } => {
                Some(format!("superseded by interaction #{latest}"))
            }
        }
    }
}

impl From<&InteractionOutcome> for OutcomeReport {
    fn from(outcome: &InteractionOutcome) -> Self {
        match outcome {
            InteractionOutcome::DestinationMissing { interaction } => Self::DestinationMissing {
                interaction: interaction.get(),
            },
            InteractionOutcome::RouteRendered {
                interaction,
                bounds,
            } => Self::RouteRendered {
                interaction: interaction.get(),
                bounds: *bounds,
            },
            InteractionOutcome::RequestFailed { interaction, error } => Self::RequestFailed {
                interaction: interaction.get(),
                error: error.to_string(),
            },
            InteractionOutcome::Discarded {
                interaction,
                latest,
            } => Self::Discarded {
                interaction: interaction.get(),
                latest: latest.get(),
            },
        }
    }
}

pub(super) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &DefaultRouteServiceBuilder, &mut stdout)
}

pub(super) fn run_route_with(
    args: RouteArgs,
    builder: &dyn RouteServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    log::debug!("resolved route configuration: {config:?}");
    let report = execute_route(&config, builder)?;
    write_report(writer, &report)?;
    match report.outcome.failure_reason() {
        None => Ok(()),
        Some(reason) => Err(CliError::Interaction { reason }),
    }
}

fn execute_route(
    config: &RouteConfig,
    builder: &dyn RouteServiceBuilder,
) -> Result<RouteReport, CliError> {
    let service = builder.build(config)?;
    let mut destinations = FixedDestination::none();
    destinations.select(config.hospital.clone());
    let controller = InteractionController::new(MemoryMap::new(), destinations);
    let mut session = Session::new(controller, service);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let outcome = runtime.block_on(session.select_point(config.point));

    Ok(RouteReport {
        outcome: OutcomeReport::from(&outcome),
        map: session.controller().map().snapshot(),
    })
}

fn write_report(writer: &mut dyn Write, report: &RouteReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
