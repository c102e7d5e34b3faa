//! Core interaction logic for the medroute map tool.
//!
//! Responsibilities:
//! - Capture one selected point per interaction and validate the destination
//!   selection before any request is issued.
//! - Drive the routing service through the [`RouteService`] port and render
//!   its answer through the [`MapSurface`] port.
//! - Keep exactly one overlay on the map, replacing it on every interaction.
//!
//! Boundaries:
//! - No HTTP, widget or storage code; adapters live in `medroute-data` and in
//!   hosts.
//! - The only axis swap between service `[x, y]` and map `lat/lng` pairs is
//!   [`LatLng::from_service`] and its inverse.

#![forbid(unsafe_code)]

pub mod controller;
pub mod coords;
pub mod error;
pub mod memory;
pub mod overlay;
pub mod ports;
pub mod route;
pub mod session;

#[doc(hidden)]
pub mod test_support;

pub use controller::{
    InteractionController, InteractionId, InteractionOutcome, MISSING_DESTINATION_NOTICE,
    PendingRoute, StalePolicy,
};
pub use coords::{Bounds, LatLng, SelectionPoint};
pub use error::{RouteError, ValidationError};
pub use memory::{MapElement, MapSnapshot, MapView, MemoryMap};
pub use overlay::{ElementId, Overlay, PolylineStyle};
pub use ports::{
    DestinationSource, DiagnosticSink, FixedDestination, LogDiagnostics, LogNotifier, MapSurface,
    Notifier, RouteService,
};
pub use route::{DestinationId, RoutePath, RouteRequest};
pub use session::Session;
