//! Facade crate for the medroute map interaction engine.
//!
//! This crate re-exports the controller, ports and domain types, and exposes
//! the HTTP routing adapter behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use medroute_core::{
    Bounds, DestinationId, DestinationSource, DiagnosticSink, ElementId, FixedDestination,
    InteractionController, InteractionId, InteractionOutcome, LatLng, LogDiagnostics,
    LogNotifier, MISSING_DESTINATION_NOTICE, MapElement, MapSnapshot, MapSurface, MapView,
    MemoryMap, Notifier, Overlay, PendingRoute, PolylineStyle, RouteError, RoutePath,
    RouteRequest, RouteService, SelectionPoint, Session, StalePolicy, ValidationError,
};

#[cfg(feature = "http")]
pub use medroute_data::routing::{HttpRouteService, HttpRouteServiceConfig, ProviderBuildError};
