//! Contracts for the collaborators the controller drives.
//!
//! The map surface, destination selection, user notices, diagnostics and
//! routing service are all external. Each is reached through one narrow
//! trait so hosts can plug in a real widget or an in-memory double.

use async_trait::async_trait;

use crate::controller::InteractionId;
use crate::coords::{Bounds, LatLng};
use crate::error::RouteError;
use crate::overlay::{ElementId, PolylineStyle};
use crate::route::{RoutePath, RouteRequest};

/// Drawing primitives of the map widget.
pub trait MapSurface {
    /// Draw a point marker and return its handle.
    fn add_marker(&mut self, position: LatLng) -> ElementId;
    /// Draw a polyline through `path` and return its handle.
    fn add_polyline(&mut self, path: &[LatLng], style: &PolylineStyle) -> ElementId;
    /// Remove a previously drawn element. Unknown handles are ignored.
    fn remove(&mut self, element: ElementId);
    /// Adjust the viewport so `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// The destination selection control.
pub trait DestinationSource {
    /// Raw value currently selected. `None` or an empty string mean nothing
    /// is selected.
    fn selected(&self) -> Option<String>;
}

/// Blocking, user-facing notices.
pub trait Notifier {
    /// Show `message` to the user.
    fn alert(&mut self, message: &str);
}

/// Channel receiving failures that are not shown to the user.
pub trait DiagnosticSink {
    /// Record that `interaction` ended with `error`.
    fn record_failure(&mut self, interaction: InteractionId, error: &RouteError);
}

/// The routing service computing a path from a point to a destination.
///
/// Implementations are polled on a single task and need not be `Send`.
#[async_trait(?Send)]
pub trait RouteService {
    /// Fetch the route for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] when the request fails or the response does
    /// not carry a usable path.
    async fn route(&self, request: &RouteRequest) -> Result<RoutePath, RouteError>;
}

#[async_trait(?Send)]
impl<S: RouteService + ?Sized> RouteService for Box<S> {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePath, RouteError> {
        (**self).route(request).await
    }
}

/// [`Notifier`] that writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// [`DiagnosticSink`] that writes failures to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl DiagnosticSink for LogDiagnostics {
    fn record_failure(&mut self, interaction: InteractionId, error: &RouteError) {
        log::error!("error fetching or drawing route for interaction {interaction}: {error}");
    }
}

/// [`DestinationSource`] holding a fixed selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedDestination {
    selected: Option<String>,
}

impl FixedDestination {
    /// Selection holding `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            selected: Some(value.into()),
        }
    }

    /// Selection with nothing chosen.
    #[must_use]
    pub const fn none() -> Self {
        Self { selected: None }
    }

    /// Change the selection.
    pub fn select(&mut self, value: Option<String>) {
        self.selected = value;
    }
}

impl DestinationSource for FixedDestination {
    fn selected(&self) -> Option<String> {
        self.selected.clone()
    }
}
