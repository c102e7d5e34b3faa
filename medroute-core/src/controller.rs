//! The interaction controller.
//!
//! One interaction runs from a point selection to a rendered route or a
//! failure. [`InteractionController::begin`] performs everything up to the
//! network request and hands back a [`PendingRoute`]; the host sends it and
//! feeds the answer to [`InteractionController::complete`]. Keeping the
//! suspension point outside the controller lets several interactions overlap
//! on a single task without locking.
//!
//! # Overlapping interactions
//!
//! Under [`StalePolicy::ArrivalOrder`] nothing orders overlapping
//! interactions: a response that arrives after a newer interaction has
//! already rendered replaces that rendering. [`StalePolicy::LatestStart`]
//! discards responses belonging to superseded interactions instead.

use std::fmt;

use crate::coords::{Bounds, LatLng, SelectionPoint};
use crate::error::{RouteError, ValidationError};
use crate::overlay::{Overlay, PolylineStyle};
use crate::ports::{
    DestinationSource, DiagnosticSink, LogDiagnostics, LogNotifier, MapSurface, Notifier,
};
use crate::route::{DestinationId, RoutePath, RouteRequest};

/// Notice shown when a point is selected without a destination.
pub const MISSING_DESTINATION_NOTICE: &str = "Please select a hospital from the dropdown.";

/// Sequence number of an interaction, increasing in start order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractionId(u64);

impl InteractionId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How responses to superseded interactions are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Render every response as it arrives; the last to arrive wins.
    #[default]
    ArrivalOrder,
    /// Discard responses whose interaction is not the latest started.
    LatestStart,
}

/// A route request waiting to be sent.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a pending route must be sent and completed"]
pub struct PendingRoute {
    interaction: InteractionId,
    request: RouteRequest,
}

impl PendingRoute {
    /// Interaction the request belongs to.
    pub const fn interaction(&self) -> InteractionId {
        self.interaction
    }

    /// Request body to send.
    pub const fn request(&self) -> &RouteRequest {
        &self.request
    }
}

/// How an interaction ended.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// No destination was selected; no request was issued.
    DestinationMissing {
        /// Interaction that ended.
        interaction: InteractionId,
    },
    /// The route was drawn and the viewport fitted to it.
    RouteRendered {
        /// Interaction that ended.
        interaction: InteractionId,
        /// Bounds the viewport was fitted to.
        bounds: Bounds,
    },
    /// The request failed or the response carried no usable path.
    RequestFailed {
        /// Interaction that ended.
        interaction: InteractionId,
        /// Reported failure.
        error: RouteError,
    },
    /// The response arrived after a newer interaction started and was
    /// dropped.
    Discarded {
        /// Interaction that ended.
        interaction: InteractionId,
        /// Interaction that superseded it.
        latest: InteractionId,
    },
}

impl InteractionOutcome {
    /// Interaction this outcome belongs to.
    #[must_use]
    pub const fn interaction(&self) -> InteractionId {
        match self {
            Self::DestinationMissing { interaction }
            | Self::RouteRendered { interaction, .. }
            | Self::RequestFailed { interaction, .. }
            | Self::Discarded { interaction, .. } => *interaction,
        }
    }

    /// Whether a route was drawn.
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::RouteRendered { .. })
    }
}

impl From<ValidationError> for InteractionOutcome {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::MissingDestination { interaction } => {
                Self::DestinationMissing { interaction }
            }
        }
    }
}

/// Orchestrates point selection, validation and route rendering while
/// keeping exactly one overlay on the map.
pub struct InteractionController<M, D> {
    map: M,
    destinations: D,
    notifier: Box<dyn Notifier>,
    diagnostics: Box<dyn DiagnosticSink>,
    overlay: Overlay,
    style: PolylineStyle,
    stale_policy: StalePolicy,
    last_started: u64,
}

impl<M: fmt::Debug, D: fmt::Debug> fmt::Debug for InteractionController<M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController")
            .field("map", &self.map)
            .field("destinations", &self.destinations)
            .field("notifier", &"<dyn Notifier>")
            .field("diagnostics", &"<dyn DiagnosticSink>")
            .field("overlay", &self.overlay)
            .field("style", &self.style)
            .field("stale_policy", &self.stale_policy)
            .field("last_started", &self.last_started)
            .finish()
    }
}

impl<M: MapSurface, D: DestinationSource> InteractionController<M, D> {
    /// Create a controller drawing on `map` and reading `destinations`.
    ///
    /// Notices and failures go to the log until replaced with
    /// [`with_notifier`](Self::with_notifier) and
    /// [`with_diagnostics`](Self::with_diagnostics).
    pub fn new(map: M, destinations: D) -> Self {
        Self {
            map,
            destinations,
            notifier: Box::new(LogNotifier),
            diagnostics: Box::new(LogDiagnostics),
            overlay: Overlay::default(),
            style: PolylineStyle::default(),
            stale_policy: StalePolicy::default(),
            last_started: 0,
        }
    }

    /// Route user notices to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Route failure diagnostics to `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// Set how responses to superseded interactions are treated.
    #[must_use]
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Set the route polyline style.
    #[must_use]
    pub fn with_polyline_style(mut self, style: PolylineStyle) -> Self {
        self.style = style;
        self
    }

    /// Start an interaction for a selected point.
    ///
    /// Clears the overlay, marks the point and reads the destination
    /// selection. The returned [`PendingRoute`] must be sent exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingDestination`] after notifying the
    /// user when nothing is selected. The point marker stays on the map.
    pub fn begin(&mut self, point: SelectionPoint) -> Result<PendingRoute, ValidationError> {
        let interaction = self.start_interaction();
        self.clear();
        let marker = self.map.add_marker(point);
        self.overlay.set_point(marker);

        let Some(hospital) = DestinationId::from_selection(self.destinations.selected()) else {
            log::debug!("interaction {interaction}: no destination selected");
            self.notifier.alert(MISSING_DESTINATION_NOTICE);
            return Err(ValidationError::MissingDestination { interaction });
        };

        log::debug!(
            "interaction {interaction}: requesting route from ({}, {}) to {hospital}",
            point.lat,
            point.lng
        );
        Ok(PendingRoute {
            interaction,
            request: RouteRequest::new(point, hospital),
        })
    }

    /// Finish an interaction with the routing service's answer.
    ///
    /// On success the destination marker and route replace any that are on
    /// the map and the viewport is fitted to the route. Failures are
    /// recorded on the diagnostic channel and leave the map untouched.
    pub fn complete(
        &mut self,
        pending: PendingRoute,
        result: Result<RoutePath, RouteError>,
    ) -> InteractionOutcome {
        let interaction = pending.interaction;
        if let Some(latest) = self.superseded_by(interaction) {
            log::debug!("interaction {interaction}: discarding response, {latest} is current");
            if let Err(error) = &result {
                self.diagnostics.record_failure(interaction, error);
            }
            return InteractionOutcome::Discarded {
                interaction,
                latest,
            };
        }

        match result {
            Ok(path) => {
                let bounds = self.render_route(&path);
                log::debug!("interaction {interaction}: rendered route of {} points", path.len());
                InteractionOutcome::RouteRendered {
                    interaction,
                    bounds,
                }
            }
            Err(error) => {
                self.diagnostics.record_failure(interaction, &error);
                InteractionOutcome::RequestFailed { interaction, error }
            }
        }
    }

    /// Handle to the elements currently drawn.
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The map surface.
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the map surface.
    pub const fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Mutable access to the destination selection.
    pub const fn destinations_mut(&mut self) -> &mut D {
        &mut self.destinations
    }

    /// Most recently started interaction.
    pub const fn latest(&self) -> Option<InteractionId> {
        if self.last_started == 0 {
            None
        } else {
            Some(InteractionId(self.last_started))
        }
    }

    /// Configured stale response policy.
    pub const fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }

    /// Consume the controller, returning the map and destination selection.
    pub fn into_parts(self) -> (M, D) {
        (self.map, self.destinations)
    }

    const fn start_interaction(&mut self) -> InteractionId {
        self.last_started = self.last_started.saturating_add(1);
        InteractionId(self.last_started)
    }

    fn superseded_by(&self, interaction: InteractionId) -> Option<InteractionId> {
        match self.stale_policy {
            StalePolicy::ArrivalOrder => None,
            StalePolicy::LatestStart => self.latest().filter(|latest| *latest != interaction),
        }
    }

    fn clear(&mut self) {
        for element in self.overlay.take().elements() {
            self.map.remove(element);
        }
    }

    fn render_route(&mut self, path: &RoutePath) -> Bounds {
        for element in self.overlay.take_route().into_iter().flatten() {
            self.map.remove(element);
        }
        let positions = path.to_map_path();
        let destination = self.map.add_marker(LatLng::from_service(path.destination()));
        let route = self.map.add_polyline(&positions, &self.style);
        self.overlay.set_route(destination, route);

        let bounds = path.bounds();
        self.map.fit_bounds(bounds);
        bounds
    }
}
