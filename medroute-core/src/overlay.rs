//! Handle to the visual elements an interaction has drawn.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier a map surface assigns to a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(pub u64);

/// Default route colour.
pub const DEFAULT_ROUTE_COLOR: &str = "blue";

/// Drawing style for route polylines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolylineStyle {
    /// CSS colour understood by the map surface.
    pub color: String,
}

impl Default for PolylineStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_ROUTE_COLOR.to_owned(),
        }
    }
}

impl PolylineStyle {
    /// Style with the given colour.
    #[must_use]
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

/// The single rendered overlay owned by the controller.
///
/// Holds at most one point marker, one destination marker and one route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    point: Option<ElementId>,
    destination: Option<ElementId>,
    route: Option<ElementId>,
}

impl Overlay {
    /// Marker drawn at the selected point, if any.
    #[must_use]
    pub const fn point(&self) -> Option<ElementId> {
        self.point
    }

    /// Marker drawn at the route's destination anchor, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<ElementId> {
        self.destination
    }

    /// Route polyline, if any.
    #[must_use]
    pub const fn route(&self) -> Option<ElementId> {
        self.route
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.point.is_none() && self.destination.is_none() && self.route.is_none()
    }

    /// Iterate over every drawn element.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + use<> {
        [self.point, self.destination, self.route].into_iter().flatten()
    }

    /// Empty the handle, returning the elements that were in it.
    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub(crate) const fn set_point(&mut self, element: ElementId) {
        self.point = Some(element);
    }

    /// Remove the destination marker and route from the handle, returning
    /// them.
    pub(crate) const fn take_route(&mut self) -> [Option<ElementId>; 2] {
        [self.destination.take(), self.route.take()]
    }

    pub(crate) const fn set_route(&mut self, destination: ElementId, route: ElementId) {
        self.destination = Some(destination);
        self.route = Some(route);
    }
}
