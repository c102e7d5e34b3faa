//! Route requests and the paths returned for them.

use geo::{BoundingRect, Coord, LineString, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::coords::{Bounds, LatLng, SelectionPoint};
use crate::error::RouteError;

/// Opaque identifier of the destination chosen in the selection control.
///
/// Always non-empty; an empty selection means nothing is selected and never
/// produces a `DestinationId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DestinationId(String);

impl DestinationId {
    /// Interpret the raw value of a selection control.
    ///
    /// Returns `None` when the value is absent or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use medroute_core::DestinationId;
    ///
    /// assert!(DestinationId::from_selection(Some("H12".to_owned())).is_some());
    /// assert!(DestinationId::from_selection(Some(String::new())).is_none());
    /// assert!(DestinationId::from_selection(None).is_none());
    /// ```
    #[must_use]
    pub fn from_selection(raw: Option<String>) -> Option<Self> {
        raw.filter(|value| !value.is_empty()).map(Self)
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DestinationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DestinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a routing-service request.
///
/// Serialises as `{"marker": {"lat": .., "lng": ..}, "hospital": ".."}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteRequest {
    /// Selected start point.
    pub marker: SelectionPoint,
    /// Selected destination.
    pub hospital: DestinationId,
}

impl RouteRequest {
    /// Build a request from a selected point and destination.
    #[must_use]
    pub const fn new(marker: SelectionPoint, hospital: DestinationId) -> Self {
        Self { marker, hospital }
    }
}

/// Ordered, non-empty route geometry in the routing-service convention.
///
/// The first coordinate is the destination anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    destination: Coord<f64>,
    rest: Vec<Coord<f64>>,
}

impl RoutePath {
    /// Build a path from service coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Protocol`] when `coords` is empty.
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self, RouteError> {
        let mut iter = coords.into_iter();
        let destination = iter.next().ok_or_else(|| RouteError::Protocol {
            message: "route path contains no coordinates".to_owned(),
        })?;
        Ok(Self {
            destination,
            rest: iter.collect(),
        })
    }

    /// Service coordinate of the destination anchor (`path[0]`).
    #[must_use]
    pub const fn destination(&self) -> Coord<f64> {
        self.destination
    }

    /// Number of coordinates in the path. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rest.len().saturating_add(1)
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the service coordinates in order.
    pub fn coords(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        std::iter::once(self.destination).chain(self.rest.iter().copied())
    }

    /// Bounds covering every coordinate of the path, in map convention.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let line: LineString<f64> = self.coords().collect();
        let rect = line
            .bounding_rect()
            .unwrap_or_else(|| Rect::new(self.destination, self.destination));
        Bounds::from_service_rect(rect)
    }

    /// Convert the whole path into map positions.
    #[must_use]
    pub fn to_map_path(&self) -> Vec<LatLng> {
        self.coords().map(LatLng::from_service).collect()
    }
}
