//! Coordinate conventions shared by the map surface and the routing service.
//!
//! The map surface speaks `lat/lng` pairs while the routing service speaks
//! `[x, y]` pairs where `x` is longitude and `y` is latitude. Service
//! coordinates are held as [`geo::Coord`], which uses the same axis order, so
//! the only place the axes are swapped is [`LatLng::from_service`] and its
//! inverse [`LatLng::to_service`].

use geo::{BoundingRect, Coord, LineString, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A geographic position in the map surface's `lat/lng` convention.
///
/// Point selections arrive in this form and are sent to the routing service
/// as the `marker` field, serialised as `{"lat": .., "lng": ..}`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// The point a user selected on the map.
///
/// Created once per selection event and replaced, never merged, by the next
/// one.
pub type SelectionPoint = LatLng;

impl LatLng {
    /// Create a position from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Convert a routing-service coordinate (`x` = longitude, `y` = latitude)
    /// into the map convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use medroute_core::LatLng;
    ///
    /// let position = LatLng::from_service(Coord { x: 74.35, y: 31.56 });
    /// assert_eq!(position, LatLng::new(31.56, 74.35));
    /// ```
    #[must_use]
    pub const fn from_service(coord: Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }

    /// Convert this position into the routing-service convention.
    #[must_use]
    pub const fn to_service(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

/// Axis-aligned bounds of a set of map positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// Corner with the smallest latitude and longitude.
    pub south_west: LatLng,
    /// Corner with the largest latitude and longitude.
    pub north_east: LatLng,
}

impl Bounds {
    /// Compute the bounds covering `positions`.
    ///
    /// Returns `None` when `positions` is empty.
    #[must_use]
    pub fn of(positions: &[LatLng]) -> Option<Self> {
        let line: LineString<f64> = positions.iter().map(|p| p.to_service()).collect();
        line.bounding_rect().map(Self::from_service_rect)
    }

    /// Convert a service-convention rectangle into map bounds.
    #[must_use]
    pub fn from_service_rect(rect: Rect<f64>) -> Self {
        Self {
            south_west: LatLng::from_service(rect.min()),
            north_east: LatLng::from_service(rect.max()),
        }
    }

    /// Whether `position` lies inside or on the edge of these bounds.
    #[must_use]
    pub fn contains(&self, position: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&position.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&position.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(Coord { x: 74.35, y: 31.56 }, LatLng::new(31.56, 74.35))]
    #[case(Coord { x: -0.1, y: 51.5 }, LatLng::new(51.5, -0.1))]
    #[case(Coord { x: 0.0, y: -33.9 }, LatLng::new(-33.9, 0.0))]
    fn from_service_swaps_axes(#[case] coord: Coord<f64>, #[case] expected: LatLng) {
        assert_eq!(LatLng::from_service(coord), expected);
    }

    #[rstest]
    fn to_service_puts_longitude_first() {
        let coord = LatLng::new(31.55, 74.34).to_service();

        assert_eq!(coord.x, 74.34);
        assert_eq!(coord.y, 31.55);
    }

    #[rstest]
    fn bounds_of_empty_slice_is_none() {
        assert!(Bounds::of(&[]).is_none());
    }

    #[rstest]
    fn bounds_of_single_position_is_degenerate() {
        let position = LatLng::new(31.55, 74.34);

        let bounds = Bounds::of(&[position]).expect("bounds for one position");

        assert_eq!(bounds.south_west, position);
        assert_eq!(bounds.north_east, position);
    }

    #[rstest]
    fn bounds_cover_route_corners() {
        let positions = [
            LatLng::new(31.56, 74.35),
            LatLng::new(31.55, 74.34),
            LatLng::new(31.58, 74.30),
        ];

        let bounds = Bounds::of(&positions).expect("bounds");

        assert_eq!(bounds.south_west, LatLng::new(31.55, 74.30));
        assert_eq!(bounds.north_east, LatLng::new(31.58, 74.35));
    }

    proptest! {
        #[test]
        fn service_round_trip_is_identity(lat in -90.0_f64..=90.0, lng in -180.0_f64..=180.0) {
            let position = LatLng::new(lat, lng);
            prop_assert_eq!(LatLng::from_service(position.to_service()), position);
        }

        #[test]
        fn bounds_contain_every_position(
            raw in prop::collection::vec((-90.0_f64..=90.0, -180.0_f64..=180.0), 1..32)
        ) {
            let positions: Vec<LatLng> =
                raw.into_iter().map(|(lat, lng)| LatLng::new(lat, lng)).collect();
            let bounds = Bounds::of(&positions).expect("non-empty input has bounds");
            for position in positions {
                prop_assert!(bounds.contains(position));
            }
        }
    }
}
