//! JSON bodies exchanged with the routing server.
//!
//! A successful answer carries `path`, a list of `[x, y]` pairs ordered from
//! the destination to the node nearest the selected point. Failures carry a
//! single `error` string.

use geo::Coord;
use medroute_core::{RouteError, RoutePath};
use serde::Deserialize;

/// Body of a successful `/api/route` answer.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Path coordinates in service order, `x` first.
    pub path: Option<Vec<[f64; 2]>>,
}

impl RouteResponse {
    /// Convert the wire path into a [`RoutePath`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Protocol`] when `path` is absent or empty.
    pub fn into_route_path(self) -> Result<RoutePath, RouteError> {
        let pairs = self.path.ok_or_else(|| RouteError::Protocol {
            message: "route response missing path".to_owned(),
        })?;
        RoutePath::new(pairs.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}

/// Body the server sends alongside a failure status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub error: String,
}
