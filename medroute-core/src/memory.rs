//! In-memory [`MapSurface`] used by headless hosts and tests.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::coords::{Bounds, LatLng};
use crate::overlay::{ElementId, PolylineStyle};
use crate::ports::MapSurface;

/// Initial map centre (Lahore).
pub const DEFAULT_CENTER: LatLng = LatLng::new(31.5497, 74.3436);

/// Initial zoom level.
pub const DEFAULT_ZOOM: u8 = 13;

/// An element drawn on a [`MemoryMap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum MapElement {
    /// A point marker.
    Marker {
        /// Marker position.
        position: LatLng,
    },
    /// A polyline.
    Polyline {
        /// Vertices in drawing order.
        path: Vec<LatLng>,
        /// Drawing style.
        style: PolylineStyle,
    },
}

/// Current viewport of a [`MemoryMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum MapView {
    /// Centred on a position at a zoom level.
    Centered {
        /// Viewport centre.
        center: LatLng,
        /// Zoom level.
        zoom: u8,
    },
    /// Fitted to bounds.
    Fitted {
        /// Visible bounds.
        bounds: Bounds,
    },
}

impl Default for MapView {
    fn default() -> Self {
        Self::Centered {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// A drawn element together with its handle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DrawnElement {
    /// Handle assigned when the element was drawn.
    pub id: ElementId,
    /// The element itself.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub element: MapElement,
}

/// Point-in-time view of everything on a [`MemoryMap`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MapSnapshot {
    /// Drawn elements in drawing order.
    pub elements: Vec<DrawnElement>,
    /// Current viewport.
    pub view: MapView,
}

/// Map surface that keeps its elements in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMap {
    next_id: u64,
    elements: BTreeMap<ElementId, MapElement>,
    view: MapView,
}

impl MemoryMap {
    /// Empty map with the default view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty map centred on `center` at `zoom`.
    #[must_use]
    pub fn with_view(center: LatLng, zoom: u8) -> Self {
        Self {
            view: MapView::Centered { center, zoom },
            ..Self::default()
        }
    }

    /// Current viewport.
    #[must_use]
    pub const fn view(&self) -> MapView {
        self.view
    }

    /// Number of drawn elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up a drawn element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&MapElement> {
        self.elements.get(&id)
    }

    /// Positions of every marker in drawing order.
    #[must_use]
    pub fn markers(&self) -> Vec<LatLng> {
        self.elements
            .values()
            .filter_map(|element| match element {
                MapElement::Marker { position } => Some(*position),
                MapElement::Polyline { .. } => None,
            })
            .collect()
    }

    /// Vertices of every polyline in drawing order.
    #[must_use]
    pub fn polylines(&self) -> Vec<&[LatLng]> {
        self.elements
            .values()
            .filter_map(|element| match element {
                MapElement::Polyline { path, .. } => Some(path.as_slice()),
                MapElement::Marker { .. } => None,
            })
            .collect()
    }

    /// Capture the drawn elements and viewport.
    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            elements: self
                .elements
                .iter()
                .map(|(id, element)| DrawnElement {
                    id: *id,
                    element: element.clone(),
                })
                .collect(),
            view: self.view,
        }
    }

    fn insert(&mut self, element: MapElement) -> ElementId {
        self.next_id = self.next_id.saturating_add(1);
        let id = ElementId(self.next_id);
        self.elements.insert(id, element);
        id
    }
}

impl MapSurface for MemoryMap {
    fn add_marker(&mut self, position: LatLng) -> ElementId {
        self.insert(MapElement::Marker { position })
    }

    fn add_polyline(&mut self, path: &[LatLng], style: &PolylineStyle) -> ElementId {
        self.insert(MapElement::Polyline {
            path: path.to_vec(),
            style: style.clone(),
        })
    }

    fn remove(&mut self, element: ElementId) {
        self.elements.remove(&element);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.view = MapView::Fitted { bounds };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn map() -> MemoryMap {
        MemoryMap::new()
    }

    #[rstest]
    fn starts_centred_on_default_view(map: MemoryMap) {
        assert!(map.is_empty());
        assert_eq!(
            map.view(),
            MapView::Centered {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM
            }
        );
    }

    #[rstest]
    fn assigns_distinct_handles(mut map: MemoryMap) {
        let first = map.add_marker(LatLng::new(1.0, 2.0));
        let second = map.add_marker(LatLng::new(1.0, 2.0));

        assert_ne!(first, second);
        assert_eq!(map.len(), 2);
    }

    #[rstest]
    fn remove_ignores_unknown_handles(mut map: MemoryMap) {
        let marker = map.add_marker(LatLng::new(1.0, 2.0));
        map.remove(ElementId(999));
        map.remove(marker);
        map.remove(marker);

        assert!(map.is_empty());
    }

    #[rstest]
    fn separates_markers_and_polylines(mut map: MemoryMap) {
        let path = [LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)];
        map.add_marker(LatLng::new(5.0, 6.0));
        map.add_polyline(&path, &PolylineStyle::default());

        assert_eq!(map.markers(), vec![LatLng::new(5.0, 6.0)]);
        assert_eq!(map.polylines(), vec![&path[..]]);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn snapshot_serialises_elements_with_kind(mut map: MemoryMap) {
        map.add_marker(LatLng::new(31.55, 74.34));

        let json = serde_json::to_value(map.snapshot()).expect("serialise snapshot");

        assert_eq!(
            json["elements"][0],
            serde_json::json!({
                "id": 1,
                "kind": "marker",
                "position": { "lat": 31.55, "lng": 74.34 }
            })
        );
        assert_eq!(json["view"]["mode"], "centered");
    }
}
