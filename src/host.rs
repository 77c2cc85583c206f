//! Capability traits for the collaborators the curtain drives
//!
//! The curtain never builds maps or layers itself. It only needs a host that
//! can attach and detach layers and report its viewport, layers that can say
//! whether they are currently rendered, and features that expose a position.

use crate::Bounds;
use geo::{Coord, Point};

/// The map canvas layers are attached to
///
/// Hosts are not required to ignore a double attach: the curtain always
/// queries [`RenderableLayer::is_attached`] before calling into the host.
pub trait MapHost {
    /// Layer handle understood by this host
    type Layer: RenderableLayer;

    /// Attach a layer to the rendering surface
    fn add_layer(&mut self, layer: &Self::Layer);

    /// Detach a layer from the rendering surface
    fn remove_layer(&mut self, layer: &Self::Layer);

    /// Current viewport rectangle
    fn bounds(&self) -> Bounds;
}

impl<H: MapHost + ?Sized> MapHost for &mut H {
    type Layer = H::Layer;

    #[inline]
    fn add_layer(&mut self, layer: &Self::Layer) {
        (**self).add_layer(layer)
    }

    #[inline]
    fn remove_layer(&mut self, layer: &Self::Layer) {
        (**self).remove_layer(layer)
    }

    #[inline]
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }
}

/// A layer handle that can report its own attachment state
pub trait RenderableLayer {
    /// Whether the layer is currently attached to the host's rendering surface.
    ///
    /// Treated as ground truth, so attachment changes made by the host behind
    /// the curtain's back are picked up on the next scan.
    fn is_attached(&self) -> bool;
}

/// A geospatial point payload
///
/// Coordinates follow the GeoJSON order: `x` is longitude, `y` is latitude.
/// Non-numeric (NaN) coordinates are a caller error; they never compare as
/// inside any bounds.
pub trait Feature {
    fn coordinates(&self) -> Point<f64>;
}

impl Feature for Point<f64> {
    #[inline]
    fn coordinates(&self) -> Point<f64> {
        *self
    }
}

impl Feature for Coord<f64> {
    #[inline]
    fn coordinates(&self) -> Point<f64> {
        Point::from(*self)
    }
}

impl Feature for gpx::Waypoint {
    #[inline]
    fn coordinates(&self) -> Point<f64> {
        self.point()
    }
}

impl<T: Feature + ?Sized> Feature for &T {
    #[inline]
    fn coordinates(&self) -> Point<f64> {
        (**self).coordinates()
    }
}

/// Collect every waypoint and track point of a GPX document as point features
///
/// Waypoints come first, then track points in track/segment order, which is the
/// order they will be stacked on the host once registered.
pub fn features_from_gpx(gpx_data: &gpx::Gpx) -> Vec<gpx::Waypoint> {
    let track_points = gpx_data
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points);

    gpx_data
        .waypoints
        .iter()
        .chain(track_points)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpx::{Gpx, Track, TrackSegment, Waypoint};

    fn create_test_waypoint(lat: f64, lon: f64) -> Waypoint {
        Waypoint::new(Point::new(lon, lat))
    }

    #[test]
    fn test_point_coordinates_are_lon_lat() {
        let point = Point::new(-0.1278, 51.5074);
        let coords = point.coordinates();
        assert_eq!(coords.x(), -0.1278);
        assert_eq!(coords.y(), 51.5074);
    }

    #[test]
    fn test_waypoint_feature() {
        let waypoint = create_test_waypoint(51.5074, -0.1278);
        let coords = waypoint.coordinates();
        assert_eq!(coords.x(), -0.1278);
        assert_eq!(coords.y(), 51.5074);
    }

    #[test]
    fn test_reference_feature() {
        let coord = Coord { x: 3.0, y: 4.0 };
        let by_ref: &Coord<f64> = &coord;
        assert_eq!(by_ref.coordinates(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_features_from_gpx_order() {
        let mut gpx = Gpx::default();
        gpx.waypoints.push(create_test_waypoint(1.0, 1.0));

        let mut track = Track::default();
        let mut segment = TrackSegment::default();
        for i in 0..3 {
            segment.points.push(create_test_waypoint(10.0 + i as f64, 20.0));
        }
        track.segments.push(segment);
        gpx.tracks.push(track);

        let features = features_from_gpx(&gpx);
        assert_eq!(features.len(), 4);
        assert_eq!(features[0].coordinates().y(), 1.0);
        assert_eq!(features[3].coordinates().y(), 12.0);
    }

    #[test]
    fn test_features_from_empty_gpx() {
        assert!(features_from_gpx(&Gpx::default()).is_empty());
    }
}
