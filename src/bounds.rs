//! Viewport bounds and the cached snapshot the curtain tests against

use crate::MapHost;
use geo::{Coord, Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// How points lying exactly on a viewport edge are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgePolicy {
    /// Edge points are outside the viewport (strict inequality)
    #[default]
    Exclusive,
    /// Edge points are inside the viewport
    Inclusive,
}

/// Rectangular lat/lng window visible on the map
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

impl Bounds {
    #[inline]
    pub fn new(southwest: LatLng, northeast: LatLng) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Check whether a `(lon, lat)` point falls inside these bounds
    ///
    /// Corners are taken as given: bounds whose southwest corner is not south
    /// and west of the northeast one contain nothing. NaN coordinates are never
    /// contained.
    #[inline(always)]
    pub fn contains(&self, point: Point<f64>, edge_policy: EdgePolicy) -> bool {
        let (lon, lat) = (point.x(), point.y());
        let (sw, ne) = (self.southwest, self.northeast);

        match edge_policy {
            EdgePolicy::Exclusive => {
                lat > sw.lat && lat < ne.lat && lon > sw.lng && lon < ne.lng
            }
            EdgePolicy::Inclusive => {
                lat >= sw.lat && lat <= ne.lat && lon >= sw.lng && lon <= ne.lng
            }
        }
    }
}

impl From<Rect<f64>> for Bounds {
    /// `x` is longitude and `y` is latitude. The rect's corners are already
    /// normalised, so the result is never inverted.
    fn from(rect: Rect<f64>) -> Self {
        Self {
            southwest: LatLng::new(rect.min().y, rect.min().x),
            northeast: LatLng::new(rect.max().y, rect.max().x),
        }
    }
}

impl From<Bounds> for Rect<f64> {
    fn from(bounds: Bounds) -> Self {
        Rect::new(
            Coord {
                x: bounds.southwest.lng,
                y: bounds.southwest.lat,
            },
            Coord {
                x: bounds.northeast.lng,
                y: bounds.northeast.lat,
            },
        )
    }
}

/// Cached snapshot of the host viewport
///
/// The snapshot is replaced wholesale on every update. Until the first update
/// there is no snapshot and nothing is considered in view.
#[derive(Debug, Clone, Default)]
pub struct BoundsTracker {
    cached: Option<Bounds>,
}

impl BoundsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the host for its viewport and overwrite the cached bounds
    #[inline]
    pub fn update<H: MapHost + ?Sized>(&mut self, host: &H) -> Bounds {
        let bounds = host.bounds();
        self.cached = Some(bounds);
        bounds
    }

    /// The last snapshot taken, if any
    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.cached
    }

    /// Test a point against the cached bounds without resnapshotting
    #[inline]
    pub fn contains(&self, point: Point<f64>, edge_policy: EdgePolicy) -> bool {
        self.cached
            .is_some_and(|bounds| bounds.contains(point, edge_policy))
    }
}
