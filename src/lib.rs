//! Map Curtain - Viewport-Driven Layer Visibility for Point Features
//!
//! This library keeps a map with many point features responsive by attaching
//! each feature's layer to the host canvas only while the feature lies inside
//! the visible viewport. Everything outside the viewport sits behind the
//! "curtain". Items can additionally be suppressed by hand, which keeps them
//! off the map regardless of where they are.
//!
//! # Architecture
//!
//! - **[`Registry`]**: Append-only, ordered storage of (layer, feature) items
//! - **[`BoundsTracker`]**: Cached snapshot of the host viewport
//! - **[`Curtain`]**: Inclusion test and idempotent attach/detach decisions
//! - **[`MapHost`]**, **[`RenderableLayer`]**, **[`Feature`]**: What the host must provide
//!
//! # Usage
//!
//! Register layers once, then call [`Curtain::refresh`] from the host's
//! move/zoom callbacks:
//!
//! ```ignore
//! let mut curtain = Curtain::new(map);
//! for waypoint in map_curtain::features_from_gpx(&gpx) {
//!     let marker = build_marker(&waypoint);
//!     curtain.add(marker, waypoint);
//! }
//! curtain.refresh();
//! ```
//!
//! # Performance Characteristics
//!
//! - **Add**: O(1) amortized
//! - **Refresh / iteration**: O(N) linear scan, host calls only on state changes

mod bounds;
mod curtain;
mod host;
mod registry;

#[cfg(test)]
mod test_support;

// Public API exports
pub use bounds::{Bounds, BoundsTracker, EdgePolicy, LatLng};
pub use curtain::{Config, Curtain, ItemState, RefreshStats};
pub use host::{Feature, MapHost, RenderableLayer, features_from_gpx};
pub use registry::{Item, ItemHandle, Registry};

/// Error types for the curtain
#[derive(Debug, thiserror::Error)]
pub enum CurtainError {
    #[error("Unknown item #{index} (registry holds {len} items)")]
    UnknownItem { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, CurtainError>;
