//! Curtain - viewport-driven attach/detach of point layers
//!
//! The curtain keeps a host map responsive with many point features by only
//! keeping layers attached while their feature sits inside the viewport. Each
//! item can also be suppressed by hand, which keeps it off the map no matter
//! where it is.
//!
//! Attachment is always read back from the layer itself
//! ([`RenderableLayer::is_attached`]) rather than tracked here, so every
//! attach/detach is guarded and repeated refreshes are free of host calls.

use crate::{
    Bounds, BoundsTracker, EdgePolicy, Feature, Item, ItemHandle, MapHost, Registry,
    RenderableLayer, Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the curtain
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Classification of features lying exactly on a viewport edge.
    /// Default: [`EdgePolicy::Exclusive`], edge points are hidden.
    pub edge_policy: EdgePolicy,
}

/// Visibility state of a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Manually held off the map
    Suppressed,
    /// Not suppressed and attached to the host
    Displayed,
    /// Not suppressed but not attached, usually because it is out of view
    Withheld,
}

/// Host-side work done by a single [`Curtain::refresh`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefreshStats {
    /// Items examined (not suppressed)
    pub scanned: usize,
    /// Layers attached to the host
    pub attached: usize,
    /// Layers detached from the host
    pub detached: usize,
    /// Suppressed items skipped entirely
    pub skipped_suppressed: usize,
}

impl RefreshStats {
    /// Total number of attach and detach calls issued to the host
    #[inline]
    pub fn host_calls(&self) -> usize {
        self.attached + self.detached
    }
}

/// Registry, cached bounds and visibility decisions for one host map
///
/// All operations are synchronous scans over the registry and are meant to be
/// called from the host's event loop, typically [`Curtain::refresh`] from its
/// move/zoom callbacks.
pub struct Curtain<H: MapHost, F> {
    host: H,
    registry: Registry<H::Layer, F>,
    bounds: BoundsTracker,
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<H: MapHost, F: Feature> Curtain<H, F> {
    /// Create an empty curtain over the given host with the default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Self {
        Self {
            host,
            registry: Registry::new(),
            bounds: BoundsTracker::new(),
            config,
        }
    }

    /// Register a layer for a feature
    ///
    /// The item starts out not suppressed and is left as the host has it; the
    /// next [`refresh`](Self::refresh) decides whether it is shown.
    pub fn add(&mut self, layer: H::Layer, feature: F) -> ItemHandle {
        self.registry.add(layer, feature)
    }

    /// Resnapshot the host viewport into the cache
    pub fn update_bounds(&mut self) -> Bounds {
        self.bounds.update(&self.host)
    }

    /// Check a feature against the cached bounds
    ///
    /// This does not resnapshot: call [`update_bounds`](Self::update_bounds)
    /// first if the viewport may have moved. With the default edge policy the
    /// test is strict, so a feature lying exactly on an edge is out of view.
    #[inline]
    pub fn is_in_viewport<G: Feature + ?Sized>(&self, feature: &G) -> bool {
        self.bounds
            .contains(feature.coordinates(), self.config.edge_policy)
    }

    /// Set the manual suppression flag of an item
    ///
    /// Suppressing detaches the layer right away if it is attached.
    ///
    /// Unsuppressing attaches the layer right away *without* checking the
    /// viewport, unless `defer_attach` is set. A forced layer that is out of
    /// view is detached again by the next [`refresh`](Self::refresh). With
    /// `defer_attach`, many items can be released and then placed by a single
    /// refresh.
    ///
    /// # Errors
    /// [`CurtainError::UnknownItem`](crate::CurtainError::UnknownItem) if the
    /// handle was not issued by this curtain.
    pub fn set_suppressed(
        &mut self,
        handle: ItemHandle,
        suppressed: bool,
        defer_attach: bool,
    ) -> Result<()> {
        let item = self
            .registry
            .resolve_mut(handle)
            .inspect_err(|err| tracing::warn!("Ignoring suppression change: {err}"))?;

        item.set_suppressed(suppressed);
        let layer = item.layer();

        if suppressed {
            if layer.is_attached() {
                tracing::trace!(item = handle.index(), "detaching suppressed layer");
                self.host.remove_layer(layer);
            }
        } else if !defer_attach && !layer.is_attached() {
            tracing::trace!(item = handle.index(), "forcing layer attach");
            self.host.add_layer(layer);
        }

        Ok(())
    }

    /// Release an item so it shows when in view
    ///
    /// Unless `skip_attach` is set the layer is attached immediately.
    pub fn turn_on(&mut self, handle: ItemHandle, skip_attach: bool) -> Result<()> {
        self.set_suppressed(handle, false, skip_attach)
    }

    /// Hold an item off the map even when it comes into view
    pub fn turn_off(&mut self, handle: ItemHandle) -> Result<()> {
        self.set_suppressed(handle, true, false)
    }

    /// Resnapshot the viewport and attach or detach every non-suppressed item
    ///
    /// Items come in registry order, so layers entering the view are attached
    /// in that order. Suppressed items are left untouched. Host calls only
    /// happen when an item's attachment actually has to change.
    pub fn refresh(&mut self) -> RefreshStats {
        #[cfg(feature = "profiling")]
        profiling::scope!("curtain::refresh");

        let bounds = self.bounds.update(&self.host);
        let edge_policy = self.config.edge_policy;
        let mut stats = RefreshStats::default();

        for item in &self.registry {
            if item.is_suppressed() {
                stats.skipped_suppressed += 1;
                continue;
            }
            stats.scanned += 1;

            let layer = item.layer();
            let in_view = bounds.contains(item.feature().coordinates(), edge_policy);

            match (in_view, layer.is_attached()) {
                (true, false) => {
                    tracing::trace!(item = item.handle().index(), "attaching layer");
                    self.host.add_layer(layer);
                    stats.attached += 1;
                }
                (false, true) => {
                    tracing::trace!(item = item.handle().index(), "detaching layer");
                    self.host.remove_layer(layer);
                    stats.detached += 1;
                }
                _ => {}
            }
        }

        tracing::debug!(
            scanned = stats.scanned,
            attached = stats.attached,
            detached = stats.detached,
            skipped_suppressed = stats.skipped_suppressed,
            "Curtain refreshed"
        );

        stats
    }

    /// Resnapshot the viewport and visit every item in registry order
    ///
    /// Suppressed, attached and withheld items are all visited. The callback
    /// runs while the curtain is borrowed, so it cannot re-enter it; collect
    /// handles and act on them afterwards instead.
    pub fn all<Cb>(&mut self, mut callback: Cb)
    where
        Cb: FnMut(&H::Layer, &F, &Item<H::Layer, F>),
    {
        self.bounds.update(&self.host);

        for item in &self.registry {
            callback(item.layer(), item.feature(), item);
        }
    }

    /// Resnapshot the viewport and visit the items actually on the map
    ///
    /// Visits items that are not suppressed and whose layer reports itself
    /// attached. Geometry is not re-tested, so this lags the viewport until the
    /// next [`refresh`](Self::refresh). The same re-entrancy rule as
    /// [`all`](Self::all) applies.
    pub fn each_visible<Cb>(&mut self, mut callback: Cb)
    where
        Cb: FnMut(&H::Layer, &F),
    {
        self.bounds.update(&self.host);

        for item in &self.registry {
            if !item.is_suppressed() && item.layer().is_attached() {
                callback(item.layer(), item.feature());
            }
        }
    }

    /// Current visibility state of an item
    pub fn state(&self, handle: ItemHandle) -> Result<ItemState> {
        let item = self
            .registry
            .resolve(handle)
            .inspect_err(|err| tracing::warn!("Cannot report item state: {err}"))?;

        Ok(if item.is_suppressed() {
            ItemState::Suppressed
        } else if item.layer().is_attached() {
            ItemState::Displayed
        } else {
            ItemState::Withheld
        })
    }

    /// The last viewport snapshot, if one was taken
    #[inline]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.bounds()
    }

    #[inline]
    pub fn get(&self, handle: ItemHandle) -> Option<&Item<H::Layer, F>> {
        self.registry.get(handle)
    }

    #[inline]
    pub fn registry(&self) -> &Registry<H::Layer, F> {
        &self.registry
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to pan it before a refresh
    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
