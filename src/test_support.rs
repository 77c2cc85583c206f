//! In-memory host map and layers for tests

use crate::{Bounds, MapHost, RenderableLayer};
use std::cell::Cell;
use std::rc::Rc;

/// Install a test-friendly tracing subscriber once per process
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Layer whose attachment flag is shared with the fake map
#[derive(Debug, Clone)]
pub struct FakeLayer {
    id: usize,
    attached: Rc<Cell<bool>>,
}

impl FakeLayer {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            attached: Rc::new(Cell::new(false)),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Change attachment behind the curtain's back, as a host might
    pub fn force_attached(&self, attached: bool) {
        self.attached.set(attached);
    }
}

impl RenderableLayer for FakeLayer {
    fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Add(usize),
    Remove(usize),
}

/// Map that records every attach/detach and rejects redundant ones
#[derive(Debug)]
pub struct FakeMap {
    bounds: Bounds,
    calls: Vec<HostCall>,
}

impl FakeMap {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            calls: Vec::new(),
        }
    }

    pub fn pan_to(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }
}

impl MapHost for FakeMap {
    type Layer = FakeLayer;

    fn add_layer(&mut self, layer: &FakeLayer) {
        assert!(!layer.is_attached(), "layer {} attached twice", layer.id);
        layer.attached.set(true);
        self.calls.push(HostCall::Add(layer.id));
    }

    fn remove_layer(&mut self, layer: &FakeLayer) {
        assert!(layer.is_attached(), "layer {} was not attached", layer.id);
        layer.attached.set(false);
        self.calls.push(HostCall::Remove(layer.id));
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}
