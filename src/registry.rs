//! Append-only registry of (layer, feature) items
//!
//! The registry exclusively owns every item. Callers keep an [`ItemHandle`]
//! and go through the curtain to change anything, so no item is ever aliased
//! outside of a borrow of the registry itself.

use crate::{CurtainError, Result};

/// Opaque reference to an item in a [`Registry`]
///
/// Handles stay valid for the lifetime of the registry that issued them since
/// items are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(usize);

impl ItemHandle {
    /// Position of the item in registry order
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A registered feature with its layer and suppression flag
#[derive(Debug, Clone)]
pub struct Item<L, F> {
    handle: ItemHandle,
    layer: L,
    feature: F,
    suppressed: bool,
}

impl<L, F> Item<L, F> {
    #[inline]
    pub fn handle(&self) -> ItemHandle {
        self.handle
    }

    #[inline]
    pub fn layer(&self) -> &L {
        &self.layer
    }

    #[inline]
    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Whether the item is manually held off the map
    #[inline]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    #[inline]
    pub(crate) fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }
}

/// Ordered collection of items
///
/// Insertion order is the iteration order, and therefore the order layers are
/// attached (and stacked) on the host.
#[derive(Debug, Clone)]
pub struct Registry<L, F> {
    items: Vec<Item<L, F>>,
}

impl<L, F> Default for Registry<L, F> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<L, F> Registry<L, F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, initially not suppressed
    pub fn add(&mut self, layer: L, feature: F) -> ItemHandle {
        let handle = ItemHandle(self.items.len());
        self.items.push(Item {
            handle,
            layer,
            feature,
            suppressed: false,
        });
        handle
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, handle: ItemHandle) -> Option<&Item<L, F>> {
        self.items.get(handle.0)
    }

    /// Resolve a handle, rejecting ones this registry never issued
    pub(crate) fn resolve(&self, handle: ItemHandle) -> Result<&Item<L, F>> {
        let len = self.items.len();
        self.items.get(handle.0).ok_or(CurtainError::UnknownItem {
            index: handle.0,
            len,
        })
    }

    pub(crate) fn resolve_mut(&mut self, handle: ItemHandle) -> Result<&mut Item<L, F>> {
        let len = self.items.len();
        self.items.get_mut(handle.0).ok_or(CurtainError::UnknownItem {
            index: handle.0,
            len,
        })
    }

    /// All handles in registry order
    pub fn handles(&self) -> impl ExactSizeIterator<Item = ItemHandle> + '_ {
        self.items.iter().map(Item::handle)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item<L, F>> {
        self.items.iter()
    }
}

impl<'a, L, F> IntoIterator for &'a Registry<L, F> {
    type Item = &'a Item<L, F>;
    type IntoIter = std::slice::Iter<'a, Item<L, F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry: Registry<u32, (f64, f64)> = Registry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_returns_sequential_handles() {
        let mut registry = Registry::new();
        let a = registry.add("a", 1);
        let b = registry.add("b", 2);

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(b).map(|item| *item.layer()), Some("b"));
    }

    #[test]
    fn test_new_items_are_not_suppressed() {
        let mut registry = Registry::new();
        let handle = registry.add((), ());
        assert!(!registry.get(handle).unwrap().is_suppressed());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut registry = Registry::new();
        registry.add("same", 1);
        registry.add("same", 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut registry = Registry::new();
        for i in 0..5 {
            registry.add(i, i * 10);
        }

        let features: Vec<i32> = registry.iter().map(|item| *item.feature()).collect();
        assert_eq!(features, vec![0, 10, 20, 30, 40]);

        let handles: Vec<usize> = registry.handles().map(ItemHandle::index).collect();
        assert_eq!(handles, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut big = Registry::new();
        big.add((), ());
        let foreign = big.add((), ());

        let mut small: Registry<(), ()> = Registry::new();
        small.add((), ());

        assert!(small.get(foreign).is_none());
        match small.resolve(foreign) {
            Err(CurtainError::UnknownItem { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected UnknownItem, got {:?}", other.map(|_| ())),
        }
    }
}
