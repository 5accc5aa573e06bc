//! Entry storage: a generational arena plus a capped free list.
//!
//! Live and pooled entries share one `SlotMap`. Released entries are kept
//! for reuse (key buffer and value slot included) until the free list holds
//! `POOL_CAP` entries; beyond that they are dropped immediately.

use core::ops::{Index, IndexMut};
use slotmap::{DefaultKey, SlotMap};
use tracing::trace;

/// Maximum number of released entries kept for reuse.
pub const POOL_CAP: usize = 64;

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
    /// Lookup hits while live; depth in the free list while pooled.
    pub(crate) hits: usize,
    /// Next entry in the same slot chain, or the next pooled entry.
    pub(crate) link: Option<DefaultKey>,
    // Active ring neighbours. Self-referential for a detached entry.
    pub(crate) next: DefaultKey,
    pub(crate) prev: DefaultKey,
}

#[derive(Debug)]
pub(crate) struct EntryPool<V> {
    arena: SlotMap<DefaultKey, Entry<V>>,
    free: Option<DefaultKey>,
}

impl<V> EntryPool<V> {
    pub(crate) fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            free: None,
        }
    }

    /// Number of entries currently parked in the free list.
    pub(crate) fn pooled(&self) -> usize {
        self.free.map_or(0, |k| self.arena[k].hits)
    }

    /// Number of entries not parked in the free list.
    pub(crate) fn live(&self) -> usize {
        self.arena.len() - self.pooled()
    }

    /// Take an entry from the free list, or allocate one holding `empty()`.
    ///
    /// The returned entry is detached: empty key, zero hits, no chain link
    /// and ring links pointing at itself.
    pub(crate) fn acquire(&mut self, empty: impl FnOnce() -> V) -> DefaultKey {
        match self.free {
            Some(k) => {
                let e = &mut self.arena[k];
                self.free = e.link.take();
                e.hits = 0;
                k
            }
            None => self.arena.insert_with_key(|k| Entry {
                key: String::new(),
                value: empty(),
                hits: 0,
                link: None,
                next: k,
                prev: k,
            }),
        }
    }

    /// Return a detached entry. `clear` resets its value before pooling.
    ///
    /// Returns false when the free list was full and the entry was dropped.
    pub(crate) fn release(&mut self, k: DefaultKey, clear: impl FnOnce(&mut V)) -> bool {
        let depth = self.pooled();
        if depth >= POOL_CAP {
            trace!(pooled = depth, "free list full, dropping entry");
            self.arena.remove(k);
            return false;
        }
        let head = self.free;
        let e = &mut self.arena[k];
        e.key.clear();
        clear(&mut e.value);
        e.hits = depth + 1;
        e.link = head;
        e.next = k;
        e.prev = k;
        self.free = Some(k);
        true
    }

    /// Drop every entry, live and pooled.
    pub(crate) fn purge(&mut self) {
        self.arena.clear();
        self.free = None;
    }

    #[cfg(test)]
    pub(crate) fn allocated(&self) -> usize {
        self.arena.len()
    }
}

impl<V> Index<DefaultKey> for EntryPool<V> {
    type Output = Entry<V>;

    #[inline]
    fn index(&self, k: DefaultKey) -> &Entry<V> {
        &self.arena[k]
    }
}

impl<V> IndexMut<DefaultKey> for EntryPool<V> {
    #[inline]
    fn index_mut(&mut self, k: DefaultKey) -> &mut Entry<V> {
        &mut self.arena[k]
    }
}
