//! Active list: a circular doubly-linked ring threading every live entry in
//! insertion order, with a one-slot cursor for cheap nearby index lookups.
//!
//! The ring stores only its root and length; links live in the entries
//! themselves (`Entry::next`/`Entry::prev`). Every structural change clears
//! the cursor so a cached position is never followed after a mutation.

use crate::error::{HashListError, Result};
use crate::pool::{Entry, EntryPool};
use core::cell::Cell;
use slotmap::DefaultKey;

#[derive(Debug, Default)]
pub(crate) struct ActiveList {
    root: Option<DefaultKey>,
    len: usize,
    // Last resolved (index, entry).
    cursor: Cell<Option<(usize, DefaultKey)>>,
}

impl ActiveList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn root(&self) -> Option<DefaultKey> {
        self.root
    }

    #[inline]
    pub(crate) fn invalidate(&self) {
        self.cursor.set(None);
    }

    /// Forget every member without touching the entries.
    pub(crate) fn reset(&mut self) {
        self.root = None;
        self.len = 0;
        self.invalidate();
    }

    /// Append a detached entry at the tail (just before the root).
    pub(crate) fn push_back<V>(&mut self, pool: &mut EntryPool<V>, k: DefaultKey) {
        match self.root {
            None => {
                pool[k].next = k;
                pool[k].prev = k;
                self.root = Some(k);
            }
            Some(head) => {
                let tail = pool[head].prev;
                pool[k].next = head;
                pool[k].prev = tail;
                pool[tail].next = k;
                pool[head].prev = k;
            }
        }
        self.len += 1;
        self.invalidate();
    }

    /// Splice a member out of the ring, leaving it self-linked.
    pub(crate) fn unlink<V>(&mut self, pool: &mut EntryPool<V>, k: DefaultKey) {
        let next = pool[k].next;
        if next == k {
            debug_assert_eq!(self.root, Some(k));
            self.root = None;
            self.len = 0;
        } else {
            let prev = pool[k].prev;
            pool[next].prev = prev;
            pool[prev].next = next;
            if self.root == Some(k) {
                self.root = Some(next);
            }
            self.len -= 1;
        }
        pool[k].next = k;
        pool[k].prev = k;
        self.invalidate();
    }

    /// Resolve a position to its entry.
    ///
    /// Walks from the cached cursor when it is no farther than either end of
    /// the ring, otherwise from the root in whichever direction is shorter.
    pub(crate) fn nth<V>(&self, pool: &EntryPool<V>, index: usize) -> Result<DefaultKey> {
        let out_of_range = HashListError::OutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }
        let root = self.root.ok_or(out_of_range)?;

        if let Some((last, cached)) = self.cursor.get() {
            let distance = index.abs_diff(last);
            if distance <= index && distance <= self.len - index {
                let found = if index >= last {
                    forward(pool, cached, distance)
                } else {
                    backward(pool, cached, distance)
                };
                self.cursor.set(Some((index, found)));
                return Ok(found);
            }
        }

        let found = if index <= self.len / 2 {
            forward(pool, root, index)
        } else {
            backward(pool, root, self.len - index)
        };
        self.cursor.set(Some((index, found)));
        Ok(found)
    }

    /// Position of a member, counted by walking `prev` links to the root.
    ///
    /// Returns `None` if the root is not reached within `len` steps, which
    /// means the ring is corrupt.
    pub(crate) fn position<V>(&self, pool: &EntryPool<V>, k: DefaultKey) -> Option<usize> {
        let root = self.root?;
        let mut cur = k;
        let mut steps = 0;
        while cur != root {
            cur = pool[cur].prev;
            steps += 1;
            if steps >= self.len {
                return None;
            }
        }
        self.cursor.set(Some((steps, k)));
        Some(steps)
    }

    /// Members in ring order starting at the root.
    pub(crate) fn walk<'a, V>(&self, pool: &'a EntryPool<V>) -> Walk<'a, V> {
        Walk {
            pool,
            next: self.root,
            remaining: self.len,
        }
    }
}

fn forward<V>(pool: &EntryPool<V>, mut k: DefaultKey, steps: usize) -> DefaultKey {
    for _ in 0..steps {
        k = pool[k].next;
    }
    k
}

fn backward<V>(pool: &EntryPool<V>, mut k: DefaultKey, steps: usize) -> DefaultKey {
    for _ in 0..steps {
        k = pool[k].prev;
    }
    k
}

/// Iterator over ring members, yielding each entry exactly once.
pub(crate) struct Walk<'a, V> {
    pool: &'a EntryPool<V>,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Walk<'a, V> {
    type Item = (DefaultKey, &'a Entry<V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.next?;
        let e = &self.pool[k];
        self.next = Some(e.next);
        self.remaining -= 1;
        Some((k, e))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Walk<'a, V> {}
