//! HashList: slot chains for lookup, an active ring for order and indexing.
//!
//! Each live entry sits in exactly one slot chain (`hash(key) % hash_size`)
//! and in the active ring. Both views are index links into one arena, so
//! splicing is O(1) and no link can dangle.

use crate::active_list::{ActiveList, Walk};
use crate::error::{HashListError, Result};
use crate::hasher::{hash_bytes, FnvBuildHasher};
use crate::policy::{DefaultPolicy, ValuePolicy};
use crate::pool::EntryPool;
use crate::prime::to_prime;
use crate::tuning::Tuning;
use core::fmt;
use core::hash::BuildHasher;
use slotmap::DefaultKey;
use tracing::{debug, trace};

/// Added to the current size on automatic growth before rounding to a prime.
const GROW_STEP: usize = 31;

/// Outcome of a chain walk.
#[derive(Clone, Copy, Debug)]
struct Probe {
    slot: usize,
    /// Chain predecessor of `found`, or the chain tail on a miss.
    prev: Option<DefaultKey>,
    found: Option<DefaultKey>,
}

/// Snapshot of slot-array shape.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    /// Occupied slots / total slots.
    pub density: f64,
    /// Entries per occupied slot.
    pub avg_depth: f64,
    /// Longest chain.
    pub max_depth: usize,
}

/// Insertion-ordered hash list with indexed access and hit-count eviction.
///
/// Keys are strings compared byte for byte. Every successful lookup bumps
/// the entry's hit counter, which drives eviction when a limit is set and,
/// with `Tuning::move_to_front`, reorders collision chains.
pub struct HashList<V, P = DefaultPolicy, S = FnvBuildHasher> {
    policy: P,
    hasher: S,
    slots: Vec<Option<DefaultKey>>,
    entries: EntryPool<V>,
    active: ActiveList,
    limit: usize,
    occupied: usize,
    max_occupied: usize,
    // Set by the last missed lookup, read by the growth check.
    over_max_depth: bool,
    tuning: Tuning,
}

impl<V: Default> HashList<V> {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Table sized to the first prime `>= hash_size`; `limit` caps the number
    /// of entries (0 means unbounded).
    pub fn with_capacity(hash_size: usize, limit: usize) -> Self {
        Self::with_parts(hash_size, limit, DefaultPolicy, FnvBuildHasher)
    }
}

impl<V: Default> Default for HashList<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` in active-list order.
pub struct Iter<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|(_, e)| (e.key.as_str(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

// Accessors that never hash or call into the policy.
impl<V, P, S> HashList<V, P, S> {
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.len() == 0
    }

    /// Entry cap that triggers eviction; 0 when unbounded.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of slots in the table (always a sizer result).
    pub fn hash_size(&self) -> usize {
        self.slots.len()
    }

    /// Fraction of slots holding at least one entry.
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.slots.len() as f64
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.max_occupied = tuning.max_occupied(self.slots.len());
        self.tuning = tuning;
    }

    pub fn max_load_factor(&self) -> f64 {
        self.tuning.max_load_factor
    }

    /// `0.0` turns automatic growth off.
    pub fn set_max_load_factor(&mut self, factor: f64) {
        self.tuning.max_load_factor = factor;
        self.max_occupied = self.tuning.max_occupied(self.slots.len());
    }

    pub fn set_move_to_front(&mut self, enabled: bool) {
        self.tuning.move_to_front = enabled;
    }

    /// Released entries currently held for reuse.
    pub fn pooled(&self) -> usize {
        self.entries.pooled()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            walk: self.active.walk(&self.entries),
        }
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Key and value at position `index` of the active list.
    ///
    /// Sequential or nearby positions are resolved from the previous call's
    /// position, so a forward scan costs O(1) per step.
    pub fn entry_at(&self, index: usize) -> Result<(&str, &V)> {
        let k = self.active.nth(&self.entries, index)?;
        let e = &self.entries[k];
        Ok((e.key.as_str(), &e.value))
    }

    pub fn key_at(&self, index: usize) -> Result<&str> {
        self.entry_at(index).map(|(k, _)| k)
    }

    pub fn value_at(&self, index: usize) -> Result<&V> {
        self.entry_at(index).map(|(_, v)| v)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Result<&mut V> {
        let k = self.active.nth(&self.entries, index)?;
        Ok(&mut self.entries[k].value)
    }

    /// Chain-shape snapshot over the whole slot array.
    pub fn statistics(&self) -> Statistics {
        let mut total = 0;
        let mut max_depth = 0;
        for head in &self.slots {
            let mut depth = 0;
            let mut cur = *head;
            while let Some(k) = cur {
                depth += 1;
                cur = self.entries[k].link;
            }
            max_depth = max_depth.max(depth);
            total += depth;
        }
        debug_assert_eq!(total, self.len(), "slot chains disagree with active list");

        if total == 0 {
            return Statistics::default();
        }
        Statistics {
            density: self.occupied as f64 / self.slots.len() as f64,
            avg_depth: self.len() as f64 / self.occupied as f64,
            max_depth,
        }
    }

    /// Drop every live and pooled entry immediately.
    pub fn release_all(&mut self) {
        debug!(
            len = self.len(),
            pooled = self.entries.pooled(),
            "releasing all entries"
        );
        self.entries.purge();
        self.active.reset();
        self.slots.fill(None);
        self.occupied = 0;
    }
}

impl<V, P, S> HashList<V, P, S>
where
    P: ValuePolicy<V>,
    S: BuildHasher,
{
    /// Construct with an explicit value policy and hasher.
    pub fn with_parts(hash_size: usize, limit: usize, policy: P, hasher: S) -> Self {
        Self::with_table(to_prime(hash_size), limit, policy, hasher)
    }

    fn with_table(size: usize, limit: usize, policy: P, hasher: S) -> Self {
        let tuning = Tuning::default();
        Self {
            policy,
            hasher,
            slots: vec![None; size],
            entries: EntryPool::new(),
            active: ActiveList::new(),
            limit,
            occupied: 0,
            max_occupied: tuning.max_occupied(size),
            over_max_depth: false,
            tuning,
        }
    }

    #[inline]
    fn slot_of(&self, key: &str) -> usize {
        (hash_bytes(&self.hasher, key.as_bytes()) % self.slots.len() as u64) as usize
    }

    /// The lookup primitive behind every keyed operation.
    ///
    /// A hit bumps the entry's counter and, with move-to-front enabled,
    /// relinks it at the chain head when it is now hotter than its
    /// predecessor. A miss records whether the chain walked was deeper than
    /// `Tuning::max_depth`.
    fn locate(&mut self, key: &str) -> Probe {
        let slot = self.slot_of(key);
        let mut prev = None;
        let mut cur = self.slots[slot];
        let mut depth = 0;

        while let Some(k) = cur {
            let e = &mut self.entries[k];
            if e.key == key {
                e.hits += 1;
                let hits = e.hits;
                if let Some(p) = prev {
                    if self.tuning.move_to_front && hits > self.entries[p].hits {
                        let after = self.entries[k].link;
                        self.entries[p].link = after;
                        self.entries[k].link = self.slots[slot];
                        self.slots[slot] = Some(k);
                        prev = None;
                    }
                }
                return Probe {
                    slot,
                    prev,
                    found: Some(k),
                };
            }
            prev = Some(k);
            cur = e.link;
            depth += 1;
        }

        self.over_max_depth = self.tuning.max_depth.is_some_and(|max| depth > max);
        Probe {
            slot,
            prev,
            found: None,
        }
    }

    /// Chain position of a live entry, without counting a hit.
    fn probe_entry(&self, k: DefaultKey) -> Probe {
        let slot = self.slot_of(&self.entries[k].key);
        let mut prev = None;
        let mut cur = self.slots[slot];
        while let Some(c) = cur {
            if c == k {
                break;
            }
            prev = Some(c);
            cur = self.entries[c].link;
        }
        debug_assert_eq!(cur, Some(k), "live entry missing from its slot chain");
        Probe {
            slot,
            prev,
            found: cur,
        }
    }

    fn chain_tail(&self, slot: usize) -> Option<DefaultKey> {
        let mut tail = None;
        let mut cur = self.slots[slot];
        while let Some(k) = cur {
            tail = Some(k);
            cur = self.entries[k].link;
        }
        tail
    }

    /// Unlink a probed entry from its chain and the ring, then pool it.
    fn detach(&mut self, probe: Probe) -> bool {
        let Some(k) = probe.found else {
            return false;
        };
        let after = self.entries[k].link;
        match probe.prev {
            None => {
                self.slots[probe.slot] = after;
                if after.is_none() {
                    self.occupied -= 1;
                }
            }
            Some(p) => self.entries[p].link = after,
        }
        self.active.unlink(&mut self.entries, k);
        let policy = &self.policy;
        self.entries.release(k, |v| policy.clear(v));
        true
    }

    /// Link a new entry for a key the probe missed. Evicts first when at the
    /// limit and grows the table afterwards if the heuristics fire.
    fn insert_new(&mut self, probe: Probe, key: &str, value: V) -> DefaultKey {
        let mut tail = probe.prev;
        if self.limit > 0 && self.len() >= self.limit && self.evict_one() {
            // The victim may have been this chain's tail.
            tail = self.chain_tail(probe.slot);
        }

        let policy = &self.policy;
        let k = self.entries.acquire(|| policy.empty());
        self.active.push_back(&mut self.entries, k);
        match tail {
            None => {
                self.slots[probe.slot] = Some(k);
                self.occupied += 1;
            }
            Some(t) => self.entries[t].link = Some(k),
        }

        let e = &mut self.entries[k];
        e.key.push_str(key);
        e.link = None;
        e.hits = 0;
        self.policy.set(&mut e.value, value);

        if self.should_grow() {
            self.resize(self.slots.len() + GROW_STEP);
        }
        k
    }

    fn should_grow(&self) -> bool {
        if self.max_occupied == 0 {
            return false;
        }
        self.over_max_depth
            || self.occupied >= self.max_occupied
            || self
                .tuning
                .avg_depth
                .is_some_and(|avg| self.len() as f64 > self.occupied as f64 * avg)
    }

    /// Insert `key` if absent. Returns false, leaving the stored value
    /// untouched, when the key already exists.
    pub fn add(&mut self, key: &str, value: V) -> bool {
        let probe = self.locate(key);
        if probe.found.is_some() {
            return false;
        }
        self.insert_new(probe, key, value);
        true
    }

    /// Whether `key` is present. Counts as a hit.
    pub fn find(&mut self, key: &str) -> bool {
        self.locate(key).found.is_some()
    }

    pub fn get(&mut self, key: &str) -> Option<&V> {
        let k = self.locate(key).found?;
        Some(&self.entries[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let k = self.locate(key).found?;
        Some(&mut self.entries[k].value)
    }

    /// Value for `key`, inserting the policy's empty value when absent.
    ///
    /// A created entry is looked up once more, so it starts with one hit.
    pub fn get_or_insert_empty(&mut self, key: &str) -> &mut V {
        let probe = self.locate(key);
        let k = match probe.found {
            Some(k) => k,
            None => {
                let empty = self.policy.empty();
                let k = self.insert_new(probe, key, empty);
                self.locate(key).found.unwrap_or(k)
            }
        };
        &mut self.entries[k].value
    }

    pub fn delete(&mut self, key: &str) -> bool {
        let probe = self.locate(key);
        self.detach(probe)
    }

    /// Delete the entry at active-list position `index`.
    pub fn delete_at(&mut self, index: usize) -> Result<bool> {
        let k = self.active.nth(&self.entries, index)?;
        let probe = self.probe_entry(k);
        Ok(self.detach(probe))
    }

    /// Active-list position of `key`, or `None` when absent.
    pub fn index_of(&mut self, key: &str) -> Result<Option<usize>> {
        let Some(k) = self.locate(key).found else {
            return Ok(None);
        };
        match self.active.position(&self.entries, k) {
            Some(i) => Ok(Some(i)),
            None => Err(HashListError::Corrupted {
                key: key.to_string(),
            }),
        }
    }

    /// Evict one entry chosen by decayed hit count.
    ///
    /// One pass over the active list: every entry but the root has its
    /// counter halved, and the first entry whose halved counter is strictly
    /// below the running minimum (seeded with the root's undecayed counter)
    /// becomes the victim. Returns false when empty.
    pub fn evict_one(&mut self) -> bool {
        let Some(root) = self.active.root() else {
            return false;
        };
        let mut victim = root;
        let mut least = self.entries[root].hits;
        let mut k = self.entries[root].next;
        while k != root {
            let e = &mut self.entries[k];
            e.hits >>= 1;
            if e.hits < least {
                victim = k;
                least = e.hits;
            }
            k = e.next;
        }
        trace!(
            key = %self.entries[victim].key,
            hits = least,
            len = self.len(),
            "evicting least used entry"
        );
        let probe = self.probe_entry(victim);
        self.detach(probe)
    }

    /// Rehash into a table of `to_prime(hash_size)` slots.
    ///
    /// Returns false if that is the current size. Entries keep their
    /// active-list order.
    pub fn resize(&mut self, hash_size: usize) -> bool {
        let size = to_prime(hash_size);
        if size == self.slots.len() {
            return false;
        }
        debug!(from = self.slots.len(), to = size, len = self.len(), "rehashing");

        self.slots.clear();
        self.slots.resize(size, None);
        self.occupied = 0;
        self.max_occupied = self.tuning.max_occupied(size);
        self.active.invalidate();

        // Walk the ring tail to root, pushing each entry onto its chain head.
        if let Some(root) = self.active.root() {
            let mut k = root;
            loop {
                k = self.entries[k].prev;
                let slot = self.slot_of(&self.entries[k].key);
                let head = self.slots[slot];
                if head.is_none() {
                    self.occupied += 1;
                }
                self.entries[k].link = head;
                self.slots[slot] = Some(k);
                if k == root {
                    break;
                }
            }
        }
        true
    }

    /// Release every entry through the free pool.
    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing hash list");
        while let Some(root) = self.active.root() {
            self.active.unlink(&mut self.entries, root);
            let policy = &self.policy;
            self.entries.release(root, |v| policy.clear(v));
        }
        self.active.reset();
        self.slots.fill(None);
        self.occupied = 0;
    }

    /// Replace contents with `source`'s, in `source`'s order, and adopt its
    /// tuning. Table size and limit are kept.
    pub fn assign_from(&mut self, source: &Self)
    where
        V: Clone,
    {
        self.set_tuning(source.tuning.clone());
        self.clear();
        for (key, value) in source.iter() {
            self.add(key, value.clone());
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use crate::pool::POOL_CAP;
        use std::collections::HashSet;

        let ring: Vec<DefaultKey> = self.active.walk(&self.entries).map(|(k, _)| k).collect();
        assert_eq!(ring.len(), self.len());
        for &k in &ring {
            let e = &self.entries[k];
            assert_eq!(self.entries[e.next].prev, k, "ring next/prev disagree");
        }
        if let Some(root) = self.active.root() {
            let last = *ring.last().expect("non-empty ring");
            assert_eq!(self.entries[last].next, root, "ring does not close");
        }

        let mut chained = HashSet::new();
        let mut occupied = 0;
        for (slot, head) in self.slots.iter().enumerate() {
            if head.is_some() {
                occupied += 1;
            }
            let mut cur = *head;
            while let Some(k) = cur {
                assert_eq!(self.slot_of(&self.entries[k].key), slot, "entry in wrong slot");
                assert!(chained.insert(k), "entry chained twice");
                cur = self.entries[k].link;
            }
        }
        assert_eq!(occupied, self.occupied);
        let ring_set: HashSet<_> = ring.iter().copied().collect();
        assert_eq!(chained, ring_set, "chains and ring hold different entries");

        let keys: HashSet<&str> = self.keys().collect();
        assert_eq!(keys.len(), self.len(), "duplicate keys");

        assert!(self.entries.pooled() <= POOL_CAP);
        assert_eq!(self.entries.live(), self.len());
        assert_eq!(self.entries.allocated(), self.len() + self.entries.pooled());
        assert_eq!(self.slots.len(), to_prime(self.slots.len()));
    }
}

impl<V, P, S> Clone for HashList<V, P, S>
where
    V: Clone,
    P: ValuePolicy<V> + Clone,
    S: BuildHasher + Clone,
{
    /// Same table size and limit, then `assign_from`.
    fn clone(&self) -> Self {
        let mut out = Self::with_table(
            self.slots.len(),
            self.limit,
            self.policy.clone(),
            self.hasher.clone(),
        );
        out.assign_from(self);
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.limit = source.limit;
        self.resize(source.slots.len());
        self.assign_from(source);
    }
}

impl<V: fmt::Debug, P, S> fmt::Debug for HashList<V, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V, P, S> IntoIterator for &'a HashList<V, P, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V, P, S> Extend<(String, V)> for HashList<V, P, S>
where
    P: ValuePolicy<V>,
    S: BuildHasher,
{
    /// Duplicate keys keep their first value.
    fn extend<I: IntoIterator<Item = (String, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(&key, value);
        }
    }
}

impl<V: Default> FromIterator<(String, V)> for HashList<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut list = HashList::new();
        list.extend(iter);
        list
    }
}
