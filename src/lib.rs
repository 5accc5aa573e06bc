//! hash-list: an insertion-ordered hash map with integer indexing, bounded
//! capacity with hit-count eviction, and self-tuning rehash.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a string-keyed associative container whose table, collision
//!   chains, ordering and entry recycling are all implemented here, on top
//!   of a single generational arena.
//! - Layers:
//!   - EntryPool<V>: a `SlotMap` arena owning every entry, live or pooled,
//!     plus a free list capped at `POOL_CAP` entries.
//!   - ActiveList: a circular doubly-linked ring over live entries in
//!     insertion order, with a one-slot index cursor.
//!   - HashList<V, P, S>: the slot array of singly-linked chains, the
//!     lookup primitive every keyed operation goes through, eviction and
//!     rehash.
//!
//! Constraints
//! - Single-threaded: every operation runs to completion; callers sharing
//!   one instance across threads must wrap it in their own lock. The index
//!   cursor lives in a `Cell`, so `HashList` is `!Sync`.
//! - Links are arena keys, never references: a slot chain and the ring
//!   describe the same live set, and a stale key cannot alias a new entry.
//! - Table sizes come from `prime::to_prime`; automatic growth asks for
//!   `size + 31` and rounds up.
//!
//! Lookup
//! - Slot = `hash(key) % hash_size` with the FNV-style add-then-multiply
//!   recurrence in `hasher`. A hit bumps the entry's counter; with
//!   `Tuning::move_to_front` it is relinked at the chain head when hotter
//!   than its predecessor. New colliding keys are appended at the chain
//!   tail.
//! - A miss remembers whether it walked deeper than `Tuning::max_depth`.
//!   Growth is checked after every insert: occupied slots at the load
//!   ceiling, that deep miss, or average chain depth above
//!   `Tuning::avg_depth`. A zero load factor turns growth off.
//!
//! Eviction
//! - With a non-zero limit, inserting at the limit first evicts one entry:
//!   a single pass halves every non-root counter and removes the first
//!   entry with the smallest decayed counter (approximate LFU).
//!
//! Indexing
//! - `entry_at(i)` walks from the cursor when it is no farther than either
//!   end of the ring, otherwise from the root in the shorter direction.
//!   Every structural change clears the cursor.
//!
//! Non-goals
//! - No shrink on delete; the table only grows on insert or explicit
//!   `resize`.
//! - No internal synchronization.

mod active_list;
pub mod error;
pub mod hash_list;
#[cfg(test)]
mod hash_list_proptest;
pub mod hasher;
pub mod policy;
mod pool;
pub mod prime;
pub mod tuning;

// Public surface
pub use error::{HashListError, Result};
pub use hash_list::{HashList, Iter, Statistics};
pub use hasher::{FnvBuildHasher, FnvHasher};
pub use policy::{DefaultPolicy, StringPolicy, ValuePolicy};
pub use pool::POOL_CAP;
pub use prime::to_prime;
pub use tuning::Tuning;
