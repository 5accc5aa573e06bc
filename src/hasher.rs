//! FNV-style key hash used to place entries into slots.
//!
//! The recurrence is add-then-multiply (`h = PRIME * (h + byte)`), not the
//! xor-based FNV-1/FNV-1a orders, and bytes are sign-extended before the
//! add. Slot placement depends on this exact recurrence.

use core::hash::{BuildHasher, Hasher};

pub const OFFSET_BASIS: u64 = 2166136261;
pub const FNV_PRIME: u64 = 16777619;

/// Streaming hasher for the add-then-multiply recurrence.
#[derive(Clone, Copy, Debug)]
pub struct FnvHasher {
    state: u64,
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self {
            state: OFFSET_BASIS,
        }
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |h, &b| {
            FNV_PRIME.wrapping_mul(h.wrapping_add(b as i8 as i64 as u64))
        });
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Default `BuildHasher` for `HashList`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::default()
    }
}

/// Hash raw key bytes with the given builder.
///
/// Bytes go through a single `Hasher::write` so no length prefix or
/// terminator (as `impl Hash for str` would add) perturbs the value.
#[inline]
pub(crate) fn hash_bytes<S: BuildHasher>(builder: &S, bytes: &[u8]) -> u64 {
    let mut h = builder.build_hasher();
    h.write(bytes);
    h.finish()
}
