//! Value-ownership strategies.
//!
//! A `ValuePolicy` decides what an "empty" value is, how a value is stored
//! into an entry, and how an entry's value is reset when the entry goes back
//! to the free pool. The policy is chosen per container at construction.

/// Strategy for storing and resetting values held by entries.
pub trait ValuePolicy<V> {
    /// The value a get-or-create access inserts, and the initial value of a
    /// freshly allocated entry.
    fn empty(&self) -> V;

    /// Store `value` into an entry's value slot.
    fn set(&self, slot: &mut V, value: V) {
        *slot = value;
    }

    /// Reset an entry's value before the entry is pooled.
    fn clear(&self, slot: &mut V) {
        *slot = self.empty();
    }
}

/// Assignment semantics: `set` overwrites, `clear` resets to `V::default()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl<V: Default> ValuePolicy<V> for DefaultPolicy {
    #[inline]
    fn empty(&self) -> V {
        V::default()
    }
}

/// Owned-string values whose buffers survive pooling.
///
/// `set` copies into the buffer already held by the entry and `clear`
/// truncates without freeing, so recycled entries reuse their allocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringPolicy;

impl ValuePolicy<String> for StringPolicy {
    #[inline]
    fn empty(&self) -> String {
        String::new()
    }

    fn set(&self, slot: &mut String, value: String) {
        if slot.capacity() >= value.len() {
            slot.clear();
            slot.push_str(&value);
        } else {
            *slot = value;
        }
    }

    fn clear(&self, slot: &mut String) {
        slot.clear();
    }
}
