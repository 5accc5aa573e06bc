//! Resize and chain-ordering knobs.

/// Tunable policy of a `HashList`.
///
/// Copied along with the contents by `assign_from`/`clone`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tuning {
    /// Fraction of slots that may be occupied before a resize is forced.
    /// `0.0` disables automatic resizing; explicit `resize` still works.
    pub max_load_factor: f64,
    /// Resize when `len / occupied_slots` exceeds this average chain depth.
    pub avg_depth: Option<f64>,
    /// Resize when a failed lookup walked a chain deeper than this.
    pub max_depth: Option<usize>,
    /// Promote a hit entry toward its slot's head when it is hotter than its
    /// chain predecessor.
    pub move_to_front: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_load_factor: 1.0,
            avg_depth: None,
            max_depth: None,
            move_to_front: false,
        }
    }
}

impl Tuning {
    /// Maximum number of occupied slots for a table of `table_size` slots.
    pub(crate) fn max_occupied(&self, table_size: usize) -> usize {
        if self.max_load_factor <= 0.0 {
            return 0;
        }
        (table_size as f64 * self.max_load_factor) as usize
    }

    pub fn with_max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }

    pub fn with_avg_depth(mut self, depth: f64) -> Self {
        self.avg_depth = Some(depth);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_move_to_front(mut self, enabled: bool) -> Self {
        self.move_to_front = enabled;
        self
    }
}
