//! HeightIndex - O(log n) prefix sums over item heights via Fenwick tree
//!
//! Lets the recycler map a scroll offset (in rows) to the item covering it
//! without walking every item above the viewport.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `offset_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `get` / `len` / `total`: O(1)

/// Cumulative heights for a fixed-length sequence of items.
///
/// Sized once per item sequence; the recycler rebuilds it whenever the
/// adapter's items are replaced.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage, same length as `heights`.
    tree: Vec<isize>,
    /// Plain per-item heights, for O(1) reads and delta computation.
    heights: Vec<usize>,
    /// Sum of `heights`.
    total: usize,
}

impl HeightIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index of `len` items, each `height` rows tall.
    ///
    /// ```
    /// # use polyview::host::height_index::HeightIndex;
    /// let index = HeightIndex::with_len(4, 2);
    /// assert_eq!(index.len(), 4);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn with_len(len: usize, height: usize) -> Self {
        let mut tree = vec![0isize; len];
        for i in 0..len {
            fenwick::array::update(&mut tree, i, height as isize);
        }
        Self {
            tree,
            heights: vec![height; len],
            total: len * height,
        }
    }

    /// Height of item `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Sets the height of item `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// ```
    /// # use polyview::host::height_index::HeightIndex;
    /// let mut index = HeightIndex::with_len(3, 1);
    /// index.set(1, 5);
    /// assert_eq!(index.prefix_sum(1), 6);
    /// assert_eq!(index.total(), 7);
    /// ```
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let current = self.heights[index];
        if current == height {
            return;
        }
        let delta = height as isize - current as isize;
        fenwick::array::update(&mut self.tree, index, delta);
        self.heights[index] = height;
        self.total = self.total - current + height;
    }

    /// Cumulative height up to and including item `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// First row occupied by item `index` (cumulative height before it).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn offset_of(&self, index: usize) -> usize {
        self.prefix_sum(index) - self.heights[index]
    }

    /// Index of the item covering row `value`: the first index whose
    /// `prefix_sum` exceeds it.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// ```
    /// # use polyview::host::height_index::HeightIndex;
    /// let mut index = HeightIndex::with_len(3, 1);
    /// index.set(0, 10); // [0..10)
    /// index.set(1, 20); // [10..30)
    /// index.set(2, 15); // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(9), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        if value >= self.total {
            return None;
        }

        let mut left = 0;
        let mut right = self.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all items.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}
