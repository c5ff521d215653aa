//! Halo-offset indexed sequences.
//!
//! Grid quantities are addressed with signed indices where `1` is the first
//! interior point and `0`, `-1`, ... address the lower halo. [`OffsetVec`]
//! stores explicit values (stretched vertical metrics) and [`UniformRange`]
//! evaluates evenly spaced coordinates on demand (horizontal axes).

use std::fmt;
use std::ops::{Index, IndexMut, RangeInclusive};

/// Contiguous `f64` storage addressed by a signed, offset index.
///
/// # Example
///
/// ```
/// use poisson_rs::types::OffsetVec;
///
/// let z = OffsetVec::from_fn(-1..=3, |k| k as f64 * 10.0);
/// assert_eq!(z.first_index(), -1);
/// assert_eq!(z.len(), 5);
/// assert_eq!(z[0], 0.0);
/// assert_eq!(z[3], 30.0);
/// assert_eq!(z.get(4), None);
/// ```
#[derive(Clone, PartialEq)]
pub struct OffsetVec {
    data: Vec<f64>,
    first: isize,
}

impl OffsetVec {
    /// Wrap existing values so that `data[0]` has index `first`.
    pub fn new(data: Vec<f64>, first: isize) -> Self {
        Self { data, first }
    }

    /// Evaluate `f` at every index of `range`.
    pub fn from_fn(range: RangeInclusive<isize>, f: impl FnMut(isize) -> f64) -> Self {
        let first = *range.start();
        Self {
            data: range.map(f).collect(),
            first,
        }
    }

    /// Smallest valid index.
    #[inline]
    pub fn first_index(&self) -> isize {
        self.first
    }

    /// Largest valid index.
    #[inline]
    pub fn last_index(&self) -> isize {
        self.first + self.data.len() as isize - 1
    }

    /// Valid index range.
    #[inline]
    pub fn indices(&self) -> RangeInclusive<isize> {
        self.first_index()..=self.last_index()
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked lookup.
    #[inline]
    pub fn get(&self, k: isize) -> Option<f64> {
        let pos = k - self.first;
        if pos < 0 {
            return None;
        }
        self.data.get(pos as usize).copied()
    }

    /// Underlying values in index order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Values over `range` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not contained in [`indices`](Self::indices).
    pub fn slice(&self, range: RangeInclusive<isize>) -> &[f64] {
        let lo = (range.start() - self.first) as usize;
        let hi = (range.end() - self.first) as usize;
        &self.data[lo..=hi]
    }

    /// Copy of the values over a sub-range, keeping their indices.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not contained in [`indices`](Self::indices).
    pub fn restrict(&self, range: RangeInclusive<isize>) -> Self {
        let first = *range.start();
        Self {
            data: self.slice(range).to_vec(),
            first,
        }
    }

    /// Iterate `(index, value)` pairs.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (isize, f64)> + '_ {
        let first = self.first;
        self.data
            .iter()
            .enumerate()
            .map(move |(pos, &v)| (first + pos as isize, v))
    }

    #[inline]
    fn position(&self, k: isize) -> usize {
        debug_assert!(
            self.indices().contains(&k),
            "index {} outside {:?}",
            k,
            self.indices()
        );
        (k - self.first) as usize
    }
}

impl Index<isize> for OffsetVec {
    type Output = f64;

    #[inline]
    fn index(&self, k: isize) -> &f64 {
        &self.data[self.position(k)]
    }
}

impl IndexMut<isize> for OffsetVec {
    #[inline]
    fn index_mut(&mut self, k: isize) -> &mut f64 {
        let pos = self.position(k);
        &mut self.data[pos]
    }
}

impl fmt::Debug for OffsetVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetVec")
            .field("indices", &self.indices())
            .field("data", &self.data)
            .finish()
    }
}

/// Evenly spaced coordinates over a signed index range.
///
/// `value(k) = origin + (k - 1) * step`, so index `1` maps to `origin`.
///
/// ```
/// use poisson_rs::types::UniformRange;
///
/// let xf = UniformRange::new(0.0, 0.5, -1..=5);
/// assert_eq!(xf.value(1), 0.0);
/// assert_eq!(xf.value(0), -0.5);
/// assert_eq!(xf.len(), 7);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UniformRange {
    origin: f64,
    step: f64,
    first: isize,
    last: isize,
}

impl UniformRange {
    /// Create a range whose index `1` sits at `origin`.
    pub fn new(origin: f64, step: f64, indices: RangeInclusive<isize>) -> Self {
        Self {
            origin,
            step,
            first: *indices.start(),
            last: *indices.end(),
        }
    }

    /// Coordinate at index `k` (not bounds-checked; the range is affine).
    #[inline]
    pub fn value(&self, k: isize) -> f64 {
        self.origin + (k - 1) as f64 * self.step
    }

    /// Checked coordinate lookup.
    #[inline]
    pub fn get(&self, k: isize) -> Option<f64> {
        (self.first..=self.last)
            .contains(&k)
            .then(|| self.value(k))
    }

    /// Spacing between consecutive values.
    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Smallest valid index.
    #[inline]
    pub fn first_index(&self) -> isize {
        self.first
    }

    /// Largest valid index.
    #[inline]
    pub fn last_index(&self) -> isize {
        self.last
    }

    /// Number of values in the range.
    #[inline]
    pub fn len(&self) -> usize {
        (self.last - self.first + 1).max(0) as usize
    }

    /// True if the range holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialise the range.
    pub fn to_offset_vec(&self) -> OffsetVec {
        OffsetVec::from_fn(self.first..=self.last, |k| self.value(k))
    }
}
