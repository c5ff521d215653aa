//! Horizontal domain intervals.

use std::fmt;

/// A closed interval `[start, end]` along one horizontal axis.
///
/// Construction does not validate; the grid builder rejects intervals with
/// non-positive or non-finite length.
///
/// ```
/// use poisson_rs::types::Interval;
///
/// let x = Interval::new(-2.0, 2.0);
/// assert_eq!(x.length(), 4.0);
/// assert_eq!(x.midpoint(), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Lower end (first face).
    pub start: f64,
    /// Upper end (last face).
    pub end: f64,
}

impl Interval {
    /// Create an interval.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Interval `[0, length]`.
    pub fn from_length(length: f64) -> Self {
        Self::new(0.0, length)
    }

    /// Length `end - start`.
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Midpoint of the interval.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Check if a coordinate is inside the interval (inclusive).
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
