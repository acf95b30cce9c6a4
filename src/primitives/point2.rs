//! 2D point type.

use num_traits::Float;
use std::fmt;

/// A 2D point with x and y coordinates.
///
/// Generic over floating-point types (`f32` or `f64`). Equality is exact
/// coordinate equality on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Point2<F> {
    /// Creates a new point.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Creates a point at the origin (0, 0).
    #[inline]
    pub fn origin() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
        }
    }

    /// Returns `true` if both coordinates are finite (neither NaN nor infinite).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the coordinate on the x axis if `vertical`, otherwise on the y axis.
    ///
    /// A vertical split line divides the plane by x.
    #[inline]
    pub fn coord(self, vertical: bool) -> F {
        if vertical {
            self.x
        } else {
            self.y
        }
    }

    /// Computes the squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> F {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Computes the Euclidean distance to another point.
    ///
    /// Only overflows to infinity when the true distance exceeds the largest
    /// finite value.
    #[inline]
    pub fn distance(self, other: Self) -> F {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Returns a quarter of the distance to `other`, computed on coordinates
    /// scaled by 1/4.
    ///
    /// Orders point pairs like [`distance`](Self::distance) but stays finite
    /// for any two finite points. Only subnormal coordinates lose precision.
    #[inline]
    pub(crate) fn comparable_distance(self, other: Self) -> F {
        let two = F::one() + F::one();
        let quarter = (two * two).recip();
        let dx = other.x * quarter - self.x * quarter;
        let dy = other.y * quarter - self.y * quarter;
        dx.hypot(dy)
    }
}

impl<F: Float> Default for Point2<F> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<F: Float> From<(F, F)> for Point2<F> {
    fn from((x, y): (F, F)) -> Self {
        Self { x, y }
    }
}

impl<F: fmt::Display> fmt::Display for Point2<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
