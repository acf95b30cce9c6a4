//! Axis-aligned bounding box.

use crate::error::SpatialError;
use crate::primitives::Point2;
use num_traits::Float;

/// A 2D axis-aligned bounding box.
///
/// Defined by minimum and maximum corners. All tests treat the boundary as
/// part of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb2<F> {
    /// Minimum corner (smallest x and y values).
    pub min: Point2<F>,
    /// Maximum corner (largest x and y values).
    pub max: Point2<F>,
}

impl<F: Float> Aabb2<F> {
    /// Creates a new AABB from min and max corners.
    ///
    /// Does not validate that min <= max; see [`Aabb2::validate`].
    #[inline]
    pub fn new(min: Point2<F>, max: Point2<F>) -> Self {
        Self { min, max }
    }

    /// Creates an AABB from its four bounds.
    #[inline]
    pub fn from_bounds(xmin: F, ymin: F, xmax: F, ymax: F) -> Self {
        Self {
            min: Point2::new(xmin, ymin),
            max: Point2::new(xmax, ymax),
        }
    }

    /// Creates an AABB from two arbitrary corners.
    ///
    /// Correctly handles corners in any orientation.
    #[inline]
    pub fn from_corners(a: Point2<F>, b: Point2<F>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// The unbounded box covering the whole plane.
    #[inline]
    pub fn universe() -> Self {
        Self {
            min: Point2::new(F::neg_infinity(), F::neg_infinity()),
            max: Point2::new(F::infinity(), F::infinity()),
        }
    }

    /// Checks that no bound is NaN and that min <= max on both axes.
    pub fn validate(self) -> Result<Self, SpatialError> {
        let bounds = [self.min.x, self.min.y, self.max.x, self.max.y];
        if bounds.iter().any(|b| b.is_nan()) {
            return Err(SpatialError::invalid("rectangle has a NaN bound"));
        }
        if self.min.x > self.max.x || self.min.y > self.max.y {
            return Err(SpatialError::invalid("rectangle minimum exceeds maximum"));
        }
        Ok(self)
    }

    /// Returns `true` if this AABB contains the given point.
    #[inline]
    pub fn contains_point(self, p: Point2<F>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns `true` if this AABB intersects another AABB.
    ///
    /// Boxes that only share an edge or corner intersect.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Returns the part of this box on the low side of a split line through `at`.
    ///
    /// A vertical split clips the x range to `[min.x, at.x]`, a horizontal
    /// one clips the y range to `[min.y, at.y]`.
    #[inline]
    pub fn low_half(self, at: Point2<F>, vertical: bool) -> Self {
        let mut half = self;
        if vertical {
            half.max.x = at.x;
        } else {
            half.max.y = at.y;
        }
        half
    }

    /// Returns the part of this box on the high side of a split line through `at`.
    #[inline]
    pub fn high_half(self, at: Point2<F>, vertical: bool) -> Self {
        let mut half = self;
        if vertical {
            half.min.x = at.x;
        } else {
            half.min.y = at.y;
        }
        half
    }

    /// Returns the point of this AABB closest to `p`.
    ///
    /// Finite for a finite `p` whenever the box has no infinite bound on the
    /// side `p` lies beyond, which holds for every valid box.
    #[inline]
    pub fn closest_point(self, p: Point2<F>) -> Point2<F> {
        Point2::new(
            p.x.max(self.min.x).min(self.max.x),
            p.y.max(self.min.y).min(self.max.y),
        )
    }

    /// Returns the squared distance from a point to this AABB.
    ///
    /// Returns 0 if the point is inside the AABB.
    #[inline]
    pub fn distance_squared_to_point(self, p: Point2<F>) -> F {
        self.closest_point(p).distance_squared(p)
    }

    /// Returns the distance from a point to this AABB.
    ///
    /// Returns 0 if the point is inside the AABB.
    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        self.closest_point(p).distance(p)
    }

    /// Overflow-free distance key, see [`Point2::comparable_distance`].
    #[inline]
    pub(crate) fn comparable_distance_to_point(self, p: Point2<F>) -> F {
        self.closest_point(p).comparable_distance(p)
    }
}
