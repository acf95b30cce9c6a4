//! Ordered point table without spatial pruning.
//!
//! [`PointTable`] offers the same insert / lookup / range / nearest contract
//! as [`KdTree`](super::KdTree) on top of a plain ordered map. Range and
//! nearest queries scan every entry, which makes it a simple reference to
//! check the tree against and a baseline for benchmarks.

use crate::bounds::Aabb2;
use crate::error::SpatialError;
use crate::primitives::Point2;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Map key ordering points by y, then by x.
///
/// Only finite points are stored, so the partial order is total here.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PointKey<F>(Point2<F>);

impl<F: Float> Eq for PointKey<F> {}

impl<F: Float> PartialOrd for PointKey<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for PointKey<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.0, other.0);
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    }
}

/// An ordered symbol table from points to values.
#[derive(Debug, Clone)]
pub struct PointTable<F, V> {
    entries: BTreeMap<PointKey<F>, V>,
}

impl<F: Float, V> Default for PointTable<F, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, V> PointTable<F, V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        PointTable {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the number of distinct points in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Associates `value` with `point`, returning the previous value if any.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if either coordinate is NaN or infinite.
    pub fn insert(&mut self, point: Point2<F>, value: V) -> Result<Option<V>, SpatialError> {
        if !point.is_finite() {
            return Err(SpatialError::invalid("point has a non-finite coordinate"));
        }
        Ok(self.entries.insert(PointKey(point), value))
    }

    /// Returns the value stored at `point`, if any.
    pub fn get(&self, point: Point2<F>) -> Option<&V> {
        // NaN would compare equal to everything under the key ordering
        if !point.is_finite() {
            return None;
        }
        self.entries.get(&PointKey(point))
    }

    /// Returns true if `point` is stored in the table.
    pub fn contains(&self, point: Point2<F>) -> bool {
        self.get(point).is_some()
    }

    /// Iterates over all points in key order (by y, then x).
    pub fn points(&self) -> impl Iterator<Item = Point2<F>> + '_ {
        self.entries.keys().map(|key| key.0)
    }

    /// Finds all points inside `rect`, boundary included, by scanning every entry.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if `rect` has a NaN bound or a
    /// minimum greater than its maximum.
    pub fn range(&self, rect: Aabb2<F>) -> Result<Vec<Point2<F>>, SpatialError> {
        let rect = rect.validate()?;
        Ok(self.points().filter(|&p| rect.contains_point(p)).collect())
    }

    /// Finds the stored point closest to `query` by scanning every entry.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if either coordinate is NaN or infinite.
    pub fn nearest(&self, query: Point2<F>) -> Result<Option<Point2<F>>, SpatialError> {
        if !query.is_finite() {
            return Err(SpatialError::invalid("query point has a non-finite coordinate"));
        }

        let mut best: Option<(Point2<F>, F)> = None;
        for p in self.points() {
            let key = p.comparable_distance(query);
            match best {
                Some((_, best_key)) if key >= best_key => {}
                _ => best = Some((p, key)),
            }
        }
        Ok(best.map(|(p, _)| p))
    }
}

impl<F: Float, V> Extend<(Point2<F>, V)> for PointTable<F, V> {
    /// Inserts every pair, skipping pairs whose point is not finite.
    fn extend<I: IntoIterator<Item = (Point2<F>, V)>>(&mut self, iter: I) {
        for (point, value) in iter {
            if let Err(err) = self.insert(point, value) {
                tracing::debug!(error = %err, "skipped pair during extend");
            }
        }
    }
}

impl<F: Float, V> FromIterator<(Point2<F>, V)> for PointTable<F, V> {
    fn from_iter<I: IntoIterator<Item = (Point2<F>, V)>>(iter: I) -> Self {
        let mut table = PointTable::new();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PointTable<f64, i32> {
        [(1.0, 1.0), (2.5, 2.5), (3.0, 3.0), (3.5, 3.5), (4.0, 4.0), (4.5, 4.5), (5.0, 5.0)]
            .into_iter()
            .zip(1..)
            .map(|((x, y), v)| (Point2::new(x, y), v))
            .collect()
    }

    #[test]
    fn test_empty() {
        let table: PointTable<f64, ()> = PointTable::new();
        assert!(table.is_empty());
        assert_eq!(table.nearest(Point2::origin()), Ok(None));
        assert!(table.range(Aabb2::universe()).unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = sample_table();
        assert_eq!(table.len(), 7);
        assert_eq!(table.get(Point2::new(3.0, 3.0)), Some(&3));
        assert!(!table.contains(Point2::new(3.0, 2.0)));

        assert_eq!(table.insert(Point2::new(3.0, 3.0), 30), Ok(Some(3)));
        assert_eq!(table.len(), 7);
        assert_eq!(table.get(Point2::new(3.0, 3.0)), Some(&30));
    }

    #[test]
    fn test_non_finite() {
        let mut table = sample_table();
        assert!(table.insert(Point2::new(f64::NAN, 1.0), 0).is_err());
        assert!(table.get(Point2::new(f64::NAN, 1.0)).is_none());
        assert!(table.nearest(Point2::new(1.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_points_key_order() {
        let table: PointTable<f64, ()> = [(2.0, 1.0), (1.0, 2.0), (1.0, 1.0)]
            .into_iter()
            .map(|(x, y)| (Point2::new(x, y), ()))
            .collect();
        let points: Vec<_> = table.points().collect();
        assert_eq!(
            points,
            vec![Point2::new(1.0, 1.0), Point2::new(2.0, 1.0), Point2::new(1.0, 2.0)]
        );
    }

    #[test]
    fn test_nearest_large_coordinates() {
        let table: PointTable<f64, ()> = [(-1e200, 0.0), (1e200, 0.0)]
            .into_iter()
            .map(|(x, y)| (Point2::new(x, y), ()))
            .collect();
        assert_eq!(
            table.nearest(Point2::new(1.1e200, 0.0)),
            Ok(Some(Point2::new(1e200, 0.0)))
        );

        let table: PointTable<f32, ()> = [(-3e38, 0.0), (3e38, 0.0)]
            .into_iter()
            .map(|(x, y)| (Point2::new(x, y), ()))
            .collect();
        assert_eq!(
            table.nearest(Point2::new(3.1e38, 0.0)),
            Ok(Some(Point2::new(3e38, 0.0)))
        );
    }

    #[test]
    fn test_range_and_nearest() {
        let table = sample_table();
        assert_eq!(
            table.range(Aabb2::from_bounds(0.0, 0.0, 2.0, 2.0)),
            Ok(vec![Point2::new(1.0, 1.0)])
        );
        assert!(table.range(Aabb2::from_bounds(2.0, 0.0, 0.0, 2.0)).is_err());
        assert_eq!(
            table.nearest(Point2::new(3.0, 3.0)),
            Ok(Some(Point2::new(3.0, 3.0)))
        );
        assert_eq!(
            table.nearest(Point2::new(3.7, 3.6)),
            Ok(Some(Point2::new(3.5, 3.5)))
        );
    }
}
