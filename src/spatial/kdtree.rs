//! 2D-tree for point storage with pruned spatial queries.
//!
//! A 2D-tree is a binary search tree over points in the plane in which each
//! level alternates the coordinate it partitions on. The root splits the
//! plane with a vertical line through its point (routing on x), its children
//! split with horizontal lines (routing on y), and so on.
//!
//! Every node records the rectangle its subtree is confined to. The root owns
//! the whole plane and each child owns the half of its parent's rectangle on
//! its side of the parent's split line. Range and nearest-neighbor queries
//! compare the query against these rectangles to skip entire subtrees.
//!
//! The tree is built incrementally and never rebalanced: its shape is
//! determined by insertion order.
//!
//! # Example
//!
//! ```
//! use kdspace::{Aabb2, KdTree, Point2};
//!
//! let mut tree = KdTree::new();
//! for (i, (x, y)) in [(0.7, 0.2), (0.5, 0.4), (0.2, 0.3), (0.4, 0.7), (0.9, 0.6)]
//!     .into_iter()
//!     .enumerate()
//! {
//!     tree.insert(Point2::new(x, y), i)?;
//! }
//!
//! let inside = tree.range(Aabb2::from_bounds(0.1, 0.1, 0.6, 0.6))?;
//! assert_eq!(inside, vec![Point2::new(0.5, 0.4), Point2::new(0.2, 0.3)]);
//!
//! let nearest = tree.nearest(Point2::new(0.8, 0.1))?;
//! assert_eq!(nearest, Some(Point2::new(0.7, 0.2)));
//! # Ok::<(), kdspace::SpatialError>(())
//! ```

use crate::bounds::Aabb2;
use crate::error::SpatialError;
use crate::primitives::Point2;
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::mem;
use tracing::{debug, trace};

/// A node in the 2D-tree.
#[derive(Debug, Clone)]
struct KdNode<F, V> {
    point: Point2<F>,
    value: V,
    /// `true` if this node splits by x (a vertical line), `false` if by y.
    vertical: bool,
    /// Rectangle containing every point of this subtree.
    region: Aabb2<F>,
    /// Points strictly below this node's coordinate on its split axis.
    left: Option<Box<KdNode<F, V>>>,
    /// Points at or above this node's coordinate on its split axis.
    right: Option<Box<KdNode<F, V>>>,
}

impl<F: Float, V> KdNode<F, V> {
    #[inline]
    fn goes_low(&self, p: Point2<F>) -> bool {
        p.coord(self.vertical) < self.point.coord(self.vertical)
    }

    /// Returns the children ordered as (side `p` routes to, other side).
    #[inline]
    fn children_toward(&self, p: Point2<F>) -> (Option<&Self>, Option<&Self>) {
        if self.goes_low(p) {
            (self.left.as_deref(), self.right.as_deref())
        } else {
            (self.right.as_deref(), self.left.as_deref())
        }
    }
}

/// Node counts gathered during a pruned query.
#[derive(Debug, Clone, Copy, Default)]
struct SearchStats {
    visited: usize,
    pruned: usize,
}

/// A 2D-tree mapping distinct points to values.
///
/// Points are identified by exact equality of both coordinates. Inserting a
/// point that is already present replaces its value.
///
/// # Complexity
///
/// For `n` points inserted in random order:
///
/// - Insert / lookup: O(log n) average, O(n) worst case
/// - Nearest neighbor: O(log n) average, O(n) worst case
/// - Range query: O(√n + k) typical where k is the number of results
#[derive(Debug, Clone)]
pub struct KdTree<F, V> {
    root: Option<Box<KdNode<F, V>>>,
    size: usize,
}

// Unlinks nodes one at a time so a deep path does not recurse on drop.
impl<F, V> Drop for KdTree<F, V> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<KdNode<F, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<F: Float, V> Default for KdTree<F, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, V> KdTree<F, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        KdTree {
            root: None,
            size: 0,
        }
    }

    /// Returns the number of distinct points in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Associates `value` with `point`.
    ///
    /// Returns the previous value if the point was already present, in which
    /// case the tree keeps its shape and size.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if either coordinate is NaN or infinite.
    pub fn insert(&mut self, point: Point2<F>, value: V) -> Result<Option<V>, SpatialError> {
        if !point.is_finite() {
            return Err(SpatialError::invalid("point has a non-finite coordinate"));
        }

        let mut slot = &mut self.root;
        let mut region = Aabb2::universe();
        let mut vertical = true;
        let mut depth = 0usize;

        while let Some(node) = slot {
            if node.point == point {
                trace!(depth, "replaced value at existing point");
                return Ok(Some(mem::replace(&mut node.value, value)));
            }

            vertical = !node.vertical;
            depth += 1;
            if node.goes_low(point) {
                region = node.region.low_half(node.point, node.vertical);
                slot = &mut node.left;
            } else {
                region = node.region.high_half(node.point, node.vertical);
                slot = &mut node.right;
            }
        }

        *slot = Some(Box::new(KdNode {
            point,
            value,
            vertical,
            region,
            left: None,
            right: None,
        }));
        self.size += 1;
        trace!(depth, vertical, "inserted node");
        Ok(None)
    }

    /// Returns the value stored at `point`, if any.
    pub fn get(&self, point: Point2<F>) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if node.point == point {
                return Some(&node.value);
            }
            current = node.children_toward(point).0;
        }
        None
    }

    /// Returns a mutable reference to the value stored at `point`, if any.
    pub fn get_mut(&mut self, point: Point2<F>) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            if node.point == point {
                return Some(&mut node.value);
            }
            current = if node.goes_low(point) {
                node.left.as_deref_mut()
            } else {
                node.right.as_deref_mut()
            };
        }
        None
    }

    /// Returns true if `point` is stored in the tree.
    pub fn contains(&self, point: Point2<F>) -> bool {
        self.get(point).is_some()
    }

    /// Iterates over all points and their values in level order.
    pub fn iter(&self) -> Iter<'_, F, V> {
        Iter {
            nodes: LevelOrder::new(self.root.as_deref()),
        }
    }

    /// Iterates over all points in level order (root first, then each depth
    /// left to right).
    pub fn points(&self) -> impl Iterator<Item = Point2<F>> + '_ {
        LevelOrder::new(self.root.as_deref()).map(|node| node.point)
    }

    /// Iterates over every node as `(point, region, splits_vertically)` in
    /// level order.
    pub fn regions(&self) -> impl Iterator<Item = (Point2<F>, Aabb2<F>, bool)> + '_ {
        LevelOrder::new(self.root.as_deref()).map(|node| (node.point, node.region, node.vertical))
    }

    /// Finds all points inside `rect`, boundary included.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if `rect` has a NaN bound or a
    /// minimum greater than its maximum.
    pub fn range(&self, rect: Aabb2<F>) -> Result<Vec<Point2<F>>, SpatialError> {
        let rect = rect.validate()?;
        let mut results = Vec::new();
        let mut stats = SearchStats::default();
        Self::range_recursive(self.root.as_deref(), rect, &mut results, &mut stats);
        debug!(
            found = results.len(),
            visited = stats.visited,
            pruned = stats.pruned,
            "range query"
        );
        Ok(results)
    }

    fn range_recursive(
        node: Option<&KdNode<F, V>>,
        rect: Aabb2<F>,
        results: &mut Vec<Point2<F>>,
        stats: &mut SearchStats,
    ) {
        let Some(node) = node else {
            return;
        };

        // Nothing in this subtree can be inside a disjoint rectangle
        if !rect.intersects(node.region) {
            stats.pruned += 1;
            return;
        }

        stats.visited += 1;
        if rect.contains_point(node.point) {
            results.push(node.point);
        }
        Self::range_recursive(node.left.as_deref(), rect, results, stats);
        Self::range_recursive(node.right.as_deref(), rect, results, stats);
    }

    /// Finds the stored point closest to `query`.
    ///
    /// Returns `None` if the tree is empty. Among points at the same distance
    /// the first one reached by the search wins.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if either coordinate is NaN or infinite.
    pub fn nearest(&self, query: Point2<F>) -> Result<Option<Point2<F>>, SpatialError> {
        Ok(self.nearest_search(query)?.map(|search| search.best))
    }

    fn nearest_search(&self, query: Point2<F>) -> Result<Option<NearestSearch<F>>, SpatialError> {
        if !query.is_finite() {
            return Err(SpatialError::invalid("query point has a non-finite coordinate"));
        }
        let Some(root) = self.root.as_deref() else {
            return Ok(None);
        };

        let mut search = NearestSearch {
            query,
            best: root.point,
            best_key: root.point.comparable_distance(query),
            stats: SearchStats::default(),
        };
        search.visit(Some(root));
        debug!(
            visited = search.stats.visited,
            pruned = search.stats.pruned,
            "nearest query"
        );
        Ok(Some(search))
    }

    /// Finds the `k` stored points closest to `query`.
    ///
    /// Returns `(point, distance)` pairs sorted by distance (closest first).
    /// Returns fewer than `k` pairs if the tree holds fewer points.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if either coordinate is NaN or infinite.
    pub fn k_nearest(
        &self,
        query: Point2<F>,
        k: usize,
    ) -> Result<Vec<(Point2<F>, F)>, SpatialError> {
        if !query.is_finite() {
            return Err(SpatialError::invalid("query point has a non-finite coordinate"));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut heap: BinaryHeap<HeapEntry<F>> = BinaryHeap::with_capacity(k + 1);
        let mut stats = SearchStats::default();
        Self::k_nearest_recursive(self.root.as_deref(), query, k, &mut heap, &mut stats);
        debug!(
            k,
            visited = stats.visited,
            pruned = stats.pruned,
            "k-nearest query"
        );

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| (e.point, e.point.distance(query)))
            .collect())
    }

    fn k_nearest_recursive(
        node: Option<&KdNode<F, V>>,
        query: Point2<F>,
        k: usize,
        heap: &mut BinaryHeap<HeapEntry<F>>,
        stats: &mut SearchStats,
    ) {
        let Some(node) = node else {
            return;
        };

        // Once k candidates are held, the worst of them bounds the search
        if heap.len() == k {
            if let Some(worst) = heap.peek() {
                if node.region.comparable_distance_to_point(query) >= worst.key {
                    stats.pruned += 1;
                    return;
                }
            }
        }

        stats.visited += 1;
        let key = node.point.comparable_distance(query);
        if heap.len() < k {
            heap.push(HeapEntry {
                point: node.point,
                key,
            });
        } else if heap.peek().is_some_and(|worst| key < worst.key) {
            heap.pop();
            heap.push(HeapEntry {
                point: node.point,
                key,
            });
        }

        let (first, second) = node.children_toward(query);
        Self::k_nearest_recursive(first, query, k, heap, stats);
        Self::k_nearest_recursive(second, query, k, heap, stats);
    }

    /// Finds all points within `radius` of `query`, boundary included.
    ///
    /// # Errors
    ///
    /// [`SpatialError::InvalidArgument`] if the query has a non-finite
    /// coordinate or the radius is negative or NaN.
    pub fn within_radius(
        &self,
        query: Point2<F>,
        radius: F,
    ) -> Result<Vec<Point2<F>>, SpatialError> {
        if !query.is_finite() {
            return Err(SpatialError::invalid("query point has a non-finite coordinate"));
        }
        if radius.is_nan() || radius < F::zero() {
            return Err(SpatialError::invalid("radius must be a non-negative number"));
        }

        let mut results = Vec::new();
        let mut stats = SearchStats::default();
        Self::radius_recursive(self.root.as_deref(), query, radius, &mut results, &mut stats);
        debug!(
            found = results.len(),
            visited = stats.visited,
            pruned = stats.pruned,
            "radius query"
        );
        Ok(results)
    }

    fn radius_recursive(
        node: Option<&KdNode<F, V>>,
        query: Point2<F>,
        radius: F,
        results: &mut Vec<Point2<F>>,
        stats: &mut SearchStats,
    ) {
        let Some(node) = node else {
            return;
        };

        if node.region.distance_to_point(query) > radius {
            stats.pruned += 1;
            return;
        }

        stats.visited += 1;
        if node.point.distance(query) <= radius {
            results.push(node.point);
        }
        Self::radius_recursive(node.left.as_deref(), query, radius, results, stats);
        Self::radius_recursive(node.right.as_deref(), query, radius, results, stats);
    }
}

/// Best-so-far state threaded through a nearest-neighbor search.
///
/// Distances are compared through [`Point2::comparable_distance`], which is
/// monotone in the Euclidean distance and cannot overflow.
#[derive(Debug, Clone, Copy)]
struct NearestSearch<F> {
    query: Point2<F>,
    best: Point2<F>,
    best_key: F,
    stats: SearchStats,
}

impl<F: Float> NearestSearch<F> {
    fn visit<V>(&mut self, node: Option<&KdNode<F, V>>) {
        let Some(node) = node else {
            return;
        };

        // No point in the region can beat the current best
        if node.region.comparable_distance_to_point(self.query) >= self.best_key {
            self.stats.pruned += 1;
            return;
        }

        self.stats.visited += 1;
        let key = node.point.comparable_distance(self.query);
        if key < self.best_key {
            self.best = node.point;
            self.best_key = key;
        }

        // The query's own side first, so the bound is tight for the far side
        let (first, second) = node.children_toward(self.query);
        self.visit(first);
        self.visit(second);
    }
}

/// Breadth-first traversal over the nodes of a tree.
#[derive(Debug, Clone)]
struct LevelOrder<'a, F, V> {
    queue: VecDeque<&'a KdNode<F, V>>,
}

impl<'a, F, V> LevelOrder<'a, F, V> {
    fn new(root: Option<&'a KdNode<F, V>>) -> Self {
        LevelOrder {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, F, V> Iterator for LevelOrder<'a, F, V> {
    type Item = &'a KdNode<F, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        if let Some(left) = node.left.as_deref() {
            self.queue.push_back(left);
        }
        if let Some(right) = node.right.as_deref() {
            self.queue.push_back(right);
        }
        Some(node)
    }
}

/// Iterator over `(point, &value)` pairs of a [`KdTree`] in level order.
///
/// Created by [`KdTree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, F, V> {
    nodes: LevelOrder<'a, F, V>,
}

impl<'a, F: Copy, V> Iterator for Iter<'a, F, V> {
    type Item = (Point2<F>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|node| (node.point, &node.value))
    }
}

impl<'a, F: Float, V> IntoIterator for &'a KdTree<F, V> {
    type Item = (Point2<F>, &'a V);
    type IntoIter = Iter<'a, F, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F: Float, V> Extend<(Point2<F>, V)> for KdTree<F, V> {
    /// Inserts every pair, skipping pairs whose point is not finite.
    fn extend<I: IntoIterator<Item = (Point2<F>, V)>>(&mut self, iter: I) {
        for (point, value) in iter {
            if let Err(err) = self.insert(point, value) {
                debug!(error = %err, "skipped pair during extend");
            }
        }
    }
}

impl<F: Float, V> FromIterator<(Point2<F>, V)> for KdTree<F, V> {
    fn from_iter<I: IntoIterator<Item = (Point2<F>, V)>>(iter: I) -> Self {
        let mut tree = KdTree::new();
        tree.extend(iter);
        tree
    }
}

/// A heap entry for k-nearest neighbor search.
/// Ordered by distance so `BinaryHeap` keeps the farthest candidate on top.
struct HeapEntry<F> {
    point: Point2<F>,
    key: F,
}

impl<F: Float> PartialEq for HeapEntry<F> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<F: Float> Eq for HeapEntry<F> {}

impl<F: Float> PartialOrd for HeapEntry<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Float> Ord for HeapEntry<F> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .partial_cmp(&other.key)
            .unwrap_or(Ordering::Equal)
    }
}
