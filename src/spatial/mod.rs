//! Spatial point indexes.
//!
//! - [`KdTree`] - A 2D-tree mapping points to values with pruned range and nearest neighbor queries
//! - [`PointTable`] - An ordered point table answering the same queries by linear scan

mod kdtree;
mod table;

pub use kdtree::{Iter, KdTree};
pub use table::PointTable;
