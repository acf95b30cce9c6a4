//! kdspace - A 2D-tree spatial index
//!
//! Stores values keyed by points in the plane and answers point lookups,
//! rectangle range queries and nearest-neighbor queries without scanning
//! every point. Each tree node remembers the rectangle its subtree lives in,
//! and queries skip any subtree whose rectangle cannot hold an answer.
//!
//! Everything is generic over `f32` and `f64` coordinates.
//!
//! # Example
//!
//! ```
//! use kdspace::{Aabb2, KdTree, Point2};
//!
//! let mut stations = KdTree::new();
//! stations.insert(Point2::new(2.0, 3.0), "north")?;
//! stations.insert(Point2::new(8.0, 1.0), "east")?;
//! stations.insert(Point2::new(4.0, 7.0), "west")?;
//!
//! assert_eq!(stations.get(Point2::new(8.0, 1.0)), Some(&"east"));
//! assert_eq!(stations.nearest(Point2::new(5.0, 6.0))?, Some(Point2::new(4.0, 7.0)));
//! assert_eq!(stations.range(Aabb2::from_bounds(0.0, 0.0, 5.0, 5.0))?.len(), 1);
//! # Ok::<(), kdspace::SpatialError>(())
//! ```

pub mod bounds;
pub mod error;
pub mod primitives;
pub mod spatial;

pub use bounds::Aabb2;
pub use error::SpatialError;
pub use primitives::Point2;
pub use spatial::{KdTree, PointTable};
