//! Main-memory 2D spatial index for axis-aligned bounding boxes.
//!
//! `boxtree` is an R-tree over rectangles the caller keeps in its own
//! storage. Bulk loading packs subtrees top-down with bucketed partial
//! sorting (Floyd–Rivest selection underneath), so building never fully
//! sorts the input; single rectangles go in through the classic
//! least-enlargement descent with node splitting. Queries return the
//! entries overlapping a window; removal condenses the tree around the
//! unlinked entry.
//!
//! Points are the degenerate case of rectangles with `min == max`, and the
//! index works with `&mut [[f64; 2]]` point slices out of the box.
//!
//! ```rust
//! use boxtree::{BBox, RTree};
//!
//! let mut rects = vec![
//!     [0.0, 0.0, 10.0, 10.0],
//!     [20.0, 20.0, 30.0, 30.0],
//!     [40.0, 0.0, 45.0, 5.0],
//!     [0.0, 40.0, 5.0, 45.0],
//! ];
//!
//! let mut tree = RTree::new();
//! tree.load(&mut rects[..]);
//!
//! let hits = tree.search(BBox::new(5.0, 5.0, 25.0, 25.0));
//! assert_eq!(hits.len(), 2);
//! assert!(tree.collides(BBox::new(41.0, 1.0, 42.0, 2.0)));
//! ```
//!
//! The tree reorders the backing storage during a bulk load and pins
//! length-1 ranges of it at the leaves, so the storage is mutably borrowed
//! for the tree's lifetime. A single tree is single-writer: queries may run
//! concurrently with each other, mutation needs exclusive access. Bulk
//! loads internally fan subtree construction out to scoped worker threads.

pub mod bbox;
pub mod data;
pub mod error;
pub mod sort;

mod axis;
mod build;
mod insert;
mod node;
mod remove;
mod search;
mod tree;

pub use bbox::BBox;
pub use data::SpatialData;
pub use error::{BoxTreeError, Result};
pub use search::Entry;
pub use tree::{RTree, TreeOptions, TreeStats};

/// Common imports.
pub mod prelude {
    pub use crate::bbox::BBox;
    pub use crate::data::SpatialData;
    pub use crate::error::{BoxTreeError, Result};
    pub use crate::search::Entry;
    pub use crate::tree::{RTree, TreeOptions, TreeStats};
}
