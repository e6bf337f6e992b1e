//! The R-tree facade: options, root lifecycle, and the public operations.

use crate::build::build_subtree;
use crate::data::SpatialData;
use crate::error::{BoxTreeError, Result};
use crate::node::{Node, NodeArena, NodeId};

/// Index configuration.
///
/// One recognized knob: the node fan-out cap. The fill floor is derived
/// from it.
///
/// # Example
///
/// ```
/// use boxtree::{RTree, TreeOptions};
///
/// let options = TreeOptions::new().with_max_entries(16);
/// let tree = RTree::<&mut [[f64; 4]]>::with_options(options).unwrap();
/// assert_eq!(tree.options().max_entries(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    max_entries: usize,
}

impl TreeOptions {
    pub fn new() -> Self {
        TreeOptions { max_entries: 9 }
    }

    /// Set the maximum number of children per node. Must be at least 2.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum fill of a non-root node: `max(2, ceil(max_entries * 0.4))`.
    pub fn min_entries(&self) -> usize {
        2usize.max((self.max_entries as f64 * 0.4).ceil() as usize)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_entries < 2 {
            return Err(BoxTreeError::InvalidMaxEntries(self.max_entries));
        }
        Ok(())
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        TreeOptions::new()
    }
}

/// Counters describing the current shape of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of stored rectangles.
    pub entries: usize,
    /// Root height; 1 for an empty or single-leaf tree.
    pub height: u32,
    /// Live tree nodes, point-holders included.
    pub nodes: usize,
}

/// A main-memory 2D R-tree over caller-owned rectangles.
///
/// Built either incrementally with [`insert`](RTree::insert) or in bulk with
/// [`load`](RTree::load), which packs subtrees top-down and splices them into
/// the existing tree. The tree pins ranges of the caller's storage for its
/// whole lifetime; the borrow checker enforces that the storage cannot be
/// touched behind its back.
pub struct RTree<S: SpatialData> {
    pub(crate) arena: NodeArena<S>,
    pub(crate) root: NodeId,
    pub(crate) options: TreeOptions,
    pub(crate) entry_count: usize,
}

impl<S: SpatialData> RTree<S> {
    /// Empty tree with default options (fan-out 9).
    pub fn new() -> Self {
        RTree::with_validated(TreeOptions::default())
    }

    /// Empty tree with the given options.
    pub fn with_options(options: TreeOptions) -> Result<Self> {
        options.validate()?;
        Ok(RTree::with_validated(options))
    }

    fn with_validated(options: TreeOptions) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::leaf());
        RTree {
            arena,
            root,
            options,
            entry_count: 0,
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Number of stored rectangles.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Root height. An empty tree is a height-1 empty leaf.
    pub fn height(&self) -> u32 {
        self.arena.get(self.root).height
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            entries: self.entry_count,
            height: self.height(),
            nodes: self.arena.live_count(),
        }
    }

    /// Bulk-load a batch of rectangles, reordering the backing storage in
    /// place and splicing the packed subtree into the tree.
    pub fn load(&mut self, data: S) -> &mut Self {
        self.load_inner(data, false)
    }

    /// Like [`load`](RTree::load), for input already sorted by `min_x`;
    /// skips the top-level x partition.
    pub fn load_sorted(&mut self, data: S) -> &mut Self {
        self.load_inner(data, true)
    }

    fn load_inner(&mut self, data: S, presorted: bool) -> &mut Self {
        let count = data.len();
        if count == 0 {
            return self;
        }

        // Too few rectangles to pack a subtree worth splicing.
        if count < self.options.min_entries() {
            let mut rest = data;
            while rest.len() > 1 {
                let (head, tail) = rest.split_at(1);
                self.insert(head);
                rest = tail;
            }
            self.insert(rest);
            return self;
        }

        let built = build_subtree(&self.options, data, presorted);
        let sub = built.graft_into(&mut self.arena);
        self.arena.compute_bbox_downwards(sub);
        self.entry_count += count;
        log::debug!(
            "bulk-loaded {count} rectangles into a height {} subtree",
            self.arena.get(sub).height
        );

        let root = self.root;
        if self.arena.get(root).children.is_empty() {
            // Fresh or cleared tree: adopt the subtree as the root.
            self.arena.free(root);
            self.root = sub;
        } else if self.arena.get(root).height == self.arena.get(sub).height {
            self.split_root(sub);
        } else if self.arena.get(root).height < self.arena.get(sub).height {
            // The built subtree is the taller one; it becomes the root and
            // the old root is spliced into it.
            self.root = sub;
            self.insert_node(root);
        } else {
            self.insert_node(sub);
        }
        self
    }

    /// Insert a single rectangle. `item` must be a length-1 range.
    pub fn insert(&mut self, item: S) {
        assert!(
            item.len() == 1,
            "insert expects exactly one rectangle, got {}",
            item.len()
        );
        let bbox = item.bbox_at(0);
        let holder = self.arena.alloc(Node::holder(bbox, item));
        self.insert_node(holder);
        self.entry_count += 1;
    }

    /// Drop every entry and release the pinned storage ranges.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = self.arena.alloc(Node::leaf());
        self.entry_count = 0;
    }
}

impl<S: SpatialData> Default for RTree<S> {
    fn default() -> Self {
        RTree::new()
    }
}
