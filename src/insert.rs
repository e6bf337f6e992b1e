//! Subtree splicing: choose-subtree descent, overflow splits, root growth.
//!
//! `insert_node` attaches any node of smaller height than the root — a
//! single point-holder or a freshly packed subtree — at the depth where its
//! leaves line up with the tree's, then walks back up splitting whatever
//! overflowed.

use crate::bbox::BBox;
use crate::data::SpatialData;
use crate::node::{Node, NodeId};
use crate::tree::RTree;

impl<S: SpatialData> RTree<S> {
    pub(crate) fn insert_node(&mut self, sub: NodeId) {
        let root_height = self.arena.get(self.root).height;
        let sub_height = self.arena.get(sub).height;
        let required_depth = root_height as i64 - sub_height as i64 - 1;
        if required_depth < 0 {
            panic!("cannot splice a height {sub_height} subtree into a height {root_height} tree");
        }

        let sub_bbox = self.arena.get(sub).bbox;
        let target = self.choose_subtree(&sub_bbox, required_depth as u32);

        self.arena.get_mut(sub).parent = Some(target);
        self.arena.get_mut(target).children.push(sub);

        // Walk up: split overflowing ancestors, widen the rest.
        let mut current = Some(target);
        while let Some(id) = current {
            let parent = self.arena.get(id).parent;
            if self.arena.get(id).children.len() > self.options.max_entries() {
                self.split(id);
            } else {
                let node = self.arena.get_mut(id);
                node.bbox = node.bbox.extend(&sub_bbox);
            }
            current = parent;
        }
    }

    /// Descend `required_depth` levels (or to a leaf), at each step picking
    /// the child that grows least by absorbing `bbox`; ties fall to the
    /// smaller box, and the first child wins when nothing orders strictly.
    fn choose_subtree(&self, bbox: &BBox, required_depth: u32) -> NodeId {
        let mut node = self.root;
        let mut depth = 0;
        loop {
            let current = self.arena.get(node);
            if current.is_leaf || depth == required_depth {
                return node;
            }

            let mut best = current.children[0];
            let mut best_area = self.arena.get(best).bbox.area();
            let mut best_cost = bbox.enlarged_area(&self.arena.get(best).bbox) - best_area;
            for &child in &current.children[1..] {
                let child_bbox = self.arena.get(child).bbox;
                let area = child_bbox.area();
                let cost = bbox.enlarged_area(&child_bbox) - area;
                if cost < best_cost || (cost == best_cost && area < best_area) {
                    best = child;
                    best_cost = cost;
                    best_area = area;
                }
            }
            node = best;
            depth += 1;
        }
    }

    /// Split an overflowing node, keeping the lower half of its children and
    /// moving the upper half to a new sibling. The sibling joins the parent
    /// (whose own overflow is the caller's problem) or becomes the second
    /// child of a new root.
    pub(crate) fn split(&mut self, id: NodeId) {
        let split_index = self.choose_split_index(id);

        let upper = self.arena.get_mut(id).children.split_off(split_index);
        let (height, is_leaf, parent) = {
            let node = self.arena.get(id);
            (node.height, node.is_leaf, node.parent)
        };

        let sibling = self.arena.alloc(Node {
            height,
            is_leaf,
            bbox: BBox::EMPTY,
            parent,
            children: Vec::new(),
            data: None,
        });
        for &child in &upper {
            self.arena.get_mut(child).parent = Some(sibling);
        }
        self.arena.get_mut(sibling).children = upper;

        self.arena.get_mut(id).bbox = self.arena.bbox_from_children(id);
        self.arena.get_mut(sibling).bbox = self.arena.bbox_from_children(sibling);

        match parent {
            Some(parent) => self.arena.get_mut(parent).children.push(sibling),
            None => self.split_root(sibling),
        }
    }

    /// Split policy seam. The midpoint keeps both halves at or above the
    /// fill floor for any overflow of `max_entries + 1` children.
    fn choose_split_index(&self, id: NodeId) -> usize {
        self.arena.get(id).children.len() / 2
    }

    /// Grow the tree by one level: a new root adopting the current root and
    /// `sibling`.
    pub(crate) fn split_root(&mut self, sibling: NodeId) {
        let old_root = self.root;
        let height = self.arena.get(old_root).height + 1;
        let bbox = self
            .arena
            .get(old_root)
            .bbox
            .extend(&self.arena.get(sibling).bbox);

        let new_root = self.arena.alloc(Node {
            height,
            is_leaf: false,
            bbox,
            parent: None,
            children: vec![old_root, sibling],
            data: None,
        });
        self.arena.get_mut(old_root).parent = Some(new_root);
        self.arena.get_mut(sibling).parent = Some(new_root);
        self.root = new_root;
    }
}
