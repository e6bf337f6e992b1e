//! Window queries and traversal.

use crate::bbox::BBox;
use crate::data::SpatialData;
use crate::node::NodeId;
use crate::tree::RTree;

/// A stored rectangle returned by a query: its bounding box and a reference
/// to the length-1 storage range pinned when it was inserted or loaded.
#[derive(Debug)]
pub struct Entry<'t, S> {
    bbox: BBox,
    data: &'t S,
}

impl<'t, S> Entry<'t, S> {
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn data(&self) -> &'t S {
        self.data
    }
}

impl<S: SpatialData> RTree<S> {
    /// All stored rectangles whose bbox shares at least one point with
    /// `query`. Result order is unspecified.
    pub fn search(&self, query: BBox) -> Vec<Entry<'_, S>> {
        let mut found = Vec::new();
        if query.has_nan() {
            log::warn!("rejecting search with NaN query coordinates");
            return found;
        }
        if !self.arena.get(self.root).bbox.intersects(&query) {
            return found;
        }

        let mut frontier = vec![self.root];
        while let Some(id) = frontier.pop() {
            let node = self.arena.get(id);
            for &child in &node.children {
                let child_bbox = self.arena.get(child).bbox;
                if !query.intersects(&child_bbox) {
                    continue;
                }
                if node.is_leaf {
                    found.push(self.entry_for(child));
                } else if query.contains(&child_bbox) {
                    // The whole subtree is inside the window.
                    self.collect_entries(child, &mut found);
                } else {
                    frontier.push(child);
                }
            }
        }
        found
    }

    /// True if any stored rectangle intersects `query`.
    pub fn collides(&self, query: BBox) -> bool {
        if query.has_nan() {
            log::warn!("rejecting collision check with NaN query coordinates");
            return false;
        }
        if !self.arena.get(self.root).bbox.intersects(&query) {
            return false;
        }

        let mut frontier = vec![self.root];
        while let Some(id) = frontier.pop() {
            let node = self.arena.get(id);
            for &child in &node.children {
                let child_bbox = self.arena.get(child).bbox;
                if !query.intersects(&child_bbox) {
                    continue;
                }
                if node.is_leaf || query.contains(&child_bbox) {
                    return true;
                }
                frontier.push(child);
            }
        }
        false
    }

    /// Every stored rectangle, in unspecified order.
    pub fn entries(&self) -> Vec<Entry<'_, S>> {
        let mut found = Vec::new();
        self.collect_entries(self.root, &mut found);
        found
    }

    fn collect_entries<'t>(&'t self, id: NodeId, out: &mut Vec<Entry<'t, S>>) {
        let mut holders = Vec::new();
        self.arena.flatten_downwards(id, &mut holders);
        out.extend(holders.into_iter().map(|holder| self.entry_for(holder)));
    }

    fn entry_for(&self, holder: NodeId) -> Entry<'_, S> {
        let node = self.arena.get(holder);
        let data = node.data.as_ref().expect("point-holder without pinned data");
        Entry {
            bbox: node.bbox,
            data,
        }
    }
}
