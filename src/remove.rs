//! Removal and condensation.
//!
//! The descent only enters subtrees whose cover contains the target bbox,
//! backtracking between siblings with an explicit resume stack. After the
//! matching point-holder is unlinked, emptied ancestors are removed, covers
//! are recomputed up the surviving path, and a degenerate root is squashed.

use crate::bbox::BBox;
use crate::data::SpatialData;
use crate::node::{Node, NodeId};
use crate::tree::RTree;

impl<S: SpatialData> RTree<S> {
    /// Remove the first stored rectangle whose bbox equals `bbox`.
    /// Returns whether anything was removed; a miss is a no-op.
    pub fn remove(&mut self, bbox: BBox) -> bool {
        self.remove_with(bbox, |_| true)
    }

    /// Remove the first stored rectangle whose bbox equals `bbox` and whose
    /// pinned storage range satisfies `matches`. The predicate disambiguates
    /// between entries sharing a bbox.
    pub fn remove_with<F>(&mut self, bbox: BBox, mut matches: F) -> bool
    where
        F: FnMut(&S) -> bool,
    {
        if self.entry_count == 0 {
            return false;
        }

        // (node, next child to try) — popping with nothing left to try is
        // the backtrack step.
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        let mut found: Option<(NodeId, usize)> = None;

        if self.arena.get(self.root).bbox.contains(&bbox) {
            stack.push((self.root, 0));
        }

        while let Some((id, resume)) = stack.pop() {
            let node = self.arena.get(id);
            if node.is_leaf {
                let hit = node.children.iter().position(|&holder| {
                    let holder_node = self.arena.get(holder);
                    holder_node.bbox == bbox
                        && matches(
                            holder_node
                                .data
                                .as_ref()
                                .expect("point-holder without pinned data"),
                        )
                });
                if let Some(position) = hit {
                    found = Some((id, position));
                    break;
                }
            } else {
                let mut index = resume;
                while index < node.children.len() {
                    let child = node.children[index];
                    if self.arena.get(child).bbox.contains(&bbox) {
                        break;
                    }
                    index += 1;
                }
                if index < node.children.len() {
                    let child = node.children[index];
                    stack.push((id, index + 1));
                    stack.push((child, 0));
                }
            }
        }

        let Some((leaf, position)) = found else {
            return false;
        };

        let holder = self.arena.get_mut(leaf).children.remove(position);
        self.arena.free(holder);
        self.entry_count -= 1;

        // The stack now holds exactly the ancestors of the leaf, root first.
        let mut path: Vec<NodeId> = stack.iter().map(|&(id, _)| id).collect();
        path.push(leaf);

        // Condense: drop emptied nodes bottom-up, never the root itself.
        while path.len() > 1 {
            let node = *path.last().expect("non-empty path");
            if !self.arena.get(node).children.is_empty() {
                break;
            }
            let parent = path[path.len() - 2];
            let index = self
                .arena
                .get(parent)
                .children
                .iter()
                .position(|&child| child == node)
                .expect("node missing from its parent");
            self.arena.get_mut(parent).children.remove(index);
            self.arena.free(node);
            path.pop();
        }

        // Recompute covers up the surviving path.
        for &id in path.iter().rev() {
            let cover = self.arena.bbox_from_children(id);
            self.arena.get_mut(id).bbox = cover;
        }

        self.shrink_root();
        true
    }

    fn shrink_root(&mut self) {
        let root = self.root;
        if self.arena.get(root).children.is_empty() {
            if !self.arena.get(root).is_leaf {
                // Everything was removed out from under an internal root.
                self.arena.free(root);
                self.root = self.arena.alloc(Node::leaf());
            }
            return;
        }
        // An internal root with a single child adds a level for nothing.
        while !self.arena.get(self.root).is_leaf && self.arena.get(self.root).children.len() == 1 {
            let child = self.arena.get(self.root).children[0];
            let old_root = self.root;
            self.arena.free(old_root);
            self.arena.get_mut(child).parent = None;
            self.root = child;
        }
    }
}
