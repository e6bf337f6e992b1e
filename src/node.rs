//! Tree node storage.
//!
//! Nodes live in an arena and refer to each other by index, which gives
//! constant-time parent lookup without reference-counted cycles and makes
//! reparenting a single index write. Point-holders are height-0 nodes that
//! pin a length-1 range of the caller's storage.

use crate::bbox::BBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
pub(crate) struct Node<S> {
    /// 0 for point-holders, 1 for leaves, `h + 1` above height-`h` children.
    pub(crate) height: u32,
    pub(crate) is_leaf: bool,
    pub(crate) bbox: BBox,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Pinned storage range; `Some` only on point-holders.
    pub(crate) data: Option<S>,
}

impl<S> Node<S> {
    pub(crate) fn leaf() -> Self {
        Node {
            height: 1,
            is_leaf: true,
            bbox: BBox::EMPTY,
            parent: None,
            children: Vec::new(),
            data: None,
        }
    }

    pub(crate) fn internal(height: u32) -> Self {
        Node {
            height,
            is_leaf: height == 1,
            bbox: BBox::EMPTY,
            parent: None,
            children: Vec::new(),
            data: None,
        }
    }

    pub(crate) fn holder(bbox: BBox, data: S) -> Self {
        Node {
            height: 0,
            is_leaf: false,
            bbox,
            parent: None,
            children: Vec::new(),
            data: Some(data),
        }
    }
}

/// Slotted arena with a free list. Accessing a freed slot means a broken
/// tree invariant, and panics.
#[derive(Debug)]
pub(crate) struct NodeArena<S> {
    slots: Vec<Option<Node<S>>>,
    free: Vec<usize>,
}

impl<S> NodeArena<S> {
    pub(crate) fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<S>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        let released = self.slots[id.0].take();
        debug_assert!(released.is_some(), "double free of node slot");
        self.free.push(id.0);
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<S> {
        self.slots[id.0].as_ref().expect("access to a freed node")
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.slots[id.0].as_mut().expect("access to a freed node")
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Post-order pass setting every cached bbox in the subtree under `id`
    /// to the union of its children. Point-holder bboxes are the source of
    /// truth and are left untouched.
    pub(crate) fn compute_bbox_downwards(&mut self, id: NodeId) -> BBox {
        let node = self.get(id);
        if node.height == 0 {
            return node.bbox;
        }
        let count = node.children.len();
        let mut bbox = BBox::EMPTY;
        for idx in 0..count {
            let child = self.get(id).children[idx];
            let child_bbox = self.compute_bbox_downwards(child);
            bbox = bbox.extend(&child_bbox);
        }
        self.get_mut(id).bbox = bbox;
        bbox
    }

    /// Union of the current child bboxes of `id`, without descending.
    pub(crate) fn bbox_from_children(&self, id: NodeId) -> BBox {
        let mut bbox = BBox::EMPTY;
        for &child in &self.get(id).children {
            bbox = bbox.extend(&self.get(child).bbox);
        }
        bbox
    }

    /// Collect every point-holder in the subtree under `id`.
    pub(crate) fn flatten_downwards(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            let node = self.get(current);
            if node.is_leaf {
                out.extend_from_slice(&node.children);
            } else {
                frontier.extend_from_slice(&node.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_reuses_freed_slots() {
        let mut arena: NodeArena<&mut [[f64; 4]]> = NodeArena::new();
        let a = arena.alloc(Node::leaf());
        let b = arena.alloc(Node::internal(2));
        assert_eq!(arena.live_count(), 2);

        arena.free(a);
        assert_eq!(arena.live_count(), 1);

        let c = arena.alloc(Node::leaf());
        assert_eq!(c, a);
        assert_ne!(c, b);
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    #[should_panic(expected = "access to a freed node")]
    fn test_freed_access_panics() {
        let mut arena: NodeArena<&mut [[f64; 4]]> = NodeArena::new();
        let a = arena.alloc(Node::leaf());
        arena.free(a);
        let _ = arena.get(a);
    }
}
