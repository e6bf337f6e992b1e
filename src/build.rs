//! Bulk loading.
//!
//! Packs a storage range into a subtree top-down: pick the target height,
//! carve the range into vertical slabs by x, carve each slab into groups by
//! y, and recurse per group. Both carving steps use the bucket partial sort,
//! so no level ever fully sorts its input.
//!
//! High subtrees are built on worker threads. Each worker owns a disjoint
//! storage range (the bucket partition guarantees disjointness) and emits a
//! [`BuiltNode`]; the scope join is the outstanding-work barrier. Grafting
//! into the arena and the bbox pass run sequentially afterwards.

use std::thread::{Scope, ScopedJoinHandle};

use crate::axis::{Axis, AxisSorter};
use crate::bbox::BBox;
use crate::data::SpatialData;
use crate::node::{Node, NodeArena, NodeId};
use crate::tree::TreeOptions;

/// Children of a node above this height are built on their own workers;
/// below it, sorting a handful of rectangles inline is cheaper than a
/// thread handoff.
pub(crate) const SPLIT_HEIGHT: u32 = 5;

/// A subtree emitted by a build worker, not yet living in the arena.
pub(crate) enum BuiltNode<S> {
    Internal {
        height: u32,
        children: Vec<BuiltNode<S>>,
    },
    Leaf {
        entries: Vec<(BBox, S)>,
    },
}

enum Staged<'scope, S> {
    Ready(BuiltNode<S>),
    Task(ScopedJoinHandle<'scope, BuiltNode<S>>),
}

impl<S: SpatialData> BuiltNode<S> {
    /// Materialize this subtree in the arena, wiring parent links. Cached
    /// bboxes are filled by the caller's downward pass afterwards.
    pub(crate) fn graft_into(self, arena: &mut NodeArena<S>) -> NodeId {
        match self {
            BuiltNode::Leaf { entries } => {
                let leaf = arena.alloc(Node::leaf());
                for (bbox, data) in entries {
                    let holder = arena.alloc(Node::holder(bbox, data));
                    arena.get_mut(holder).parent = Some(leaf);
                    arena.get_mut(leaf).children.push(holder);
                }
                leaf
            }
            BuiltNode::Internal { height, children } => {
                let id = arena.alloc(Node::internal(height));
                for child in children {
                    let child_id = child.graft_into(arena);
                    arena.get_mut(child_id).parent = Some(id);
                    arena.get_mut(id).children.push(child_id);
                }
                id
            }
        }
    }
}

/// Smallest height whose full tree holds `n` entries: `ceil(log_M n)`,
/// computed without floating point so exact powers of M stay exact.
pub(crate) fn target_height(n: usize, max_entries: usize) -> u32 {
    let mut height = 1;
    let mut capacity = max_entries;
    while capacity < n {
        capacity = capacity.saturating_mul(max_entries);
        height += 1;
    }
    height
}

pub(crate) fn build_subtree<S: SpatialData>(
    options: &TreeOptions,
    data: S,
    presorted: bool,
) -> BuiltNode<S> {
    let height = target_height(data.len(), options.max_entries());
    std::thread::scope(|scope| build_node(options, data, height, presorted, scope))
}

fn build_node<'scope, 'env, S>(
    options: &'env TreeOptions,
    mut data: S,
    height: u32,
    skip_x_sort: bool,
    scope: &'scope Scope<'scope, 'env>,
) -> BuiltNode<S>
where
    S: SpatialData + 'env,
{
    let n = data.len();
    if n <= options.max_entries() {
        return build_leaf(data);
    }

    // Slab count along x for this node, then the per-group and per-slab
    // widths that realize it.
    let slabs = (n as f64 / (options.max_entries() as f64).powi(height as i32 - 1)).ceil();
    let group = (n as f64 / slabs).ceil() as usize;
    let slab_width = group * (slabs.sqrt().ceil() as usize);

    if !skip_x_sort {
        AxisSorter::new(&mut data, 0, n, Axis::X).sort_runs(slab_width);
    }

    let mut sizes = Vec::new();
    let mut slab_start = 0;
    while slab_start < n {
        let slab_end = (slab_start + slab_width).min(n);
        AxisSorter::new(&mut data, slab_start, slab_end, Axis::Y).sort_runs(group);
        let mut group_start = slab_start;
        while group_start < slab_end {
            sizes.push((group_start + group).min(slab_end) - group_start);
            group_start += group;
        }
        slab_start = slab_end;
    }

    // Hand each group ownership of its storage range.
    let mut chunks = Vec::with_capacity(sizes.len());
    for &size in &sizes[..sizes.len() - 1] {
        let (head, rest) = data.split_at(size);
        chunks.push(head);
        data = rest;
    }
    chunks.push(data);

    let fan_out = height > SPLIT_HEIGHT;
    let staged: Vec<Staged<'scope, S>> = chunks
        .into_iter()
        .map(|chunk| {
            if fan_out {
                Staged::Task(scope.spawn(move || build_node(options, chunk, height - 1, false, scope)))
            } else {
                Staged::Ready(build_node(options, chunk, height - 1, false, scope))
            }
        })
        .collect();

    let children = staged
        .into_iter()
        .map(|staged| match staged {
            Staged::Ready(built) => built,
            Staged::Task(handle) => handle.join().expect("bulk-build worker panicked"),
        })
        .collect();

    BuiltNode::Internal { height, children }
}

fn build_leaf<S: SpatialData>(mut data: S) -> BuiltNode<S> {
    let mut entries = Vec::with_capacity(data.len());
    while data.len() > 1 {
        let (head, rest) = data.split_at(1);
        entries.push((head.bbox_at(0), head));
        data = rest;
    }
    if data.len() == 1 {
        entries.push((data.bbox_at(0), data));
    }
    BuiltNode::Leaf { entries }
}
