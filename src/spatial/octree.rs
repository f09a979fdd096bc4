// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Loose octree over face bounding spheres.
//!
//! A node starts as a leaf accumulating spheres. Once a leaf holds
//! `split_threshold` spheres it becomes a split node and redistributes them:
//! each sphere descends into the octant containing its center as long as the
//! sphere stays inside that child's loose bound, and otherwise lands in the
//! node's tail list. Queries prune against loose bounds only.

use std::mem;

use log::debug;

use crate::{
    geometry::{Bound, Extent, Vector3},
    mesh::handles::FaceId,
    numeric::Scalar,
    spatial::{
        query::{OctreeHits, Prune, SpatialQuery},
        sphere::BoundingSpheres,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OctreeParams {
    /// Sphere count at which a leaf splits.
    pub split_threshold: usize,
    /// Nodes at this depth never split.
    pub max_depth: u32,
}

impl Default for OctreeParams {
    fn default() -> Self {
        Self {
            split_threshold: 88,
            max_depth: 16,
        }
    }
}

#[derive(Clone, Debug)]
enum Content {
    Leaf(Vec<FaceId>),
    Split {
        children: [Option<NodeId>; 8],
        tail: Vec<FaceId>,
    },
}

#[derive(Clone, Debug)]
struct Node<T> {
    bound: Bound<T>,
    depth: u32,
    content: Content,
}

#[derive(Clone, Debug)]
pub struct LooseOctree<T> {
    nodes: Vec<Node<T>>,
    params: OctreeParams,
}

impl<T: Scalar> LooseOctree<T> {
    pub fn new(bound: Bound<T>, params: OctreeParams) -> Self {
        Self {
            nodes: vec![Node {
                bound,
                depth: 0,
                content: Content::Leaf(Vec::new()),
            }],
            params,
        }
    }

    pub fn params(&self) -> OctreeParams {
        self.params
    }

    pub fn root_bound(&self) -> &Bound<T> {
        &self.nodes[0].bound
    }

    pub fn bound(&self, node: NodeId) -> &Bound<T> {
        &self.nodes[node.index()].bound
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node level.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn is_split(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.index()].content, Content::Split { .. })
    }

    /// Spheres stored directly on a node: its list if a leaf, its tail if split.
    pub fn entries(&self, node: NodeId) -> &[FaceId] {
        match &self.nodes[node.index()].content {
            Content::Leaf(list) => list,
            Content::Split { tail, .. } => tail,
        }
    }

    pub fn children(&self, node: NodeId) -> &[Option<NodeId>] {
        match &self.nodes[node.index()].content {
            Content::Leaf(_) => &[],
            Content::Split { children, .. } => children,
        }
    }

    /// Number of spheres stored anywhere in the tree.
    pub fn len(&self) -> usize {
        (0..self.nodes.len())
            .map(|i| self.entries(NodeId(i as u32)).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a sphere still belongs to `node`.
    pub fn is_inside(&self, node: NodeId, center: &Vector3<T>, radius: T) -> bool {
        self.bound(node).holds_sphere(center, radius)
    }

    /// Inserts the sphere of `f` from the root and returns the node that ends up
    /// holding it.
    pub fn insert(&mut self, spheres: &mut BoundingSpheres<T>, f: FaceId) -> NodeId {
        self.insert_from(spheres, NodeId::ROOT, f)
    }

    fn insert_from(
        &mut self,
        spheres: &mut BoundingSpheres<T>,
        mut node: NodeId,
        f: FaceId,
    ) -> NodeId {
        let center = spheres.center(f);
        let radius = spheres.radius(f);
        loop {
            let at = &self.nodes[node.index()];
            let step = match &at.content {
                Content::Leaf(_) => None,
                Content::Split { children, .. } => Some(
                    at.bound
                        .octant(&center, radius)
                        .map(|(i, bound)| (i, children[i], bound)),
                ),
            };
            match step {
                None => {
                    let depth = at.depth;
                    let mut full = false;
                    if let Content::Leaf(list) = &mut self.nodes[node.index()].content {
                        list.push(f);
                        full = list.len() >= self.params.split_threshold;
                    }
                    spheres.set_owner(f, Some(node));
                    if full && depth < self.params.max_depth {
                        return self.split(spheres, node, f);
                    }
                    return node;
                }
                Some(None) => {
                    if let Content::Split { tail, .. } = &mut self.nodes[node.index()].content {
                        tail.push(f);
                    }
                    spheres.set_owner(f, Some(node));
                    return node;
                }
                Some(Some((_, Some(child), _))) => node = child,
                Some(Some((i, None, bound))) => {
                    let child = NodeId(self.nodes.len() as u32);
                    let depth = at.depth + 1;
                    self.nodes.push(Node {
                        bound,
                        depth,
                        content: Content::Leaf(Vec::new()),
                    });
                    if let Content::Split { children, .. } = &mut self.nodes[node.index()].content {
                        children[i] = Some(child);
                    }
                    node = child;
                }
            }
        }
    }

    /// Turns a full leaf into a split node and redistributes its spheres.
    /// Returns the node that ends up holding `f`.
    fn split(&mut self, spheres: &mut BoundingSpheres<T>, node: NodeId, f: FaceId) -> NodeId {
        let split = Content::Split {
            children: [None; 8],
            tail: Vec::new(),
        };
        let list = match mem::replace(&mut self.nodes[node.index()].content, split) {
            Content::Leaf(list) => list,
            other => {
                self.nodes[node.index()].content = other;
                return node;
            }
        };
        debug!(
            "octree: splitting {:?} at depth {} ({} spheres)",
            node,
            self.nodes[node.index()].depth,
            list.len()
        );
        let mut owner = node;
        for g in list {
            let at = self.insert_from(spheres, node, g);
            if g == f {
                owner = at;
            }
        }
        owner
    }

    /// Removes the sphere of `f` from the node that owns it.
    ///
    /// # Panics
    /// If `f` is not owned by any node, or its owner does not list it.
    pub fn remove(&mut self, spheres: &mut BoundingSpheres<T>, f: FaceId) {
        let Some(node) = spheres.owner(f) else {
            panic!("octree: {f:?} is not in the tree");
        };
        let list = match &mut self.nodes[node.index()].content {
            Content::Leaf(list) => list,
            Content::Split { tail, .. } => tail,
        };
        let Some(pos) = list.iter().position(|&g| g == f) else {
            panic!("octree: {f:?} claims {node:?} but is not listed there");
        };
        list.remove(pos);
        spheres.set_owner(f, None);
    }

    /// First sphere listed twice anywhere in the tree, if any.
    pub fn find_duplicate(&self) -> Option<FaceId> {
        let mut seen = ahash::AHashSet::new();
        (0..self.nodes.len())
            .flat_map(|i| self.entries(NodeId(i as u32)).iter().copied())
            .find(|&f| !seen.insert(f))
    }

    /// Verifies that every listed sphere is owned by its node and sits inside it.
    pub fn check(&self, spheres: &BoundingSpheres<T>) -> bool {
        if self.find_duplicate().is_some() {
            return false;
        }
        (0..self.nodes.len()).all(|i| {
            let node = NodeId(i as u32);
            self.entries(node).iter().all(|&f| {
                spheres.owner(f) == Some(node)
                    && self.is_inside(node, &spheres.center(f), spheres.radius(f))
            })
        })
    }

    /// Spheres possibly hit by `shape`, pruning nodes by their loose extent.
    pub fn intersect_extent<'a, Q: SpatialQuery<T> + ?Sized>(
        &'a self,
        spheres: &'a BoundingSpheres<T>,
        shape: &'a Q,
    ) -> OctreeHits<'a, T, Q> {
        OctreeHits::new(self, spheres, shape, Prune::Extent)
    }

    /// Like [`intersect_extent`](Self::intersect_extent), pruning by loose bound.
    pub fn intersect_bound<'a, Q: SpatialQuery<T> + ?Sized>(
        &'a self,
        spheres: &'a BoundingSpheres<T>,
        shape: &'a Q,
    ) -> OctreeHits<'a, T, Q> {
        OctreeHits::new(self, spheres, shape, Prune::Bound)
    }

    pub(crate) fn loose_extent(&self, node: NodeId) -> Extent<T> {
        self.bound(node).loose_extent()
    }
}
