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

use ahash::AHashSet;
use log::debug;

use crate::{
    geometry::{Bound, Extent, Vector3},
    mesh::handles::FaceId,
    numeric::Scalar,
    spatial::{
        octree::{LooseOctree, OctreeParams},
        query::{OctreeHits, SpatialQuery},
        sphere::BoundingSpheres,
    },
};

/// Lazily maintained octree over the face spheres of one mesh.
///
/// Faces that are new or whose sphere left its node wait in a queue and are
/// only placed when [`update`](Bvh::update) runs, typically right before a query.
#[derive(Clone, Debug)]
pub struct Bvh<T> {
    tree: Option<LooseOctree<T>>,
    queue: Vec<FaceId>,
    queued: AHashSet<FaceId>,
    params: OctreeParams,
}

impl<T: Scalar> Bvh<T> {
    pub fn new(params: OctreeParams) -> Self {
        Self {
            tree: None,
            queue: Vec::new(),
            queued: AHashSet::new(),
            params,
        }
    }

    pub fn is_built(&self) -> bool {
        self.tree.is_some()
    }

    pub fn tree(&self) -> Option<&LooseOctree<T>> {
        self.tree.as_ref()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Root bound for a set of spheres: centered on the mean center, wide
    /// enough to hold every sphere. No axis is narrower than half the widest
    /// span, so flat sets still give the children room to descend.
    pub fn root_bound(spheres: &BoundingSpheres<T>, faces: &[FaceId]) -> Bound<T> {
        let mut extent = Extent::empty();
        let mut sum = Vector3::zero();
        let mut count = 0usize;
        for &f in faces {
            let c = spheres.center(f);
            extent.expand_sphere(&c, spheres.radius(f));
            sum += c;
            count += 1;
        }
        if count == 0 {
            return Bound::new(Vector3::zero(), Vector3::zero());
        }
        let center = sum * (T::one() / T::lit(count as f64));
        let span = extent.max - extent.min;
        let floor = span.x.max(span.y).max(span.z) * T::half();
        let half = (extent.max - center)
            .component_max(&(center - extent.min))
            .component_max(&Vector3::splat(floor));
        Bound::new(center, half)
    }

    /// Builds a fresh tree holding exactly `faces`.
    pub fn init(&mut self, spheres: &mut BoundingSpheres<T>, faces: &[FaceId]) {
        let bound = Self::root_bound(spheres, faces);
        let mut tree = LooseOctree::new(bound, self.params);
        spheres.clear_owners();
        for &f in faces {
            tree.insert(spheres, f);
        }
        debug!(
            "bvh: built {} nodes, depth {}, {} spheres",
            tree.node_count(),
            tree.depth(),
            tree.len()
        );
        self.tree = Some(tree);
        self.queue.clear();
        self.queued.clear();
    }

    pub fn rebuild(&mut self, spheres: &mut BoundingSpheres<T>, faces: &[FaceId]) {
        self.tree = None;
        self.init(spheres, faces);
    }

    /// Queues a face whose sphere is not in the tree yet.
    pub fn insert_face(&mut self, f: FaceId) {
        if self.queued.insert(f) {
            self.queue.push(f);
        }
    }

    /// Re-checks a face whose sphere changed. A sphere that no longer fits its
    /// node is taken out and queued.
    pub fn move_sphere(&mut self, spheres: &mut BoundingSpheres<T>, f: FaceId) {
        let Some(node) = spheres.owner(f) else {
            self.insert_face(f);
            return;
        };
        let Some(tree) = self.tree.as_mut() else {
            self.insert_face(f);
            return;
        };
        if !tree.is_inside(node, &spheres.center(f), spheres.radius(f)) {
            tree.remove(spheres, f);
            self.insert_face(f);
        }
    }

    /// Drops a face from the tree or from the queue, wherever it is.
    pub fn remove_face(&mut self, spheres: &mut BoundingSpheres<T>, f: FaceId) {
        if self.queued.remove(&f) {
            self.queue.retain(|&g| g != f);
        }
        if let (Some(_), Some(tree)) = (spheres.owner(f), self.tree.as_mut()) {
            tree.remove(spheres, f);
        }
    }

    /// Places every queued face. If one of them escapes the root bound the tree
    /// is rebuilt from `live_faces()`, which must list every live face.
    ///
    /// Returns `true` when a rebuild happened.
    pub fn update(
        &mut self,
        spheres: &mut BoundingSpheres<T>,
        live_faces: impl FnOnce() -> Vec<FaceId>,
    ) -> bool {
        let escaped = match &self.tree {
            None => true,
            Some(tree) => self
                .queue
                .iter()
                .any(|&f| !tree.root_bound().holds_sphere(&spheres.center(f), spheres.radius(f))),
        };
        if escaped {
            self.rebuild(spheres, &live_faces());
            return true;
        }
        if let Some(tree) = self.tree.as_mut() {
            for &f in &self.queue {
                tree.insert(spheres, f);
            }
        }
        self.queue.clear();
        self.queued.clear();
        false
    }

    /// Spheres touched by `shape`. Queued faces are not visible until
    /// [`update`](Self::update) runs.
    pub fn intersect_extent<'a, Q: SpatialQuery<T> + ?Sized>(
        &'a self,
        spheres: &'a BoundingSpheres<T>,
        shape: &'a Q,
    ) -> Option<OctreeHits<'a, T, Q>> {
        self.tree.as_ref().map(|tree| tree.intersect_extent(spheres, shape))
    }

    pub fn intersect_bound<'a, Q: SpatialQuery<T> + ?Sized>(
        &'a self,
        spheres: &'a BoundingSpheres<T>,
        shape: &'a Q,
    ) -> Option<OctreeHits<'a, T, Q>> {
        self.tree.as_ref().map(|tree| tree.intersect_bound(spheres, shape))
    }
}
