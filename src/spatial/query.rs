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

use crate::{
    geometry::{Bound, Extent, Ray, Vector3},
    mesh::handles::FaceId,
    numeric::Scalar,
    spatial::{
        octree::{LooseOctree, NodeId},
        sphere::BoundingSpheres,
    },
};

/// A shape the octree can be queried with.
pub trait SpatialQuery<T: Scalar> {
    fn intersect_extent(&self, extent: &Extent<T>) -> bool;

    fn intersect_bound(&self, bound: &Bound<T>) -> bool {
        self.intersect_extent(&bound.extent())
    }

    fn intersect_sphere(&self, center: &Vector3<T>, radius: T, radius2: T) -> bool;
}

impl<T: Scalar> SpatialQuery<T> for Ray<T> {
    fn intersect_extent(&self, extent: &Extent<T>) -> bool {
        Ray::intersect_extent(self, extent)
    }

    fn intersect_bound(&self, bound: &Bound<T>) -> bool {
        Ray::intersect_bound(self, bound)
    }

    fn intersect_sphere(&self, center: &Vector3<T>, _radius: T, radius2: T) -> bool {
        Ray::intersect_sphere(self, center, radius2)
    }
}

impl<T: Scalar> SpatialQuery<T> for Extent<T> {
    fn intersect_extent(&self, extent: &Extent<T>) -> bool {
        self.intersects(extent)
    }

    fn intersect_sphere(&self, center: &Vector3<T>, _radius: T, radius2: T) -> bool {
        self.distance2_to(center) <= radius2
    }
}

impl<T: Scalar> SpatialQuery<T> for Bound<T> {
    fn intersect_extent(&self, extent: &Extent<T>) -> bool {
        self.extent().intersects(extent)
    }

    fn intersect_sphere(&self, center: &Vector3<T>, _radius: T, radius2: T) -> bool {
        self.extent().distance2_to(center) <= radius2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prune {
    Extent,
    Bound,
}

/// Lazy walk over the spheres a query shape touches.
///
/// Each call site gets its own explicit stack, so independent walks can run
/// side by side over the same tree.
pub struct OctreeHits<'a, T, Q: ?Sized> {
    tree: &'a LooseOctree<T>,
    spheres: &'a BoundingSpheres<T>,
    shape: &'a Q,
    prune: Prune,
    stack: Vec<NodeId>,
    current: Option<(NodeId, usize)>,
}

impl<'a, T: Scalar, Q: SpatialQuery<T> + ?Sized> OctreeHits<'a, T, Q> {
    pub(crate) fn new(
        tree: &'a LooseOctree<T>,
        spheres: &'a BoundingSpheres<T>,
        shape: &'a Q,
        prune: Prune,
    ) -> Self {
        let mut hits = Self {
            tree,
            spheres,
            shape,
            prune,
            stack: Vec::with_capacity(32),
            current: None,
        };
        if hits.passes(NodeId::ROOT) {
            hits.stack.push(NodeId::ROOT);
        }
        hits
    }

    fn passes(&self, node: NodeId) -> bool {
        match self.prune {
            Prune::Extent => self.shape.intersect_extent(&self.tree.loose_extent(node)),
            Prune::Bound => self.shape.intersect_bound(&self.tree.bound(node).loose()),
        }
    }
}

impl<T: Scalar, Q: SpatialQuery<T> + ?Sized> Iterator for OctreeHits<'_, T, Q> {
    type Item = FaceId;

    fn next(&mut self) -> Option<FaceId> {
        let tree = self.tree;
        loop {
            if let Some((node, i)) = self.current {
                let entries = tree.entries(node);
                if let Some(&f) = entries.get(i) {
                    self.current = Some((node, i + 1));
                    let center = self.spheres.center(f);
                    if self
                        .shape
                        .intersect_sphere(&center, self.spheres.radius(f), self.spheres.radius2(f))
                    {
                        return Some(f);
                    }
                    continue;
                }
                self.current = None;
                for &child in tree.children(node).iter().rev().flatten() {
                    if self.passes(child) {
                        self.stack.push(child);
                    }
                }
            }
            let node = self.stack.pop()?;
            self.current = Some((node, 0));
        }
    }
}
