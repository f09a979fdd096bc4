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
    geometry::Vector3,
    mesh::{handles::FaceId, topology::WingedTopology},
    numeric::Scalar,
    spatial::octree::NodeId,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<T> {
    pub center: Vector3<T>,
    pub radius: T,
}

/// Sphere around a polygon: centered on the corner average, reaching the
/// farthest corner.
pub fn compute_sphere<T: Scalar>(topology: &WingedTopology<T>, f: FaceId) -> Sphere<T> {
    let center = topology.face_center(f);
    let radius = topology
        .face_vertices(f)
        .iter()
        .map(|&v| topology.position(v).distance(&center))
        .fold(T::zero(), T::max);
    Sphere { center, radius }
}

/// Per-face bounding spheres, indexed by face slot.
///
/// Centers are packed into one buffer; radius and squared radius are cached
/// side by side. `owner` is the octree node currently holding the sphere.
#[derive(Clone, Debug, Default)]
pub struct BoundingSpheres<T> {
    centers: Vec<T>,
    radius: Vec<T>,
    radius2: Vec<T>,
    owner: Vec<Option<NodeId>>,
}

impl<T: Scalar> BoundingSpheres<T> {
    pub fn new() -> Self {
        Self {
            centers: Vec::new(),
            radius: Vec::new(),
            radius2: Vec::new(),
            owner: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    fn ensure(&mut self, f: FaceId) {
        let len = f.index() + 1;
        if len > self.radius.len() {
            self.centers.resize(len * 3, T::zero());
            self.radius.resize(len, T::zero());
            self.radius2.resize(len, T::zero());
            self.owner.resize(len, None);
        }
    }

    pub fn set(&mut self, f: FaceId, sphere: Sphere<T>) {
        self.ensure(f);
        let i = f.index();
        self.centers[i * 3..i * 3 + 3].copy_from_slice(&sphere.center.to_array());
        self.radius[i] = sphere.radius;
        self.radius2[i] = sphere.radius * sphere.radius;
    }

    /// Resets a slot whose face has been freed.
    pub fn clear(&mut self, f: FaceId) {
        if f.index() < self.len() {
            self.set(f, Sphere { center: Vector3::zero(), radius: T::zero() });
            self.owner[f.index()] = None;
        }
    }

    #[inline]
    pub fn center(&self, f: FaceId) -> Vector3<T> {
        let i = f.index() * 3;
        Vector3::new(self.centers[i], self.centers[i + 1], self.centers[i + 2])
    }

    #[inline]
    pub fn radius(&self, f: FaceId) -> T {
        self.radius[f.index()]
    }

    #[inline]
    pub fn radius2(&self, f: FaceId) -> T {
        self.radius2[f.index()]
    }

    #[inline]
    pub fn owner(&self, f: FaceId) -> Option<NodeId> {
        self.owner.get(f.index()).copied().flatten()
    }

    pub(crate) fn set_owner(&mut self, f: FaceId, node: Option<NodeId>) {
        self.ensure(f);
        self.owner[f.index()] = node;
    }

    pub(crate) fn clear_owners(&mut self) {
        self.owner.fill(None);
    }

    /// Packed centers, three scalars per face slot.
    pub fn centers(&self) -> &[T] {
        &self.centers
    }
}
