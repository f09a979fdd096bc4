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
use smallvec::SmallVec;

use crate::{
    impl_topology,
    mesh::handles::{FaceId, HalfEdgeId, VertexId},
};

impl_topology! {
    /// Connects selected vertices that share a face with new edges.
    ///
    /// On every face holding two or more of `vertices`, consecutive selected
    /// corners that are not already neighbours get a diagonal. Returns the
    /// inserted half-edges; pairs that cannot be connected are skipped.
    pub fn connect_vertex(&mut self, vertices: &[VertexId]) -> Vec<HalfEdgeId> {
        let selected: AHashSet<VertexId> = vertices.iter().copied().collect();
        let mut faces: Vec<FaceId> = Vec::new();
        for &v in vertices {
            for f in self.vertex_faces(v) {
                if !faces.contains(&f) {
                    faces.push(f);
                }
            }
        }

        let mut inserted = Vec::new();
        for f in faces {
            let mut corners: SmallVec<[HalfEdgeId; 8]> = self
                .face_half_edges(f)
                .filter(|&h| selected.contains(&self.origin(h)))
                .collect();
            let k = corners.len();
            if k < 2 {
                continue;
            }
            let pairs = if k == 2 { 1 } else { k };
            for i in 0..pairs {
                let (a, b) = (corners[i], corners[(i + 1) % k]);
                if self.next(a) == b || self.face_of(a) != self.face_of(b) {
                    continue;
                }
                let prev = self.prev(a);
                if let Some(out) = self.insert_edge(prev, b) {
                    corners[i] = out;
                    inserted.push(out);
                }
            }
        }
        inserted
    }
}
