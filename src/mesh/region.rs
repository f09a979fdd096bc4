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
use smallvec::SmallVec;

use crate::{
    impl_topology,
    mesh::handles::{FaceId, HalfEdgeId, VertexId},
};

impl_topology! {
    /// Splits faces into connected groups, starting from `seeds` in order and
    /// spreading across a half-edge whenever `crosses(h, neighbour)` holds.
    pub(crate) fn flood_faces(
        &self,
        seeds: impl IntoIterator<Item = FaceId>,
        crosses: impl Fn(HalfEdgeId, FaceId) -> bool,
    ) -> Vec<Vec<FaceId>> {
        let mut grouped: AHashSet<FaceId> = AHashSet::new();
        let mut groups = Vec::new();
        for seed in seeds {
            if !self.is_face_live(seed) || !grouped.insert(seed) {
                continue;
            }
            let mut group = vec![seed];
            let mut at = 0;
            while at < group.len() {
                let f = group[at];
                at += 1;
                for h in self.face_half_edges(f) {
                    let Some(g) = self.face_of(h.pair()) else {
                        continue;
                    };
                    if crosses(h, g) && grouped.insert(g) {
                        group.push(g);
                    }
                }
            }
            groups.push(group);
        }
        groups
    }

    /// Merges each connected group of `faces` into a single face over the
    /// group's outline.
    ///
    /// Vertices inside a group go away with the edges between its faces. A
    /// group with more than one border loop, or whose border touches itself,
    /// is left alone. Returns the merged faces, or `None` if no group merged.
    pub fn dissolve_faces(&mut self, faces: &[FaceId]) -> Option<Vec<FaceId>> {
        let region: AHashSet<FaceId> = faces.iter().copied().collect();
        let mut seeds = faces.to_vec();
        seeds.sort_unstable();
        let groups = self.flood_faces(seeds, |_, g| region.contains(&g));

        self.atomic(|t| {
            let mut merged = Vec::new();
            for group in groups.iter().filter(|g| g.len() > 1) {
                let contours = t.find_contours(group);
                let [contour] = &contours[..] else {
                    debug!("dissolve_faces: group of {} has {} borders", group.len(), contours.len());
                    continue;
                };
                let outline: SmallVec<[VertexId; 8]> =
                    contour.iter().map(|edge| t.origin(edge.outer)).collect();
                let border: AHashSet<VertexId> = outline.iter().copied().collect();
                if border.len() != outline.len() {
                    debug!("dissolve_faces: border of {:?} touches itself", group[0]);
                    continue;
                }
                let mut inside: Vec<VertexId> = group
                    .iter()
                    .flat_map(|&f| t.face_vertices(f))
                    .filter(|v| !border.contains(v))
                    .collect();
                inside.sort_unstable();
                inside.dedup();

                for &f in group {
                    t.make_hole(f);
                }
                for v in inside {
                    if t.out_edge(v).is_some() {
                        return None;
                    }
                    t.free_vertex(v);
                }
                merged.push(t.add_polygon(&outline)?);
            }
            (!merged.is_empty()).then_some(merged)
        })
    }

    /// Shrinks each face to one vertex at its center by collapsing its edges.
    ///
    /// Faces are handled one at a time; one that cannot be collapsed all the way
    /// is left as it was. Returns the surviving vertices.
    pub fn collapse_faces(&mut self, faces: &[FaceId]) -> Vec<VertexId> {
        let mut kept = Vec::new();
        for &f in faces {
            if !self.is_face_live(f) {
                continue;
            }
            match self.atomic(|t| t.collapse_one_face(f)) {
                Some(v) => kept.push(v),
                None => debug!("collapse_faces {f:?}: skipped"),
            }
        }
        kept
    }

    fn collapse_one_face(&mut self, f: FaceId) -> Option<VertexId> {
        let center = self.face_center(f);
        let mut group = self.face_vertices(f);
        while group.len() > 1 {
            let mut step = None;
            'search: for (i, &a) in group.iter().enumerate() {
                for &b in &group {
                    if let Some(h) = self.find_half_edge(a, b) {
                        if self.can_collapse(h) {
                            step = Some((i, h));
                            break 'search;
                        }
                    }
                }
            }
            let (i, h) = step?;
            self.collapse(h)?;
            group.remove(i);
        }
        let v = group[0];
        self.set_position(v, center);
        Some(v)
    }
}
