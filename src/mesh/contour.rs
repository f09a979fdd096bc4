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
    mesh::handles::{EdgeId, FaceId, HalfEdgeId, VertexId},
};

/// One edge on the border of a face region.
///
/// `outer` is the region side half-edge found by `find_contours`; `inner` is
/// filled in by `lift_contours` with the matching edge of the lifted copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContourEdge {
    pub outer: HalfEdgeId,
    pub inner: Option<HalfEdgeId>,
}

pub type Contour = Vec<ContourEdge>;

impl_topology! {
    /// Border loops of the region formed by `faces`, each in face order.
    pub fn find_contours(&self, faces: &[FaceId]) -> Vec<Contour> {
        let selected: AHashSet<FaceId> = faces.iter().copied().collect();
        let in_region = |f: Option<FaceId>| f.is_some_and(|f| selected.contains(&f));
        let mut seen: AHashSet<HalfEdgeId> = AHashSet::new();
        let mut contours = Vec::new();

        for &f in faces {
            for start in self.face_half_edges(f) {
                if seen.contains(&start) || in_region(self.face_of(start.pair())) {
                    continue;
                }
                let mut contour = Contour::new();
                let mut current = start;
                loop {
                    let mut next_in = self.next(current).pair();
                    while next_in != current && in_region(self.face_of(next_in)) {
                        next_in = self.next(next_in).pair();
                    }
                    contour.push(ContourEdge {
                        outer: current,
                        inner: None,
                    });
                    seen.insert(current);
                    current = next_in.pair();
                    if current == start {
                        break;
                    }
                }
                contours.push(contour);
            }
        }
        contours
    }

    /// One contour per face, for insetting faces individually.
    pub fn find_inset_contours(&self, faces: &[FaceId]) -> Vec<Contour> {
        faces
            .iter()
            .map(|&f| {
                self.face_half_edges(f)
                    .map(|outer| ContourEdge { outer, inner: None })
                    .collect()
            })
            .collect()
    }

    /// Detaches the regions bordered by `contours` onto fresh copies of their
    /// border vertices, leaving the old border as an open boundary loop.
    pub fn lift_contours(&mut self, contours: &mut [Contour]) -> bool {
        self.atomic(|t| {
            for contour in contours.iter_mut() {
                let first = t.add_vertex(t.position(t.origin(contour[0].outer)));
                let mut from = first;
                let last = contour.len() - 1;
                for (i, edge) in contour.iter_mut().enumerate() {
                    let to = if i == last {
                        first
                    } else {
                        t.add_vertex(t.position(t.destination(edge.outer)))
                    };
                    edge.inner = Some(t.add_edge(from, to)?);
                    from = to;
                }
            }

            for contour in contours.iter() {
                let mut edge0 = contour[contour.len() - 1];
                for &edge1 in contour {
                    let (inner0, inner1) = (edge0.inner?, edge1.inner?);
                    let outer_next = t.next(edge0.outer);
                    if outer_next != edge1.outer {
                        let outer1_prev = t.prev(edge1.outer);
                        t.set_next(edge0.outer, edge1.outer);
                        t.set_next(inner0, outer_next);
                        t.set_next(outer1_prev, inner1);
                        let lifted = t.origin(inner1);
                        let mut spoke = outer_next;
                        while spoke != inner1 {
                            let v = t.origin(spoke);
                            if t.out_edge(v) == Some(spoke) {
                                t.set_out_edge(v, Some(edge1.outer));
                            }
                            t.set_origin(spoke, lifted);
                            spoke = t.next(spoke.pair());
                        }
                    }
                    edge0 = edge1;

                    let f = t.face_of(edge1.outer);
                    t.set_face(inner1, f);
                    t.set_face(edge1.outer, None);
                    if let Some(f) = f {
                        if t.face_anchor(f) == edge1.outer {
                            t.set_anchor(f, inner1);
                        }
                    }
                }
            }
            Some(())
        })
        .is_some()
    }

    /// Bridges each lifted contour back to its old border with quads.
    ///
    /// Returns, per contour edge, the new half-edge from the lifted vertex to
    /// the border vertex it was copied from.
    pub fn extrude_contours(&mut self, contours: &[Contour]) -> Option<Vec<HalfEdgeId>> {
        self.atomic(|t| {
            let mut rails = Vec::new();
            for contour in contours {
                for edge in contour {
                    let inner = edge.inner?;
                    let quad = [
                        t.origin(inner),
                        t.origin(edge.outer),
                        t.destination(edge.outer),
                        t.destination(inner),
                    ];
                    t.add_polygon(&quad)?;
                    rails.push(t.find_half_edge(quad[0], quad[1])?);
                }
            }
            Some(rails)
        })
    }

    /// Extrudes a face region in place: the new side walls have zero height
    /// until the lifted vertices are moved.
    pub fn extrude_faces(&mut self, faces: &[FaceId]) -> Option<Vec<HalfEdgeId>> {
        let mut contours = self.find_contours(faces);
        if contours.is_empty() {
            return None;
        }
        self.atomic(|t| {
            if !t.lift_contours(&mut contours) {
                return None;
            }
            t.extrude_contours(&contours)
        })
    }

    /// Insets each face on its own, surrounding it with a ring of quads.
    pub fn inset_faces(&mut self, faces: &[FaceId]) -> Option<Vec<HalfEdgeId>> {
        let mut contours = self.find_inset_contours(faces);
        if contours.is_empty() {
            return None;
        }
        self.atomic(|t| {
            if !t.lift_contours(&mut contours) {
                return None;
            }
            t.extrude_contours(&contours)
        })
    }

    /// Cuts the mesh apart along closed loops of `edges` and caps both sides of
    /// each cut with a new face.
    ///
    /// Faces next to the cut are grouped by spreading across unselected edges.
    /// Groups are tried smallest first, never the largest; the first whose whole
    /// border lies on the cut is lifted off and capped, then the rest is grouped
    /// again. Returns the caps, or `None` when no loop separates the mesh.
    pub fn loop_cut(&mut self, edges: &[EdgeId]) -> Option<Vec<FaceId>> {
        let mut cut: AHashSet<EdgeId> = edges
            .iter()
            .copied()
            .filter(|&e| self.is_edge_live(e) && !self.is_boundary_edge(e))
            .collect();
        self.atomic(|t| {
            let mut caps = Vec::new();
            loop {
                let mut seeds: Vec<EdgeId> = cut.iter().copied().collect();
                seeds.sort_unstable();
                let mut groups = t.flood_faces(
                    seeds
                        .iter()
                        .flat_map(|e| [t.face_of(e.left()), t.face_of(e.right())])
                        .flatten(),
                    |h, _| !cut.contains(&h.edge()),
                );
                if groups.len() < 2 {
                    break;
                }
                groups.sort_by_key(Vec::len);
                let largest = groups.len() - 1;
                let Some(mut contours) = groups[..largest]
                    .iter()
                    .map(|g| t.find_contours(g))
                    .find(|c| {
                        !c.is_empty() && c.iter().flatten().all(|edge| cut.contains(&edge.outer.edge()))
                    })
                else {
                    break;
                };
                if !t.lift_contours(&mut contours) {
                    return None;
                }
                for contour in &contours {
                    for edge in contour {
                        cut.remove(&edge.outer.edge());
                    }
                    let lifted = contour[0].inner?.pair();
                    let outer: SmallVec<[VertexId; 8]> =
                        t.walk_loop(contour[0].outer).map(|h| t.origin(h)).collect();
                    let inner: SmallVec<[VertexId; 8]> =
                        t.walk_loop(lifted).map(|h| t.origin(h)).collect();
                    caps.push(t.add_polygon(&outer)?);
                    caps.push(t.add_polygon(&inner)?);
                }
                debug!("loop_cut: separated {} contours", contours.len());
            }
            (!caps.is_empty()).then_some(caps)
        })
    }
}
