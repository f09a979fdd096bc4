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

use log::debug;
use smallvec::SmallVec;

use crate::{
    geometry::Vector3,
    impl_topology,
    mesh::{
        handles::{FaceId, HalfEdgeId, VertexId},
        journal::Patch,
    },
};

/// What is left after [`remove_edge`](crate::mesh::topology::WingedTopology::remove_edge).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRemoval {
    /// Both sides had faces; they are now this one face.
    Merged(FaceId),
    /// One side was a hole; the face on the other side joined it.
    Hole,
}

impl_topology! {
    /// Splits the edge of `out` at `p`.
    ///
    /// The new vertex takes over as origin of `out`; the returned half-edge runs
    /// from the old origin to the new vertex, on the same side as `out`.
    pub fn split_edge(&mut self, out: HalfEdgeId, p: Vector3<T>) -> HalfEdgeId {
        let inward = out.pair();
        let out_prev = self.prev(out);
        let in_next = self.next(inward);
        let v_origin = self.origin(out);
        let v_out = self.out_edge(v_origin);

        let vertex = self.alloc_vertex(p);
        let new_out = self.alloc_edge(v_origin, vertex);
        let new_in = new_out.pair();

        self.set_next(new_out, out);
        self.set_next(inward, new_in);
        if out_prev == inward {
            // the old origin was a dead end
            self.set_next(new_in, new_out);
        } else {
            self.set_next(out_prev, new_out);
            self.set_next(new_in, in_next);
        }

        let (f_out, f_in) = (self.face_of(out), self.face_of(inward));
        self.set_face(new_out, f_out);
        self.bump_count(f_out, 1);
        self.set_face(new_in, f_in);
        self.bump_count(f_in, 1);

        self.set_origin(out, vertex);
        self.set_out_edge(vertex, Some(new_in));
        if v_out == Some(out) {
            self.set_out_edge(v_origin, Some(new_out));
        }
        new_out
    }

    /// Splits a face in two with a new edge from `prev_half`'s destination to
    /// `next_half`'s origin. Both must border the same face.
    ///
    /// The returned half-edge belongs to the new face, which takes the corners
    /// from `next_half` around to `prev_half`; the old face keeps the rest.
    pub fn insert_edge(&mut self, prev_half: HalfEdgeId, next_half: HalfEdgeId) -> Option<HalfEdgeId> {
        let old = self.face_of(prev_half)?;
        if self.face_of(next_half) != Some(old)
            || prev_half == next_half
            || self.next(prev_half) == next_half
            || self.next(self.next(prev_half)) == next_half
        {
            return None;
        }
        let v0 = self.destination(prev_half);
        let v1 = self.origin(next_half);
        if v0 == v1 || self.find_half_edge(v0, v1).is_some() {
            debug!("insert_edge {v0:?}-{v1:?}: would duplicate an edge");
            return None;
        }

        let out = self.alloc_edge(v0, v1);
        let inward = out.pair();
        let next_prev = self.next(prev_half);
        let prev_next = self.prev(next_half);
        self.set_next(prev_half, out);
        self.set_next(out, next_half);
        self.set_next(prev_next, inward);
        self.set_next(inward, next_prev);

        let f = self.alloc_face(out, 0);
        let size = self.claim_loop(out, Some(f));
        self.face_mut(f).number_of_vertex = size;

        self.set_face(inward, Some(old));
        if self.face_of(self.face_anchor(old)) == Some(f) {
            self.set_anchor(old, inward);
        }
        let size = self.walk_loop(inward).count() as u32;
        self.face_mut(old).number_of_vertex = size;
        Some(out)
    }

    /// Dissolves an edge, joining the faces on its two sides.
    ///
    /// Refused when both sides are the same face (or both are holes), or when
    /// an end has fewer than three edges; either would leave a dangling edge.
    pub fn remove_edge(&mut self, out: HalfEdgeId) -> Option<EdgeRemoval> {
        let inward = out.pair();
        let (f_out, f_in) = (self.face_of(out), self.face_of(inward));
        if f_out == f_in
            || self.valence(self.origin(out)) < 3
            || self.valence(self.origin(inward)) < 3
        {
            return None;
        }
        let out_prev = self.prev(out);
        let in_prev = self.prev(inward);
        let out_next = self.next(out);
        let in_next = self.next(inward);

        self.set_next(out_prev, in_next);
        self.set_next(in_prev, out_next);

        let (a, b) = (self.origin(out), self.origin(inward));
        if self.out_edge(a) == Some(out) {
            self.set_out_edge(a, Some(in_next));
        }
        if self.out_edge(b) == Some(inward) {
            self.set_out_edge(b, Some(out_next));
        }

        let result = match (f_out, f_in) {
            (Some(keep), Some(gone)) => {
                let size = self.claim_loop(out_prev, Some(keep));
                let p = self.face_mut(keep);
                p.half_edge = Some(out_prev);
                p.number_of_vertex = size;
                self.free_face(gone);
                EdgeRemoval::Merged(keep)
            }
            (Some(gone), None) | (None, Some(gone)) => {
                self.claim_loop(out_prev, None);
                self.free_face(gone);
                EdgeRemoval::Hole
            }
            (None, None) => unreachable!(),
        };
        self.free_edge(out.edge());
        Some(result)
    }

    /// Whether collapsing `h` keeps the mesh manifold.
    ///
    /// A vertex adjacent to both ends is only allowed when it is the third corner
    /// of a triangle on either side of the edge, and that corner must keep at
    /// least two edges afterwards.
    pub fn can_collapse(&self, h: HalfEdgeId) -> bool {
        if !self.is_edge_live(h.edge()) {
            return false;
        }
        let pair = h.pair();
        if self.face_of(h) == self.face_of(pair) {
            return false;
        }
        let (from, to) = (self.origin(h), self.origin(pair));
        if !self.is_boundary_edge(h.edge())
            && self.is_boundary_vertex(from)
            && self.is_boundary_vertex(to)
        {
            return false;
        }

        let mut apexes: SmallVec<[VertexId; 2]> = SmallVec::new();
        for side in [h, pair] {
            let n = self.next(side);
            if self.next(self.next(n)) == side {
                let apex = self.destination(n);
                if self.valence(apex) < 3 {
                    return false;
                }
                apexes.push(apex);
            }
        }
        let from_ring: SmallVec<[VertexId; 8]> =
            self.out_edges(from).map(|o| self.destination(o)).collect();
        self.out_edges(to)
            .map(|o| self.destination(o))
            .filter(|v| from_ring.contains(v))
            .all(|v| apexes.contains(&v))
    }

    /// Merges `h`'s origin into its destination. The returned patch restores
    /// the mesh exactly; `None` when the collapse is not manifold safe.
    pub fn collapse_edge(&mut self, h: HalfEdgeId) -> Option<Patch<T>> {
        self.record_some(|t| t.collapse(h)).map(|(_, patch)| patch)
    }

    /// Unrecorded collapse; returns the surviving vertex.
    pub(crate) fn collapse(&mut self, h: HalfEdgeId) -> Option<VertexId> {
        if !self.can_collapse(h) {
            debug!("collapse {h:?}: refused");
            return None;
        }
        let to = self.destination(h);
        let next = self.next(h);
        let pair_next = self.next(h.pair());

        self.collapse_raw(h);

        // a triangle reduced to two edges goes away entirely
        if self.next(self.next(next)) == next {
            let other = self.next(next);
            self.collapse_loop(other);
        }
        if self.is_edge_live(pair_next.edge()) && self.next(self.next(pair_next)) == pair_next {
            self.collapse_loop(pair_next);
        }
        Some(to)
    }

    fn collapse_raw(&mut self, h: HalfEdgeId) {
        let pair = h.pair();
        let next = self.next(h);
        let prev = self.prev(h);
        let pair_next = self.next(pair);
        let pair_prev = self.prev(pair);
        let from = self.origin(h);
        let to = self.origin(pair);

        let mut current = pair_next;
        while current != h {
            self.set_origin(current, to);
            current = self.next(current.pair());
        }

        self.set_next(prev, next);
        self.set_next(pair_prev, pair_next);

        if let Some(f) = self.face_of(h) {
            if self.face_anchor(f) == h {
                self.set_anchor(f, next);
            }
            self.bump_count(Some(f), -1);
        }
        if let Some(f) = self.face_of(pair) {
            if self.face_anchor(f) == pair {
                self.set_anchor(f, pair_next);
            }
            self.bump_count(Some(f), -1);
        }
        if self.out_edge(to) == Some(pair) {
            self.set_out_edge(to, Some(next));
        }

        self.free_edge(h.edge());
        self.free_vertex(from);
    }

    /// Removes the two-edge loop `h -> next(h)`, keeping `next(h)` as the single
    /// edge between the loop's neighbours.
    fn collapse_loop(&mut self, h: HalfEdgeId) {
        let next = self.next(h);
        let pair = h.pair();
        let next_pair = next.pair();
        let pair_prev = self.prev(pair);
        let pair_after = self.next(pair);

        self.set_next(next, pair_after);
        self.set_next(pair_prev, next);

        let polygon = self.face_of(pair);
        self.set_face(next, polygon);

        let (a, b) = (self.origin(h), self.origin(pair));
        if self.out_edge(a) == Some(h) {
            self.set_out_edge(a, Some(next_pair));
        }
        if self.out_edge(b) == Some(pair) {
            self.set_out_edge(b, Some(next));
        }
        if let Some(p) = polygon {
            if self.face_anchor(p) == pair {
                self.set_anchor(p, next);
            }
        }
        if let Some(gone) = self.face_of(h) {
            self.free_face(gone);
        }
        self.free_edge(h.edge());
    }

    /// Removes an interior vertex, merging the faces around it into one.
    ///
    /// Needs at least three distinct faces and neighbours around `v`.
    pub fn dissolve_vertex(&mut self, v: VertexId) -> Option<FaceId> {
        let spokes: SmallVec<[HalfEdgeId; 8]> = self.out_edges(v).collect();
        let k = spokes.len();
        if k < 3 {
            return None;
        }
        let mut faces: SmallVec<[FaceId; 8]> = SmallVec::new();
        let mut ring: SmallVec<[VertexId; 8]> = SmallVec::new();
        for &s in &spokes {
            let f = self.face_of(s)?;
            let u = self.destination(s);
            if faces.contains(&f) || ring.contains(&u) {
                return None;
            }
            faces.push(f);
            ring.push(u);
        }

        let links: SmallVec<[(HalfEdgeId, HalfEdgeId); 8]> = spokes
            .iter()
            .map(|&s| (self.prev(s.pair()), self.next(s)))
            .collect();
        for &(before, after) in &links {
            self.set_next(before, after);
        }
        for (&s, &u) in spokes.iter().zip(&ring) {
            if self.out_edge(u) == Some(s.pair()) {
                self.set_out_edge(u, Some(self.next(s)));
            }
        }

        let keep = faces[0];
        let anchor = links[0].1;
        let size = self.claim_loop(anchor, Some(keep));
        let p = self.face_mut(keep);
        p.half_edge = Some(anchor);
        p.number_of_vertex = size;

        for &f in &faces[1..] {
            self.free_face(f);
        }
        for &s in &spokes {
            self.free_edge(s.edge());
        }
        self.free_vertex(v);
        Some(keep)
    }
}
