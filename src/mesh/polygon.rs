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
        handles::{EdgeId, FaceId, HalfEdgeId, VertexId},
        topology::FaceLoop,
    },
};

impl_topology! {
    /// Adds an isolated vertex, reusing a freed slot when one is available.
    pub fn add_vertex(&mut self, p: Vector3<T>) -> VertexId {
        self.alloc_vertex(p)
    }

    /// Adds a free (boundary on both sides) edge `from -> to` and returns the
    /// half-edge leaving `from`.
    ///
    /// Fails when either end has no boundary gap to link into.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        if from == to {
            return None;
        }
        self.atomic(|t| {
            let out = t.alloc_edge(from, to);
            let linked = t.link_edge(from, out, out.pair()) && t.link_edge(to, out.pair(), out);
            if !linked {
                debug!("add_edge {from:?}->{to:?}: complex vertex");
            }
            linked.then_some(out)
        })
    }

    /// Hooks a new edge into `v`'s fan at some boundary gap.
    pub(crate) fn link_edge(&mut self, v: VertexId, out: HalfEdgeId, inward: HalfEdgeId) -> bool {
        if self.out_edge(v).is_none() {
            self.set_out_edge(v, Some(out));
            return true;
        }
        let Some(gap) = self.find_free_in_edge(v) else {
            return false;
        };
        let after = self.next(gap);
        self.set_next(gap, out);
        self.set_next(inward, after);
        true
    }

    /// Takes an edge back out of `v`'s fan.
    pub(crate) fn unlink_edge(&mut self, v: VertexId, out: HalfEdgeId, inward: HalfEdgeId) {
        let prev = self.prev(out);
        if self.out_edge(v) == Some(out) {
            if prev == inward {
                self.set_out_edge(v, None);
                return;
            }
            self.set_out_edge(v, Some(prev.pair()));
        }
        let after = self.next(inward);
        self.set_next(prev, after);
    }

    /// Unlinks and frees an edge with no face on either side.
    pub(crate) fn remove_wire_edge(&mut self, h: HalfEdgeId) {
        let (a, b) = (self.origin(h), self.destination(h));
        self.unlink_edge(a, h, h.pair());
        self.unlink_edge(b, h.pair(), h);
        self.free_edge(h.edge());
    }

    /// Boundary in-edge of the shared vertex to park the chain between
    /// `inward` and `out` behind. Only the part of the fan running from `out`
    /// back round to `inward` is searched, so the gap is never inside the chain.
    fn find_splice_gap(&self, out: HalfEdgeId, inward: HalfEdgeId) -> Option<HalfEdgeId> {
        let mut current = out.pair();
        for _ in 0..self.half_edges.len() {
            if current == inward {
                return None;
            }
            if self.face_of(current).is_none() {
                return Some(current);
            }
            current = self.next(current).pair();
        }
        None
    }

    /// Makes `out` follow `inward` around their shared vertex, moving whatever
    /// sat between them to another boundary gap.
    pub(crate) fn splice_adjacent(&mut self, inward: HalfEdgeId, out: HalfEdgeId) -> bool {
        if self.next(inward) == out {
            return true;
        }
        let b = self.next(inward);
        let d = self.prev(out);
        let Some(g) = self.find_splice_gap(out, inward) else {
            debug!("splice {inward:?}->{out:?}: no free in-edge");
            return false;
        };
        let h = self.next(g);
        self.set_next(inward, out);
        self.set_next(g, b);
        self.set_next(d, h);
        true
    }

    /// Adds a polygon over existing vertices, given in counter-clockwise order.
    ///
    /// Existing boundary edges are reused. Returns `None`, with the topology left
    /// untouched, for fewer than three corners, a repeated edge, an edge that
    /// already has a face on this side, or a vertex with no free gap.
    pub fn add_polygon(&mut self, corners: &[VertexId]) -> Option<FaceId> {
        let n = corners.len();
        if n < 3 {
            return None;
        }
        for &v in corners {
            assert!(self.is_vertex_live(v), "add_polygon on dead vertex {v:?}");
        }
        self.atomic(|t| {
            let mut half_loop = FaceLoop::new();
            let mut used: SmallVec<[EdgeId; 8]> = SmallVec::new();
            for i in 0..n {
                let (v0, v1) = (corners[i], corners[(i + 1) % n]);
                let h = match t.find_half_edge(v0, v1) {
                    None => t.add_edge(v0, v1)?,
                    Some(h) if t.face_of(h).is_some() => {
                        debug!("add_polygon: {v0:?}->{v1:?} would be non-manifold");
                        return None;
                    }
                    Some(h) => h,
                };
                if used.contains(&h.edge()) {
                    debug!("add_polygon: complex polygon at {v0:?}->{v1:?}");
                    return None;
                }
                used.push(h.edge());
                half_loop.push(h);
            }
            for i in 0..n {
                if !t.splice_adjacent(half_loop[i], half_loop[(i + 1) % n]) {
                    return None;
                }
            }
            let f = t.alloc_face(half_loop[0], n as u32);
            for &h in &half_loop {
                t.set_face(h, Some(f));
            }
            Some(f)
        })
    }

    /// Removes a polygon, leaving a hole. Edges that end up with no face on
    /// either side are removed as well.
    pub fn make_hole(&mut self, f: FaceId) -> bool {
        if !self.is_face_live(f) {
            return false;
        }
        let hs = self.face_loop(f);
        for &h in &hs {
            self.set_face(h, None);
        }
        self.free_face(f);
        for &h in &hs {
            if self.is_edge_live(h.edge()) && self.face_of(h.pair()).is_none() {
                self.remove_wire_edge(h);
            }
        }
        true
    }
}
