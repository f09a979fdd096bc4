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

use thiserror::Error;

use crate::{
    impl_topology,
    mesh::handles::{FaceId, HalfEdgeId, VertexId},
};

/// First broken invariant found by [`validate`](crate::mesh::topology::WingedTopology::validate).
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("half-edge {half_edge:?} starts at a dead vertex")]
    DeadOrigin { half_edge: HalfEdgeId },
    #[error("half-edge {half_edge:?} starts and ends at the same vertex")]
    Degenerate { half_edge: HalfEdgeId },
    #[error("half-edge {half_edge:?} is not followed by a half-edge leaving its destination")]
    BrokenChain { half_edge: HalfEdgeId },
    #[error("half-edge {half_edge:?} and its successor border different faces")]
    FaceMismatch { half_edge: HalfEdgeId },
    #[error("vertex {vertex:?} out-edge does not leave it")]
    OutEdge { vertex: VertexId },
    #[error("vertex {vertex:?} fan reaches {found} of its {expected} out-edges")]
    Fan {
        vertex: VertexId,
        expected: usize,
        found: usize,
    },
    #[error("face {face:?} loop has {found} half-edges, expected {expected}")]
    FaceLoop {
        face: FaceId,
        expected: usize,
        found: usize,
    },
}

impl_topology! {
    /// Checks the link structure: half-edge chains, vertex fans and face loops.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let mut out_degree = vec![0usize; self.vertices.len()];
        for e in self.edge_ids() {
            for h in [e.left(), e.right()] {
                let Some(v) = self.half_edge(h).origin else {
                    return Err(TopologyError::BrokenChain { half_edge: h });
                };
                if !self.is_vertex_live(v) {
                    return Err(TopologyError::DeadOrigin { half_edge: h });
                }
                if self.destination(h) == v {
                    return Err(TopologyError::Degenerate { half_edge: h });
                }
                let next = self.next(h);
                if self.half_edge(next).origin != Some(self.destination(h)) {
                    return Err(TopologyError::BrokenChain { half_edge: h });
                }
                if self.face_of(next) != self.face_of(h) {
                    return Err(TopologyError::FaceMismatch { half_edge: h });
                }
                out_degree[v.index()] += 1;
            }
        }

        for v in self.vertex_ids() {
            let expected = out_degree[v.index()];
            let Some(start) = self.out_edge(v) else {
                if expected != 0 {
                    return Err(TopologyError::Fan { vertex: v, expected, found: 0 });
                }
                continue;
            };
            if self.half_edge(start).origin != Some(v) {
                return Err(TopologyError::OutEdge { vertex: v });
            }
            let mut found = 0;
            let mut h = start;
            loop {
                found += 1;
                h = self.next(h.pair());
                if h == start || found > expected || self.half_edge(h).origin != Some(v) {
                    break;
                }
            }
            if h != start || found != expected {
                return Err(TopologyError::Fan { vertex: v, expected, found });
            }
        }

        for f in self.face_ids() {
            let expected = self.face_size(f);
            let start = self.face_anchor(f);
            let mut found = 0;
            let mut h = start;
            loop {
                if self.face_of(h) != Some(f) {
                    return Err(TopologyError::FaceMismatch { half_edge: h });
                }
                found += 1;
                h = self.next(h);
                if h == start || found > expected {
                    break;
                }
            }
            if h != start || found != expected {
                return Err(TopologyError::FaceLoop { face: f, expected, found });
            }
        }
        Ok(())
    }
}
