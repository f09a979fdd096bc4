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
    impl_topology,
    mesh::handles::{FaceId, VertexId},
};

impl_topology! {
    /// Joins two faces with a tube of quads, removing both faces.
    ///
    /// The faces need the same number of corners and no corner in common. The
    /// quads pair the corners with the rotation that minimises the summed squared
    /// distance between paired vertices. Returns the new quads in target order.
    pub fn bridge_face(&mut self, target: FaceId, source: FaceId) -> Option<Vec<FaceId>> {
        if target == source || !self.is_face_live(target) || !self.is_face_live(source) {
            return None;
        }
        let t_loop = self.face_vertices(target);
        let s_loop = self.face_vertices(source);
        let n = t_loop.len();
        if n != s_loop.len() || t_loop.iter().any(|v| s_loop.contains(v)) {
            debug!("bridge {target:?}/{source:?}: faces do not match");
            return None;
        }

        let paired = |offset: usize, i: usize| s_loop[(offset + n - i % n) % n];
        let mut best = 0;
        let mut best_cost = None;
        for offset in 0..n {
            let cost = (0..n)
                .map(|i| self.position(t_loop[i]).distance2(&self.position(paired(offset, i))))
                .fold(T::zero(), |acc, d| acc + d);
            if best_cost.is_none_or(|c| cost < c) {
                best = offset;
                best_cost = Some(cost);
            }
        }

        self.atomic(|t| {
            t.make_hole(target);
            t.make_hole(source);
            let mut quads = Vec::with_capacity(n);
            for i in 0..n {
                let quad: SmallVec<[VertexId; 4]> = SmallVec::from_buf([
                    t_loop[i],
                    t_loop[(i + 1) % n],
                    paired(best, i + 1),
                    paired(best, i),
                ]);
                quads.push(t.add_polygon(&quad)?);
            }
            Some(quads)
        })
    }
}
