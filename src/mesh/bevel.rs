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
        topology::WingedTopology,
    },
    numeric::Scalar,
};

/// Vertices and faces created by a bevel, plus what is needed to slide the
/// new vertices into place.
///
/// New vertices start at the position of the vertex they were split from, so
/// the new faces are flat until [`apply_offset`](BevelResult::apply_offset) runs.
#[derive(Clone, Debug, Default)]
pub struct BevelResult<T> {
    pub vertices: Vec<VertexId>,
    pub faces: Vec<FaceId>,
    /// Start position of each new vertex.
    pub position: Vec<Vector3<T>>,
    /// Unit direction each new vertex slides along.
    pub direction: Vec<Vector3<T>>,
    /// Largest offset that keeps every new vertex on its edge.
    pub vertex_limit: T,
}

impl<T: Scalar> BevelResult<T> {
    fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            position: Vec::new(),
            direction: Vec::new(),
            vertex_limit: T::infinity(),
        }
    }

    fn push_vertex(&mut self, v: VertexId, position: Vector3<T>, far: Vector3<T>, reach: T) {
        let toward = far - position;
        self.push_slide(v, position, toward.normalized(), toward.norm() * reach);
    }

    fn push_slide(&mut self, v: VertexId, position: Vector3<T>, direction: Vector3<T>, limit: T) {
        self.vertices.push(v);
        self.position.push(position);
        self.direction.push(direction);
        self.vertex_limit = self.vertex_limit.min(limit);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Moves every new vertex `amount` along its direction, clamped to
    /// `[0, vertex_limit]`. Returns the offset actually applied.
    pub fn apply_offset(&self, topology: &mut WingedTopology<T>, amount: T) -> T {
        let d = amount.max(T::zero()).min(self.vertex_limit);
        for ((&v, p), dir) in self.vertices.iter().zip(&self.position).zip(&self.direction) {
            topology.set_position(v, *p + *dir * d);
        }
        d
    }
}

impl_topology! {
    /// Replaces each interior vertex with a polygon, one new vertex per edge.
    ///
    /// Boundary vertices and vertices whose faces or neighbours repeat are
    /// skipped.
    pub fn bevel_vertex(&mut self, vertices: &[VertexId]) -> BevelResult<T> {
        let mut result = BevelResult::new();
        for &v in vertices {
            if !self.is_vertex_live(v) {
                continue;
            }
            if self.atomic(|t| t.bevel_one_vertex(v, &mut result)).is_none() {
                debug!("bevel_vertex {v:?}: skipped");
            }
        }
        result
    }

    fn bevel_one_vertex(&mut self, v: VertexId, result: &mut BevelResult<T>) -> Option<()> {
        if self.is_boundary_vertex(v) {
            return None;
        }
        let spokes: SmallVec<[HalfEdgeId; 8]> = self.out_edges(v).collect();
        let k = spokes.len();
        if k < 3 {
            return None;
        }
        let p = self.position(v);
        let new_out: SmallVec<[HalfEdgeId; 8]> =
            spokes.iter().map(|&s| self.split_edge(s, p)).collect();
        for i in 0..k {
            let (cur, next) = (new_out[i], new_out[(i + 1) % k]);
            self.insert_edge(next, cur.pair())?;
        }
        let face = self.dissolve_vertex(v)?;

        for &s in &spokes {
            let far = self.position(self.destination(s));
            result.push_vertex(self.origin(s), p, far, T::one());
        }
        result.faces.push(face);
        Some(())
    }

    /// Replaces each edge with a strip face between its two neighbours.
    ///
    /// The whole selection is bevelled at once. Around a vertex, the faces
    /// between two selected edges share one new corner, and a vertex with three
    /// or more selected edges is capped by a polygon of those corners. A vertex
    /// with a single selected edge gets a corner on each neighbouring edge
    /// instead, and stays in the strip when it has more than three edges.
    ///
    /// Edges without a distinct face on both sides, or touching a boundary
    /// vertex, are left out. Nothing changes if the rebuilt faces cannot be
    /// stitched back.
    pub fn bevel_edge(&mut self, edges: &[EdgeId]) -> BevelResult<T> {
        let mut chosen: Vec<EdgeId> = edges
            .iter()
            .copied()
            .filter(|&e| self.is_edge_live(e) && self.can_bevel_edge(e))
            .collect();
        chosen.sort_unstable();
        chosen.dedup();
        if chosen.is_empty() {
            return BevelResult::new();
        }
        let mut result = BevelResult::new();
        if self.atomic(|t| t.bevel_edges(&chosen, &mut result)).is_none() {
            debug!("bevel_edge: {} edges refused", chosen.len());
            return BevelResult::new();
        }
        result
    }

    fn can_bevel_edge(&self, e: EdgeId) -> bool {
        let h = e.left();
        let (Some(left), Some(right)) = (self.face_of(h), self.face_of(h.pair())) else {
            return false;
        };
        left != right
            && [self.origin(h), self.destination(h)]
                .iter()
                .all(|&v| self.valence(v) >= 3 && !self.is_boundary_vertex(v))
    }

    fn bevel_edges(&mut self, chosen: &[EdgeId], result: &mut BevelResult<T>) -> Option<()> {
        let mut touched: Vec<VertexId> = chosen
            .iter()
            .flat_map(|e| [self.origin(e.left()), self.origin(e.right())])
            .collect();
        touched.sort_unstable();
        touched.dedup();

        let mut splits: Vec<VertexSplit> = touched
            .iter()
            .map(|&v| {
                let spokes: SmallVec<[HalfEdgeId; 8]> = self.out_edges(v).collect();
                let selected = (0..spokes.len())
                    .filter(|&i| chosen.binary_search(&spokes[i].edge()).is_ok())
                    .collect();
                VertexSplit { vertex: v, spokes, selected, copies: SmallVec::new() }
            })
            .collect();
        for split in &mut splits {
            let p = self.position(split.vertex);
            for _ in 0..split.selected.len().max(2) {
                split.copies.push(self.add_vertex(p));
            }
            self.push_split_slides(split, result);
        }
        let split_of = |v: VertexId| touched.binary_search(&v).ok().map(|i| &splits[i]);

        let mut rebuilt: Vec<FaceId> = splits
            .iter()
            .flat_map(|s| s.rebuilt().into_iter().map(move |i| s.spokes[i]))
            .filter_map(|h| self.face_of(h))
            .collect();
        rebuilt.sort_unstable();
        rebuilt.dedup();

        let mut polygons: Vec<SmallVec<[VertexId; 8]>> = Vec::new();
        for &f in &rebuilt {
            let mut corners = SmallVec::new();
            for h in self.face_half_edges(f) {
                let u = self.origin(h);
                match split_of(u) {
                    Some(split) => corners.extend(split.corner(split.spoke_index(h)?)),
                    None => corners.push(u),
                }
            }
            polygons.push(corners);
        }
        for &e in chosen {
            let h = e.left();
            let (a, b) = (split_of(self.origin(h))?, split_of(self.origin(h.pair()))?);
            let mut strip: SmallVec<[VertexId; 8]> = a.strip_end(a.spoke_index(h)?).into_iter().collect();
            strip.extend(b.strip_end(b.spoke_index(h.pair())?));
            polygons.push(strip);
        }
        for split in splits.iter().filter(|s| s.selected.len() >= 3) {
            polygons.push(split.copies.iter().rev().copied().collect());
        }

        for &f in &rebuilt {
            self.make_hole(f);
        }
        for split in splits.iter().filter(|s| !s.keeps_vertex()) {
            if self.out_edge(split.vertex).is_some() {
                debug!("bevel_edge: {:?} still has edges", split.vertex);
                return None;
            }
            self.free_vertex(split.vertex);
        }
        for (n, corners) in polygons.iter().enumerate() {
            let f = self.add_polygon(corners)?;
            if n >= rebuilt.len() {
                result.faces.push(f);
            }
        }
        Some(())
    }

    /// Slide directions for the new corners of one split vertex. Corners on an
    /// edge run along it; a corner between two selected edges runs into the
    /// face between them.
    fn push_split_slides(&self, split: &VertexSplit, result: &mut BevelResult<T>) {
        let k = split.valence();
        let p = self.position(split.vertex);
        let toward = |i: usize| self.position(self.destination(split.spokes[i % k])) - p;

        if let [j] = split.selected[..] {
            for (copy, i) in [(split.copies[0], j + k - 1), (split.copies[1], j + 1)] {
                let d = toward(i);
                result.push_slide(copy, p, d.normalized(), d.norm() * T::half());
            }
            return;
        }
        let m = split.selected.len();
        for w in 0..m {
            let first = split.selected[w];
            let mut last = split.selected[(w + 1) % m];
            if last <= first {
                last += k;
            }
            let (direction, reach) = if last == first + 1 {
                let (a, b) = (toward(first), toward(last));
                (a.normalized() + b.normalized(), a.norm().min(b.norm()))
            } else {
                (first + 1..last).fold((Vector3::zero(), T::infinity()), |(sum, reach), i| {
                    let d = toward(i);
                    (sum + d.normalized(), reach.min(d.norm()))
                })
            };
            result.push_slide(split.copies[w], p, direction.normalized(), reach * T::half());
        }
    }
}

/// How an edge bevel splits one vertex.
///
/// `spokes` are the vertex's out-edges in fan order; the face of `spokes[i]`
/// sits between spokes `i - 1` and `i`. With two or more selected spokes,
/// `copies[w]` replaces the vertex in every face after selected spoke `w` up
/// to the next one. With a single selected spoke, `copies` holds the corners
/// on the spokes before and after it.
struct VertexSplit {
    vertex: VertexId,
    spokes: SmallVec<[HalfEdgeId; 8]>,
    selected: SmallVec<[usize; 4]>,
    copies: SmallVec<[VertexId; 4]>,
}

impl VertexSplit {
    fn valence(&self) -> usize {
        self.spokes.len()
    }

    fn keeps_vertex(&self) -> bool {
        self.selected.len() == 1 && self.valence() > 3
    }

    fn spoke_index(&self, h: HalfEdgeId) -> Option<usize> {
        self.spokes.iter().position(|&s| s == h)
    }

    /// Copy used by the face of spoke `i`.
    fn wedge(&self, i: usize) -> usize {
        let k = self.valence();
        (1..=k)
            .find_map(|back| {
                let j = (i + k - back) % k;
                self.selected.iter().position(|&s| s == j)
            })
            .unwrap_or(0)
    }

    /// Spoke indices of the faces that change.
    fn rebuilt(&self) -> SmallVec<[usize; 8]> {
        let k = self.valence();
        match self.selected[..] {
            [j] if k > 3 => [0, 1, 2, k - 1].iter().map(|r| (j + r) % k).collect(),
            _ => (0..k).collect(),
        }
    }

    /// What replaces the vertex in the face of spoke `i`.
    fn corner(&self, i: usize) -> SmallVec<[VertexId; 2]> {
        let k = self.valence();
        let mut out = SmallVec::new();
        let [j] = self.selected[..] else {
            out.push(self.copies[self.wedge(i)]);
            return out;
        };
        let (before, after, v) = (self.copies[0], self.copies[1], self.vertex);
        match (i + k - j) % k {
            0 => out.push(before),
            1 => out.push(after),
            2 if k == 3 => out.extend([after, before]),
            2 => out.extend([after, v]),
            r if r == k - 1 => out.extend([v, before]),
            _ => out.push(v),
        }
        out
    }

    /// End of the strip over selected spoke `i`, running from the face of the
    /// spoke round to the face of its pair.
    fn strip_end(&self, i: usize) -> SmallVec<[VertexId; 3]> {
        let mut out = SmallVec::new();
        if self.selected.len() == 1 {
            out.push(self.copies[0]);
            if self.keeps_vertex() {
                out.push(self.vertex);
            }
            out.push(self.copies[1]);
        } else {
            out.push(self.copies[self.wedge(i)]);
            out.push(self.copies[self.wedge(i + 1)]);
        }
        out
    }
}
