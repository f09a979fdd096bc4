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

use log::trace;
use smallvec::SmallVec;

use crate::{
    geometry::Vector3,
    mesh::{
        affected::Affected,
        free_list::FreeList,
        handles::{EdgeId, FaceId, HalfEdgeId, VertexId},
        journal::{Change, Journal, Patch, Slot},
        vertex_store::VertexStore,
    },
    numeric::Scalar,
};

pub type FaceLoop = SmallVec<[HalfEdgeId; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vertex {
    /// Some outgoing half-edge; `None` for an isolated vertex.
    pub out_edge: Option<HalfEdgeId>,
    pub live: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfEdge {
    /// `None` marks a freed slot.
    pub origin: Option<VertexId>,
    pub next: HalfEdgeId,
    /// `None` for a boundary half-edge.
    pub face: Option<FaceId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polygon {
    /// `None` marks a freed slot.
    pub half_edge: Option<HalfEdgeId>,
    pub number_of_vertex: u32,
}

impl Vertex {
    const DEAD: Self = Self {
        out_edge: None,
        live: false,
    };
}

impl HalfEdge {
    fn dead(h: HalfEdgeId) -> Self {
        Self {
            origin: None,
            next: h,
            face: None,
        }
    }
}

impl Polygon {
    const DEAD: Self = Self {
        half_edge: None,
        number_of_vertex: 0,
    };
}

#[derive(Clone, Copy, Debug)]
pub struct TopologyConfig {
    /// Vertex slots reserved up front in the position buffer.
    pub initial_vertex_capacity: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: 256,
        }
    }
}

/// Winged-edge polygon mesh.
///
/// Vertices, winged edges and polygons live in index arenas whose freed slots
/// are recycled. Every write goes through the journaled accessors below so an
/// operator can be rolled back, and so touched elements land in `affected`.
#[derive(Debug)]
pub struct WingedTopology<T> {
    pub(crate) positions: VertexStore<T>,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Polygon>,
    pub(crate) free_vertices: FreeList,
    pub(crate) free_edges: FreeList,
    pub(crate) free_faces: FreeList,
    pub affected: Affected,
    pub(crate) journal: Journal<T>,
}

impl<T: Scalar> Default for WingedTopology<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> WingedTopology<T> {
    pub fn new() -> Self {
        Self::with_config(TopologyConfig::default())
    }

    pub fn with_config(config: TopologyConfig) -> Self {
        Self {
            positions: VertexStore::with_capacity(config.initial_vertex_capacity),
            vertices: Vec::with_capacity(config.initial_vertex_capacity),
            half_edges: Vec::new(),
            faces: Vec::new(),
            free_vertices: FreeList::default(),
            free_edges: FreeList::default(),
            free_faces: FreeList::default(),
            affected: Affected::default(),
            journal: Journal::default(),
        }
    }

    // ----- counts and liveness -----

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() - self.free_vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.half_edges.len() / 2 - self.free_edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len() - self.free_faces.len()
    }

    /// Arena sizes (live plus recycled slots) as `(vertices, edges, faces)`.
    pub fn arena_sizes(&self) -> (usize, usize, usize) {
        (self.vertices.len(), self.half_edges.len() / 2, self.faces.len())
    }

    pub fn is_vertex_live(&self, v: VertexId) -> bool {
        self.vertices.get(v.index()).is_some_and(|r| r.live)
    }

    pub fn is_edge_live(&self, e: EdgeId) -> bool {
        self.half_edges
            .get(e.left().index())
            .is_some_and(|r| r.origin.is_some())
    }

    pub fn is_face_live(&self, f: FaceId) -> bool {
        self.faces.get(f.index()).is_some_and(|r| r.half_edge.is_some())
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len())
            .map(VertexId::new)
            .filter(|&v| self.is_vertex_live(v))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.half_edges.len() / 2)
            .map(EdgeId::new)
            .filter(|&e| self.is_edge_live(e))
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len())
            .map(FaceId::new)
            .filter(|&f| self.is_face_live(f))
    }

    // ----- record access -----

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.index()]
    }

    #[inline]
    pub fn half_edge(&self, h: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[h.index()]
    }

    #[inline]
    pub fn polygon(&self, f: FaceId) -> &Polygon {
        &self.faces[f.index()]
    }

    #[inline]
    pub fn position(&self, v: VertexId) -> Vector3<T> {
        self.positions.get(v)
    }

    pub fn positions(&self) -> &VertexStore<T> {
        &self.positions
    }

    #[inline]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        match self.half_edges[h.index()].origin {
            Some(v) => v,
            None => panic!("{h:?} is not a live half-edge"),
        }
    }

    #[inline]
    pub fn destination(&self, h: HalfEdgeId) -> VertexId {
        self.origin(h.pair())
    }

    #[inline]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[h.index()].next
    }

    #[inline]
    pub fn face_of(&self, h: HalfEdgeId) -> Option<FaceId> {
        self.half_edges[h.index()].face
    }

    #[inline]
    pub fn out_edge(&self, v: VertexId) -> Option<HalfEdgeId> {
        self.vertices[v.index()].out_edge
    }

    pub fn face_anchor(&self, f: FaceId) -> HalfEdgeId {
        match self.faces[f.index()].half_edge {
            Some(h) => h,
            None => panic!("{f:?} is not a live polygon"),
        }
    }

    #[inline]
    pub fn face_size(&self, f: FaceId) -> usize {
        self.faces[f.index()].number_of_vertex as usize
    }

    /// The half-edge whose `next` is `h`, found by rotating around `h`'s origin.
    ///
    /// Panics when the rotation never reaches `h`: the links are corrupt.
    pub fn prev(&self, h: HalfEdgeId) -> HalfEdgeId {
        let mut prev = h.pair();
        for _ in 0..self.half_edges.len() {
            let next = self.next(prev);
            if next == h {
                return prev;
            }
            prev = next.pair();
        }
        panic!("no predecessor for {h:?}: corrupt vertex fan");
    }

    // ----- traversal -----

    /// Half-edges of a loop, starting at `start` and following `next`.
    pub fn walk_loop(&self, start: HalfEdgeId) -> LoopIter<'_, T> {
        LoopIter {
            topology: self,
            start,
            current: Some(start),
        }
    }

    pub fn face_half_edges(&self, f: FaceId) -> LoopIter<'_, T> {
        self.walk_loop(self.face_anchor(f))
    }

    pub fn face_vertices(&self, f: FaceId) -> SmallVec<[VertexId; 8]> {
        self.face_half_edges(f).map(|h| self.origin(h)).collect()
    }

    pub fn face_loop(&self, f: FaceId) -> FaceLoop {
        self.face_half_edges(f).collect()
    }

    /// Outgoing half-edges of `v` in fan order (`pair.next` rotation).
    pub fn out_edges(&self, v: VertexId) -> FanIter<'_, T> {
        let start = self.out_edge(v);
        FanIter {
            topology: self,
            start,
            current: start,
        }
    }

    /// Fan rotation starting at a specific outgoing half-edge.
    pub fn fan_from(&self, out: HalfEdgeId) -> FanIter<'_, T> {
        FanIter {
            topology: self,
            start: Some(out),
            current: Some(out),
        }
    }

    pub fn valence(&self, v: VertexId) -> usize {
        self.out_edges(v).count()
    }

    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.face_of(e.left()).is_none() || self.face_of(e.right()).is_none()
    }

    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        self.out_edges(v).any(|h| self.face_of(h).is_none() || self.face_of(h.pair()).is_none())
    }

    /// Outgoing half-edge from `from` ending at `to`.
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.out_edges(from).find(|&h| self.destination(h) == to)
    }

    /// Some incoming boundary half-edge of `v`.
    pub fn find_free_in_edge(&self, v: VertexId) -> Option<HalfEdgeId> {
        self.out_edges(v)
            .map(HalfEdgeId::pair)
            .find(|&h| self.face_of(h).is_none())
    }

    /// Faces around `v`, each listed once.
    pub fn vertex_faces(&self, v: VertexId) -> SmallVec<[FaceId; 8]> {
        let mut out = SmallVec::<[FaceId; 8]>::new();
        for h in self.out_edges(v) {
            if let Some(f) = self.face_of(h) {
                if !out.contains(&f) {
                    out.push(f);
                }
            }
        }
        out
    }

    // ----- geometry -----

    /// Newell normal; unit length, or zero for a degenerate polygon.
    pub fn face_normal(&self, f: FaceId) -> Vector3<T> {
        let mut n = Vector3::zero();
        for h in self.face_half_edges(f) {
            let a = self.position(self.origin(h));
            let b = self.position(self.destination(h));
            n.x = n.x + (a.y - b.y) * (a.z + b.z);
            n.y = n.y + (a.z - b.z) * (a.x + b.x);
            n.z = n.z + (a.x - b.x) * (a.y + b.y);
        }
        n.normalized()
    }

    /// Average of the polygon's corner positions.
    pub fn face_center(&self, f: FaceId) -> Vector3<T> {
        let mut c = Vector3::zero();
        let mut n = 0usize;
        for h in self.face_half_edges(f) {
            c += self.position(self.origin(h));
            n += 1;
        }
        c * (T::one() / T::lit(n.max(1) as f64))
    }

    pub fn edge_midpoint(&self, h: HalfEdgeId) -> Vector3<T> {
        let a = self.position(self.origin(h));
        let b = self.position(self.destination(h));
        a.lerp(&b, T::half())
    }

    // ----- journaled writes -----

    pub(crate) fn vertex_mut(&mut self, v: VertexId) -> &mut Vertex {
        self.journal
            .push(Change::Vertex(v, self.vertices[v.index()]));
        self.affected.vertices.insert(v);
        &mut self.vertices[v.index()]
    }

    pub(crate) fn he_mut(&mut self, h: HalfEdgeId) -> &mut HalfEdge {
        self.journal
            .push(Change::HalfEdge(h, self.half_edges[h.index()]));
        self.affected.edges.insert(h.edge());
        &mut self.half_edges[h.index()]
    }

    pub(crate) fn face_mut(&mut self, f: FaceId) -> &mut Polygon {
        self.journal.push(Change::Face(f, self.faces[f.index()]));
        self.affected.faces.insert(f);
        &mut self.faces[f.index()]
    }

    #[inline]
    pub(crate) fn set_next(&mut self, h: HalfEdgeId, next: HalfEdgeId) {
        self.he_mut(h).next = next;
    }

    #[inline]
    pub(crate) fn set_face(&mut self, h: HalfEdgeId, f: Option<FaceId>) {
        self.he_mut(h).face = f;
    }

    #[inline]
    pub(crate) fn set_origin(&mut self, h: HalfEdgeId, v: VertexId) {
        self.he_mut(h).origin = Some(v);
    }

    #[inline]
    pub(crate) fn set_out_edge(&mut self, v: VertexId, h: Option<HalfEdgeId>) {
        self.vertex_mut(v).out_edge = h;
    }

    #[inline]
    pub(crate) fn set_anchor(&mut self, f: FaceId, h: HalfEdgeId) {
        self.face_mut(f).half_edge = Some(h);
    }

    /// Adds `delta` to a polygon's vertex count; no-op for boundary (`None`).
    pub(crate) fn bump_count(&mut self, f: Option<FaceId>, delta: i32) {
        if let Some(f) = f {
            let p = self.face_mut(f);
            p.number_of_vertex = (p.number_of_vertex as i32 + delta) as u32;
        }
    }

    /// Assigns `f` to every half-edge of the loop at `start`; returns its length.
    pub(crate) fn claim_loop(&mut self, start: HalfEdgeId, f: Option<FaceId>) -> u32 {
        let hs: FaceLoop = self.walk_loop(start).collect();
        for &h in &hs {
            self.set_face(h, f);
        }
        hs.len() as u32
    }

    /// Moves a vertex. Its edges and faces are marked affected as well.
    pub fn set_position(&mut self, v: VertexId, p: Vector3<T>) {
        self.journal.push(Change::Position(v, self.positions.get(v)));
        self.positions.set(v, p);
        self.affected.vertices.insert(v);
        let fan: SmallVec<[HalfEdgeId; 8]> = self.out_edges(v).collect();
        for h in fan {
            self.affected.edges.insert(h.edge());
            if let Some(f) = self.face_of(h) {
                self.affected.faces.insert(f);
            }
        }
    }

    // ----- allocation -----

    pub(crate) fn alloc_vertex(&mut self, p: Vector3<T>) -> VertexId {
        let fresh = Vertex {
            out_edge: None,
            live: true,
        };
        match self.free_vertices.pop() {
            Some(i) => {
                let v = VertexId(i);
                self.journal.push(Change::Alloc {
                    slot: Slot::Vertex(v),
                    grew: false,
                });
                *self.vertex_mut(v) = fresh;
                self.journal.push(Change::Position(v, self.positions.get(v)));
                self.positions.set(v, p);
                v
            }
            None => {
                let v = self.positions.push(p);
                self.vertices.push(fresh);
                self.journal.push(Change::Alloc {
                    slot: Slot::Vertex(v),
                    grew: true,
                });
                self.affected.vertices.insert(v);
                v
            }
        }
    }

    /// New winged edge `from -> to`; its two halves point at each other.
    pub(crate) fn alloc_edge(&mut self, from: VertexId, to: VertexId) -> HalfEdgeId {
        match self.free_edges.pop() {
            Some(i) => {
                let e = EdgeId(i);
                self.journal.push(Change::Alloc {
                    slot: Slot::Edge(e),
                    grew: false,
                });
                *self.he_mut(e.left()) = HalfEdge {
                    origin: Some(from),
                    next: e.right(),
                    face: None,
                };
                *self.he_mut(e.right()) = HalfEdge {
                    origin: Some(to),
                    next: e.left(),
                    face: None,
                };
                e.left()
            }
            None => {
                let e = EdgeId::new(self.half_edges.len() / 2);
                self.half_edges.push(HalfEdge {
                    origin: Some(from),
                    next: e.right(),
                    face: None,
                });
                self.half_edges.push(HalfEdge {
                    origin: Some(to),
                    next: e.left(),
                    face: None,
                });
                self.journal.push(Change::Alloc {
                    slot: Slot::Edge(e),
                    grew: true,
                });
                self.affected.edges.insert(e);
                e.left()
            }
        }
    }

    pub(crate) fn alloc_face(&mut self, anchor: HalfEdgeId, number_of_vertex: u32) -> FaceId {
        let fresh = Polygon {
            half_edge: Some(anchor),
            number_of_vertex,
        };
        match self.free_faces.pop() {
            Some(i) => {
                let f = FaceId(i);
                self.journal.push(Change::Alloc {
                    slot: Slot::Face(f),
                    grew: false,
                });
                *self.face_mut(f) = fresh;
                f
            }
            None => {
                let f = FaceId::new(self.faces.len());
                self.faces.push(fresh);
                self.journal.push(Change::Alloc {
                    slot: Slot::Face(f),
                    grew: true,
                });
                self.affected.faces.insert(f);
                f
            }
        }
    }

    pub(crate) fn free_vertex(&mut self, v: VertexId) {
        *self.vertex_mut(v) = Vertex::DEAD;
        self.free_vertices.insert(v.0);
        self.journal.push(Change::Free(Slot::Vertex(v)));
    }

    pub(crate) fn free_edge(&mut self, e: EdgeId) {
        *self.he_mut(e.left()) = HalfEdge::dead(e.left());
        *self.he_mut(e.right()) = HalfEdge::dead(e.right());
        self.free_edges.insert(e.0);
        self.journal.push(Change::Free(Slot::Edge(e)));
    }

    pub(crate) fn free_face(&mut self, f: FaceId) {
        *self.face_mut(f) = Polygon::DEAD;
        self.free_faces.insert(f.0);
        self.journal.push(Change::Free(Slot::Face(f)));
    }

    // ----- transactions -----

    pub(crate) fn begin(&mut self) -> usize {
        self.journal.begin()
    }

    pub(crate) fn rollback(&mut self, mark: usize) {
        let changes = self.journal.abort(mark);
        trace!("rolling back {} changes", changes.len());
        self.revert(changes, false);
    }

    /// Runs `op` as one unit: when it returns `None` every write it made is reverted.
    pub(crate) fn atomic<R>(&mut self, op: impl FnOnce(&mut Self) -> Option<R>) -> Option<R> {
        let mark = self.begin();
        match op(self) {
            Some(r) => {
                self.journal.finish(mark);
                Some(r)
            }
            None => {
                self.rollback(mark);
                None
            }
        }
    }

    /// Runs `op` and returns the patch that undoes it.
    pub fn record<R>(&mut self, op: impl FnOnce(&mut Self) -> R) -> (R, Patch<T>) {
        let mark = self.begin();
        let r = op(self);
        (r, self.journal.commit(mark))
    }

    /// Like [`record`](Self::record), but an operator reporting `None` is rolled
    /// back and produces no patch.
    pub fn record_some<R>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Option<R>,
    ) -> Option<(R, Patch<T>)> {
        let mark = self.begin();
        match op(self) {
            Some(r) => Some((r, self.journal.commit(mark))),
            None => {
                self.rollback(mark);
                None
            }
        }
    }

    /// Reverts a recorded edit, restoring the exact slots it touched.
    pub fn undo(&mut self, patch: Patch<T>) {
        assert!(
            !self.journal.is_recording(),
            "undo while an edit is being recorded"
        );
        trace!("undo {} changes", patch.len());
        self.revert(patch.changes, true);
    }

    fn revert(&mut self, changes: Vec<Change<T>>, mark: bool) {
        for change in changes.into_iter().rev() {
            match change {
                Change::Vertex(v, old) => {
                    self.vertices[v.index()] = old;
                    if mark {
                        self.affected.vertices.insert(v);
                    }
                }
                Change::Position(v, old) => {
                    self.positions.set(v, old);
                    if mark {
                        self.affected.vertices.insert(v);
                    }
                }
                Change::HalfEdge(h, old) => {
                    let current = std::mem::replace(&mut self.half_edges[h.index()], old);
                    if mark {
                        self.affected.edges.insert(h.edge());
                        for f in [current.face, old.face].into_iter().flatten() {
                            self.affected.faces.insert(f);
                        }
                    }
                }
                Change::Face(f, old) => {
                    self.faces[f.index()] = old;
                    if mark {
                        self.affected.faces.insert(f);
                    }
                }
                Change::Alloc { slot, grew } => self.release_slot(slot, grew),
                Change::Free(slot) => self.reclaim_slot(slot),
            }
        }
    }

    fn release_slot(&mut self, slot: Slot, grew: bool) {
        match (slot, grew) {
            (Slot::Vertex(v), true) => {
                debug_assert_eq!(v.index() + 1, self.vertices.len());
                self.vertices.pop();
                self.positions.pop();
            }
            (Slot::Edge(e), true) => {
                debug_assert_eq!(e.index() + 1, self.half_edges.len() / 2);
                self.half_edges.truncate(e.index() * 2);
            }
            (Slot::Face(f), true) => {
                debug_assert_eq!(f.index() + 1, self.faces.len());
                self.faces.pop();
            }
            (Slot::Vertex(v), false) => self.free_vertices.insert(v.0),
            (Slot::Edge(e), false) => self.free_edges.insert(e.0),
            (Slot::Face(f), false) => self.free_faces.insert(f.0),
        }
    }

    fn reclaim_slot(&mut self, slot: Slot) {
        let reclaimed = match slot {
            Slot::Vertex(v) => self.free_vertices.reclaim(v.0),
            Slot::Edge(e) => self.free_edges.reclaim(e.0),
            Slot::Face(f) => self.free_faces.reclaim(f.0),
        };
        assert!(reclaimed, "{slot:?} was not on its free list");
    }

    /// Forgets what has been touched so far; called once presentation state is in sync.
    pub fn clear_affected(&mut self) {
        self.affected.clear();
    }
}

pub struct LoopIter<'a, T> {
    topology: &'a WingedTopology<T>,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl<T: Scalar> Iterator for LoopIter<'_, T> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let h = self.current?;
        let next = self.topology.next(h);
        self.current = (next != self.start).then_some(next);
        Some(h)
    }
}

pub struct FanIter<'a, T> {
    topology: &'a WingedTopology<T>,
    start: Option<HalfEdgeId>,
    current: Option<HalfEdgeId>,
}

impl<T: Scalar> Iterator for FanIter<'_, T> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let h = self.current?;
        let next = self.topology.next(h.pair());
        self.current = (Some(next) != self.start).then_some(next);
        Some(h)
    }
}
