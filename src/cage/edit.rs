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

//! Selection driven edits. Each one is recorded as a single [`Patch`] that
//! [`PreviewCage::undo`] reverts.

use ahash::AHashMap;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    cage::{PreviewCage, selection::Selection},
    geometry::Vector3,
    mesh::{
        bevel::BevelResult,
        edge_ops::EdgeRemoval,
        handles::{EdgeId, FaceId, HalfEdgeId, VertexId},
        journal::Patch,
        topology::WingedTopology,
    },
    numeric::Scalar,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CageError {
    #[error("{operation}: nothing is selected")]
    NothingSelected { operation: &'static str },

    #[error("{operation} works on a {expected} selection")]
    WrongMode {
        operation: &'static str,
        expected: &'static str,
    },

    #[error("{operation} is not possible on this selection")]
    Unavailable { operation: &'static str },

    #[error("polygon {index} could not be added")]
    InvalidPolygon { index: usize },
}

/// Result of an edit plus the patch that undoes it.
pub type Edit<T, R> = Result<(R, Patch<T>), CageError>;

impl<T: Scalar> PreviewCage<T> {
    fn selected_vertices(&self, operation: &'static str) -> Result<Vec<VertexId>, CageError> {
        match &self.selection {
            Selection::Vertex(s) if s.is_empty() => Err(CageError::NothingSelected { operation }),
            Selection::Vertex(s) => Ok(s.iter().copied().collect()),
            _ => Err(CageError::WrongMode {
                operation,
                expected: "vertex",
            }),
        }
    }

    fn selected_edges(&self, operation: &'static str) -> Result<Vec<EdgeId>, CageError> {
        match &self.selection {
            Selection::Edge(s) if s.is_empty() => Err(CageError::NothingSelected { operation }),
            Selection::Edge(s) => Ok(s.iter().copied().collect()),
            _ => Err(CageError::WrongMode {
                operation,
                expected: "edge",
            }),
        }
    }

    fn selected_faces(&self, operation: &'static str) -> Result<Vec<FaceId>, CageError> {
        match &self.selection {
            Selection::Face(s) if s.is_empty() => Err(CageError::NothingSelected { operation }),
            Selection::Face(s) => Ok(s.iter().copied().collect()),
            _ => Err(CageError::WrongMode {
                operation,
                expected: "face",
            }),
        }
    }

    /// Records `op` as one edit. `None` leaves the mesh untouched.
    fn commit<R>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut WingedTopology<T>) -> Option<R>,
    ) -> Edit<T, R> {
        let Some((r, patch)) = self.topology.record_some(op) else {
            warn!("{operation}: unavailable");
            return Err(CageError::Unavailable { operation });
        };
        debug!("{operation}: {} changes", patch.len());
        self.sync_spatial();
        Ok((r, patch))
    }

    /// Reverts an edit. Patches must be undone newest first.
    pub fn undo(&mut self, patch: Patch<T>) {
        self.topology.undo(patch);
        self.sync_spatial();
        self.selection.retain_live(&self.topology);
    }

    /// Moves every vertex the selection touches by `delta`.
    pub fn translate_selection(&mut self, delta: Vector3<T>) -> Edit<T, ()> {
        let vertices = self.selection.touched_vertices(&self.topology);
        if vertices.is_empty() {
            return Err(CageError::NothingSelected {
                operation: "translate",
            });
        }
        self.commit("translate", |t| {
            for &v in &vertices {
                t.set_position(v, t.position(v) + delta);
            }
            Some(())
        })
    }

    /// Cuts each selected edge into `segments` equal pieces. The new vertices
    /// become the selection.
    pub fn cut_edge(&mut self, segments: usize) -> Edit<T, Vec<VertexId>> {
        let edges = self.selected_edges("cut")?;
        if segments < 2 {
            return Err(CageError::Unavailable { operation: "cut" });
        }
        let (cuts, patch) = self.commit("cut", |t| {
            let mut cuts = Vec::with_capacity(edges.len() * (segments - 1));
            for &e in &edges {
                let out = e.left();
                let a = t.position(t.origin(out));
                let b = t.position(t.destination(out));
                for i in 1..segments {
                    let p = a.lerp(&b, T::lit(i as f64 / segments as f64));
                    t.split_edge(out, p);
                    cuts.push(t.origin(out));
                }
            }
            Some(cuts)
        })?;
        self.selection = Selection::vertices(cuts.iter().copied());
        Ok((cuts, patch))
    }

    /// Joins selected vertices sharing a face. The new edges become the selection.
    pub fn connect_vertex(&mut self) -> Edit<T, Vec<HalfEdgeId>> {
        let vertices = self.selected_vertices("connect")?;
        let (edges, patch) = self.commit("connect", |t| {
            let edges = t.connect_vertex(&vertices);
            (!edges.is_empty()).then_some(edges)
        })?;
        self.selection = Selection::edges(edges.iter().map(|h| h.edge()));
        Ok((edges, patch))
    }

    /// Collapses every selected edge that can be collapsed. The surviving
    /// vertices become the selection.
    pub fn collapse_edge(&mut self) -> Edit<T, Vec<VertexId>> {
        let edges = self.selected_edges("collapse")?;
        let (kept, patch) = self.commit("collapse", |t| {
            let mut kept = Vec::new();
            for &e in &edges {
                if !t.is_edge_live(e) {
                    continue;
                }
                if let Some(v) = t.collapse(e.left()) {
                    kept.push(v);
                }
            }
            (!kept.is_empty()).then_some(kept)
        })?;
        self.selection = Selection::vertices(kept.iter().copied());
        self.selection.retain_live(&self.topology);
        Ok((kept, patch))
    }

    /// Removes selected edges, merging the faces on either side.
    pub fn dissolve_edge(&mut self) -> Edit<T, Vec<FaceId>> {
        let edges = self.selected_edges("dissolve edge")?;
        let (merged, patch) = self.commit("dissolve edge", |t| {
            let mut merged = Vec::new();
            let mut removed = 0;
            for &e in &edges {
                if !t.is_edge_live(e) {
                    continue;
                }
                match t.remove_edge(e.left()) {
                    Some(EdgeRemoval::Merged(f)) => {
                        merged.push(f);
                        removed += 1;
                    }
                    Some(EdgeRemoval::Hole) => removed += 1,
                    None => debug!("dissolve edge {e:?}: skipped"),
                }
            }
            (removed > 0).then_some(merged)
        })?;
        self.selection = Selection::faces(merged.iter().copied());
        self.selection.retain_live(&self.topology);
        Ok((merged, patch))
    }

    /// Removes selected interior vertices, merging the faces around each.
    pub fn dissolve_vertex(&mut self) -> Edit<T, Vec<FaceId>> {
        let vertices = self.selected_vertices("dissolve vertex")?;
        let (merged, patch) = self.commit("dissolve vertex", |t| {
            let mut merged = Vec::new();
            for &v in &vertices {
                if !t.is_vertex_live(v) {
                    continue;
                }
                match t.atomic(|t| t.dissolve_vertex(v)) {
                    Some(f) => merged.push(f),
                    None => debug!("dissolve vertex {v:?}: skipped"),
                }
            }
            (!merged.is_empty()).then_some(merged)
        })?;
        self.selection = Selection::faces(merged.iter().copied());
        self.selection.retain_live(&self.topology);
        Ok((merged, patch))
    }

    /// Extrudes the selected faces and pushes them `distance` along their
    /// averaged normals.
    pub fn extrude_face(&mut self, distance: T) -> Edit<T, Vec<HalfEdgeId>> {
        let faces = self.selected_faces("extrude")?;
        self.commit("extrude", |t| {
            let rails = t.extrude_faces(&faces)?;
            let mut push: AHashMap<VertexId, Vector3<T>> = AHashMap::new();
            for &f in &faces {
                let n = t.face_normal(f);
                for v in t.face_vertices(f) {
                    *push.entry(v).or_insert_with(Vector3::zero) += n;
                }
            }
            for (v, n) in push {
                t.set_position(v, t.position(v) + n.normalized() * distance);
            }
            Some(rails)
        })
    }

    /// Insets each selected face, pulling its corners `fraction` of the way
    /// toward its center.
    pub fn inset_face(&mut self, fraction: T) -> Edit<T, Vec<HalfEdgeId>> {
        let faces = self.selected_faces("inset")?;
        let fraction = fraction.max(T::zero()).min(T::one());
        self.commit("inset", |t| {
            let rails = t.inset_faces(&faces)?;
            for &f in &faces {
                let c = t.face_center(f);
                for v in t.face_vertices(f) {
                    t.set_position(v, t.position(v).lerp(&c, fraction));
                }
            }
            Some(rails)
        })
    }

    /// Bevels the selected edges and slides the new vertices out by `amount`,
    /// clamped so they stay on their edges. The bevel faces become the selection.
    pub fn bevel_edge(&mut self, amount: T) -> Edit<T, BevelResult<T>> {
        let edges = self.selected_edges("bevel edge")?;
        let (result, patch) = self.commit("bevel edge", |t| {
            let result = t.bevel_edge(&edges);
            if result.is_empty() {
                return None;
            }
            result.apply_offset(t, amount);
            Some(result)
        })?;
        self.selection = Selection::faces(result.faces.iter().copied());
        Ok((result, patch))
    }

    /// Bevels the selected vertices; see [`bevel_edge`](Self::bevel_edge).
    pub fn bevel_vertex(&mut self, amount: T) -> Edit<T, BevelResult<T>> {
        let vertices = self.selected_vertices("bevel vertex")?;
        let (result, patch) = self.commit("bevel vertex", |t| {
            let result = t.bevel_vertex(&vertices);
            if result.is_empty() {
                return None;
            }
            result.apply_offset(t, amount);
            Some(result)
        })?;
        self.selection = Selection::faces(result.faces.iter().copied());
        Ok((result, patch))
    }

    /// Bridges exactly two selected faces with a tube of quads.
    pub fn bridge(&mut self) -> Edit<T, Vec<FaceId>> {
        let faces = self.selected_faces("bridge")?;
        let &[target, source] = faces.as_slice() else {
            return Err(CageError::Unavailable { operation: "bridge" });
        };
        let (quads, patch) = self.commit("bridge", |t| t.bridge_face(target, source))?;
        self.selection = Selection::faces(quads.iter().copied());
        Ok((quads, patch))
    }

    /// Deletes the selected faces, leaving holes.
    pub fn make_hole(&mut self) -> Edit<T, usize> {
        let faces = self.selected_faces("hole")?;
        let (count, patch) = self.commit("hole", |t| {
            let count = faces
                .iter()
                .filter(|&&f| t.is_face_live(f) && t.make_hole(f))
                .count();
            (count > 0).then_some(count)
        })?;
        self.selection = Selection::faces([]);
        Ok((count, patch))
    }

    /// Separates the mesh along the selected edge loops and caps both sides.
    pub fn loop_cut(&mut self) -> Edit<T, Vec<FaceId>> {
        let edges = self.selected_edges("loop cut")?;
        let (caps, patch) = self.commit("loop cut", |t| t.loop_cut(&edges))?;
        self.selection = Selection::faces(caps.iter().copied());
        Ok((caps, patch))
    }

    /// Merges each connected group of selected faces into one.
    pub fn dissolve_face(&mut self) -> Edit<T, Vec<FaceId>> {
        let faces = self.selected_faces("dissolve face")?;
        let (merged, patch) = self.commit("dissolve face", |t| t.dissolve_faces(&faces))?;
        self.selection = Selection::faces(merged.iter().copied());
        Ok((merged, patch))
    }

    /// Shrinks every selected face to a vertex at its center.
    pub fn collapse_face(&mut self) -> Edit<T, Vec<VertexId>> {
        let faces = self.selected_faces("collapse face")?;
        let (kept, patch) = self.commit("collapse face", |t| {
            let kept = t.collapse_faces(&faces);
            (!kept.is_empty()).then_some(kept)
        })?;
        self.selection = Selection::vertices(kept.iter().copied());
        self.selection.retain_live(&self.topology);
        Ok((kept, patch))
    }
}
