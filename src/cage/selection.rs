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

use std::collections::BTreeSet;

use crate::{
    mesh::{
        handles::{EdgeId, FaceId, VertexId},
        topology::WingedTopology,
    },
    numeric::Scalar,
};

/// What the user has picked, in one of three element modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Vertex(BTreeSet<VertexId>),
    Edge(BTreeSet<EdgeId>),
    Face(BTreeSet<FaceId>),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Face(BTreeSet::new())
    }
}

impl Selection {
    pub fn vertices(ids: impl IntoIterator<Item = VertexId>) -> Self {
        Selection::Vertex(ids.into_iter().collect())
    }

    pub fn edges(ids: impl IntoIterator<Item = EdgeId>) -> Self {
        Selection::Edge(ids.into_iter().collect())
    }

    pub fn faces(ids: impl IntoIterator<Item = FaceId>) -> Self {
        Selection::Face(ids.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Vertex(s) => s.len(),
            Selection::Edge(s) => s.len(),
            Selection::Face(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Selection::Vertex(_) => "vertex",
            Selection::Edge(_) => "edge",
            Selection::Face(_) => "face",
        }
    }

    /// Every vertex the selection touches, whatever its mode.
    pub fn touched_vertices<T: Scalar>(&self, topology: &WingedTopology<T>) -> BTreeSet<VertexId> {
        match self {
            Selection::Vertex(s) => s.clone(),
            Selection::Edge(s) => s
                .iter()
                .flat_map(|e| [topology.origin(e.left()), topology.origin(e.right())])
                .collect(),
            Selection::Face(s) => s
                .iter()
                .flat_map(|&f| topology.face_vertices(f))
                .collect(),
        }
    }

    /// Drops ids whose elements no longer exist.
    pub fn retain_live<T: Scalar>(&mut self, topology: &WingedTopology<T>) {
        match self {
            Selection::Vertex(s) => s.retain(|&v| topology.is_vertex_live(v)),
            Selection::Edge(s) => s.retain(|&e| topology.is_edge_live(e)),
            Selection::Face(s) => s.retain(|&f| topology.is_face_live(f)),
        }
    }
}
