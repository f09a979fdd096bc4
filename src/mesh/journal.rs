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

use crate::{
    geometry::Vector3,
    mesh::{
        handles::{EdgeId, FaceId, HalfEdgeId, VertexId},
        topology::{HalfEdge, Polygon, Vertex},
    },
};

/// Arena slot that was allocated or released while recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
}

/// One recorded write. Record variants carry the value before the write.
#[derive(Clone, Debug)]
pub(crate) enum Change<T> {
    Vertex(VertexId, Vertex),
    Position(VertexId, Vector3<T>),
    HalfEdge(HalfEdgeId, HalfEdge),
    Face(FaceId, Polygon),
    /// `grew` is set when the slot was appended rather than taken from a free list.
    Alloc { slot: Slot, grew: bool },
    Free(Slot),
}

/// Undo token for a recorded edit.
///
/// Patches restore exact slot ids, so they must be undone in the reverse order
/// they were recorded in.
#[derive(Clone, Debug)]
pub struct Patch<T> {
    pub(crate) changes: Vec<Change<T>>,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self { changes: Vec::new() }
    }
}

impl<T> Patch<T> {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Appends a later patch so both are undone together.
    pub fn extend(&mut self, later: Patch<T>) {
        self.changes.extend(later.changes);
    }
}

#[derive(Debug)]
pub(crate) struct Journal<T> {
    depth: u32,
    changes: Vec<Change<T>>,
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self {
            depth: 0,
            changes: Vec::new(),
        }
    }
}

impl<T: Clone> Journal<T> {
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.depth > 0
    }

    #[inline]
    pub fn push(&mut self, change: Change<T>) {
        if self.depth > 0 {
            self.changes.push(change);
        }
    }

    pub fn begin(&mut self) -> usize {
        self.depth += 1;
        self.changes.len()
    }

    /// Closes a scope and hands back its changes for reverting.
    pub fn abort(&mut self, mark: usize) -> Vec<Change<T>> {
        self.depth -= 1;
        self.changes.split_off(mark)
    }

    /// Closes a scope, keeping its changes only if an outer scope still needs them.
    pub fn finish(&mut self, mark: usize) {
        self.depth -= 1;
        if self.depth == 0 {
            self.changes.truncate(mark);
        }
    }

    pub fn commit(&mut self, mark: usize) -> Patch<T> {
        self.depth -= 1;
        let changes = if self.depth == 0 {
            self.changes.split_off(mark)
        } else {
            self.changes[mark..].to_vec()
        };
        Patch { changes }
    }
}
