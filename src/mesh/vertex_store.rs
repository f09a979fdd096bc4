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

use crate::{geometry::Vector3, mesh::handles::VertexId, numeric::Scalar};

/// Packed `xyz xyz ...` position buffer backing the vertex arena.
///
/// Vertices address their position by index only, so growing the buffer never
/// invalidates anything held by the topology.
#[derive(Clone, Debug)]
pub struct VertexStore<T> {
    data: Vec<T>,
}

impl<T: Scalar> VertexStore<T> {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            data: Vec::with_capacity(vertices.max(1) * 3),
        }
    }

    /// Number of position slots, live or free.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Slots available before the next reallocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity() / 3
    }

    pub(crate) fn push(&mut self, p: Vector3<T>) -> VertexId {
        if self.data.len() + 3 > self.data.capacity() {
            let grow = self.data.capacity().max(3);
            self.data.reserve_exact(grow);
            debug!("vertex buffer grown to {} slots", self.capacity());
        }
        let id = VertexId::new(self.len());
        self.data.extend_from_slice(&[p.x, p.y, p.z]);
        id
    }

    pub(crate) fn pop(&mut self) {
        let len = self.data.len().saturating_sub(3);
        self.data.truncate(len);
    }

    #[inline]
    pub fn get(&self, v: VertexId) -> Vector3<T> {
        let i = v.index() * 3;
        Vector3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub(crate) fn set(&mut self, v: VertexId, p: Vector3<T>) {
        let i = v.index() * 3;
        self.data[i..i + 3].copy_from_slice(&[p.x, p.y, p.z]);
    }

    /// The whole buffer, three scalars per slot, ready for upload.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}
