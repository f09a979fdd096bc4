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

//! Typed indices into the topology arenas.
//!
//! Half-edges are not allocated on their own: every winged edge owns two
//! consecutive half-edge slots, `2e` (left) and `2e + 1` (right), so the pair of
//! a half-edge and its winged edge are pure index arithmetic.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self::new(index)
            }
        }
    };
}

arena_id!(
    /// Vertex slot; also the vertex's offset (in triples) into the position buffer.
    VertexId,
    "v"
);
arena_id!(
    /// Winged edge slot, owning half-edges `2e` and `2e + 1`.
    EdgeId,
    "e"
);
arena_id!(HalfEdgeId, "h");
arena_id!(
    /// Polygon slot.
    FaceId,
    "f"
);

impl EdgeId {
    #[inline]
    pub const fn left(self) -> HalfEdgeId {
        HalfEdgeId(self.0 * 2)
    }

    #[inline]
    pub const fn right(self) -> HalfEdgeId {
        HalfEdgeId(self.0 * 2 + 1)
    }
}

impl HalfEdgeId {
    /// The opposite half-edge of the same winged edge.
    #[inline]
    pub const fn pair(self) -> HalfEdgeId {
        HalfEdgeId(self.0 ^ 1)
    }

    #[inline]
    pub const fn edge(self) -> EdgeId {
        EdgeId(self.0 >> 1)
    }

    #[inline]
    pub const fn is_left(self) -> bool {
        self.0 & 1 == 0
    }
}
