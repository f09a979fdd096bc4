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

pub mod affected;
pub mod bevel;
pub mod bridge;
pub mod connect;
pub mod contour;
pub mod edge_ops;
pub mod free_list;
pub mod handles;
pub mod journal;
pub mod polygon;
pub mod region;
pub mod topology;
pub mod validate;
pub mod vertex_store;

pub use bevel::BevelResult;
pub use contour::{Contour, ContourEdge};
pub use edge_ops::EdgeRemoval;
pub use handles::{EdgeId, FaceId, HalfEdgeId, VertexId};
pub use journal::Patch;
pub use topology::{TopologyConfig, WingedTopology};
pub use validate::TopologyError;

#[macro_export]
macro_rules! impl_topology {
    ($($items:item)*) => {
        impl<T: $crate::numeric::Scalar> $crate::mesh::topology::WingedTopology<T> {
            $($items)*
        }
    };
}
