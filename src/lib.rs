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

//! Winged-edge polygon modeling kernel.
//!
//! [`mesh`] holds the editable topology and its operators, [`spatial`] the
//! loose octree over per-face bounding spheres, and [`cage`] ties both together
//! behind a selection for interactive editing and picking.

pub mod cage;
pub mod geometry;
pub mod mesh;
pub mod numeric;
pub mod spatial;

pub use cage::{CageConfig, CageError, PickHit, PreviewCage, Selection};
pub use geometry::{Bound, Extent, Ray, Vector3};
pub use mesh::{EdgeId, FaceId, HalfEdgeId, Patch, TopologyConfig, VertexId, WingedTopology};
pub use numeric::Scalar;
pub use spatial::{Bvh, LooseOctree, OctreeParams};
