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

//! Editable mesh as presented to an interactive viewport.
//!
//! A [`PreviewCage`] owns the topology together with the bounding spheres and
//! the lazy octree used for picking, and keeps the spatial side in step with
//! whatever the last edit touched.

pub mod edit;
pub mod selection;

use ahash::AHashSet;

use crate::{
    geometry::{Ray, Vector3},
    mesh::{
        handles::{FaceId, HalfEdgeId, VertexId},
        topology::{TopologyConfig, WingedTopology},
    },
    numeric::Scalar,
    spatial::{BoundingSpheres, Bvh, OctreeParams, compute_sphere},
};

pub use edit::CageError;
pub use selection::Selection;

#[derive(Clone, Copy, Debug, Default)]
pub struct CageConfig {
    pub topology: TopologyConfig,
    pub octree: OctreeParams,
}

/// Closest polygon under a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit<T> {
    /// Ray parameter of the hit point.
    pub t: T,
    pub face: FaceId,
    /// Half-edge of `face` whose fan triangle was hit.
    pub edge: HalfEdgeId,
    /// Endpoint of `edge` nearest the hit point.
    pub vertex: VertexId,
}

#[derive(Debug)]
pub struct PreviewCage<T> {
    pub(crate) topology: WingedTopology<T>,
    pub(crate) spheres: BoundingSpheres<T>,
    pub(crate) bvh: Bvh<T>,
    pub(crate) selection: Selection,
}

impl<T: Scalar> PreviewCage<T> {
    pub fn new(config: CageConfig) -> Self {
        Self::with_topology(WingedTopology::with_config(config.topology), config)
    }

    /// Wraps an existing mesh, computing a sphere for every live face.
    pub fn with_topology(mut topology: WingedTopology<T>, config: CageConfig) -> Self {
        let mut spheres = BoundingSpheres::new();
        let faces: Vec<FaceId> = topology.face_ids().collect();
        for &f in &faces {
            spheres.set(f, compute_sphere(&topology, f));
        }
        let mut bvh = Bvh::new(config.octree);
        bvh.init(&mut spheres, &faces);
        topology.clear_affected();
        Self {
            topology,
            spheres,
            bvh,
            selection: Selection::default(),
        }
    }

    /// Builds a cage from a vertex list and polygons indexing into it.
    pub fn from_polygons(
        positions: &[Vector3<T>],
        polygons: &[Vec<usize>],
        config: CageConfig,
    ) -> Result<Self, CageError> {
        let mut topology = WingedTopology::with_config(config.topology);
        let vertices: Vec<VertexId> = positions.iter().map(|&p| topology.add_vertex(p)).collect();
        for (index, polygon) in polygons.iter().enumerate() {
            let mut corners = Vec::with_capacity(polygon.len());
            for &i in polygon {
                corners.push(*vertices.get(i).ok_or(CageError::InvalidPolygon { index })?);
            }
            topology
                .add_polygon(&corners)
                .ok_or(CageError::InvalidPolygon { index })?;
        }
        Ok(Self::with_topology(topology, config))
    }

    pub fn topology(&self) -> &WingedTopology<T> {
        &self.topology
    }

    /// Elements touched since the last [`clear_affected`](Self::clear_affected).
    pub fn affected(&self) -> &crate::mesh::affected::Affected {
        &self.topology.affected
    }

    /// Called by the presentation layer once it has consumed `affected`.
    pub fn clear_affected(&mut self) {
        self.topology.clear_affected();
    }

    pub fn spheres(&self) -> &BoundingSpheres<T> {
        &self.spheres
    }

    pub fn bvh(&self) -> &Bvh<T> {
        &self.bvh
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.selection.retain_live(&self.topology);
    }

    /// Brings spheres and octree membership in line with every affected
    /// element. `affected` itself is left for the presentation layer.
    pub fn sync_spatial(&mut self) {
        let Self {
            topology,
            spheres,
            bvh,
            ..
        } = self;
        let affected = &topology.affected;
        let mut faces: AHashSet<FaceId> = affected.faces.iter().copied().collect();
        for &e in &affected.edges {
            if topology.is_edge_live(e) {
                faces.extend([e.left(), e.right()].into_iter().filter_map(|h| topology.face_of(h)));
            }
        }
        for &v in &affected.vertices {
            if topology.is_vertex_live(v) {
                faces.extend(topology.vertex_faces(v));
            }
        }
        let mut faces: Vec<FaceId> = faces.into_iter().collect();
        faces.sort_unstable();
        for f in faces {
            if topology.is_face_live(f) {
                spheres.set(f, compute_sphere(topology, f));
                bvh.move_sphere(spheres, f);
            } else {
                bvh.remove_face(spheres, f);
                spheres.clear(f);
            }
        }
    }

    /// Places queued spheres so the next query sees them.
    pub fn refresh_bvh(&mut self) -> bool {
        let topology = &self.topology;
        self.bvh
            .update(&mut self.spheres, || topology.face_ids().collect())
    }

    /// Nearest polygon hit by `ray`, found through the octree.
    pub fn ray_pick(&mut self, ray: &Ray<T>) -> Option<PickHit<T>> {
        self.refresh_bvh();
        let hits = self.bvh.intersect_extent(&self.spheres, ray)?;
        let mut best = None;
        for f in hits {
            self.pick_face(ray, f, &mut best);
        }
        best
    }

    /// Same answer as [`ray_pick`](Self::ray_pick), testing every live face.
    pub fn ray_pick_exhaustive(&self, ray: &Ray<T>) -> Option<PickHit<T>> {
        let mut best = None;
        for f in self.topology.face_ids() {
            self.pick_face(ray, f, &mut best);
        }
        best
    }

    /// Tests the fan of triangles joining the sphere center to each edge of `f`.
    fn pick_face(&self, ray: &Ray<T>, f: FaceId, best: &mut Option<PickHit<T>>) {
        let topology = &self.topology;
        let center = self.spheres.center(f);
        for h in topology.face_half_edges(f) {
            let (v0, v1) = (topology.origin(h), topology.destination(h));
            let (a, b) = (topology.position(v0), topology.position(v1));
            let Some(t) = ray.intersect_triangle(&center, &a, &b) else {
                continue;
            };
            if best.is_none_or(|hit| t < hit.t) {
                let p = ray.at(t);
                let vertex = if p.distance2(&a) <= p.distance2(&b) { v0 } else { v1 };
                *best = Some(PickHit {
                    t,
                    face: f,
                    edge: h,
                    vertex,
                });
            }
        }
    }
}
