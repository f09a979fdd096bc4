// tests/common/mod.rs
#![allow(dead_code)]

use winged::{FaceId, Vector3, VertexId, WingedTopology};

pub type Topology = WingedTopology<f64>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn p(x: f64, y: f64, z: f64) -> Vector3<f64> {
    Vector3::new(x, y, z)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn approx_v(a: Vector3<f64>, b: Vector3<f64>) -> bool {
    a.distance(&b) < 1e-9
}

/// Counter-clockwise triangle in the z = 0 plane.
pub fn triangle() -> (Topology, [VertexId; 3], FaceId) {
    let mut t = Topology::new();
    let a = t.add_vertex(p(0.0, 0.0, 0.0));
    let b = t.add_vertex(p(1.0, 0.0, 0.0));
    let c = t.add_vertex(p(0.0, 1.0, 0.0));
    let f = t.add_polygon(&[a, b, c]).expect("triangle");
    (t, [a, b, c], f)
}

/// Unit square in the z = 0 plane, facing +z.
pub fn quad() -> (Topology, [VertexId; 4], FaceId) {
    let mut t = Topology::new();
    let a = t.add_vertex(p(0.0, 0.0, 0.0));
    let b = t.add_vertex(p(1.0, 0.0, 0.0));
    let c = t.add_vertex(p(1.0, 1.0, 0.0));
    let d = t.add_vertex(p(0.0, 1.0, 0.0));
    let f = t.add_polygon(&[a, b, c, d]).expect("quad");
    (t, [a, b, c, d], f)
}

/// `n` by `n` unit quads facing +z. Vertex `(i, j)` is `grid[j * (n + 1) + i]`.
pub fn quad_grid(n: usize) -> (Topology, Vec<VertexId>) {
    let mut t = Topology::new();
    let mut grid = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            grid.push(t.add_vertex(p(i as f64, j as f64, 0.0)));
        }
    }
    let at = |i: usize, j: usize| j * (n + 1) + i;
    for j in 0..n {
        for i in 0..n {
            let corners = [
                grid[at(i, j)],
                grid[at(i + 1, j)],
                grid[at(i + 1, j + 1)],
                grid[at(i, j + 1)],
            ];
            t.add_polygon(&corners).expect("grid quad");
        }
    }
    (t, grid)
}

/// Outward facing, counter-clockwise corner lists of a cube.
pub const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // bottom
    [4, 5, 6, 7], // top
    [0, 1, 5, 4], // front
    [1, 2, 6, 5], // right
    [2, 3, 7, 6], // back
    [3, 0, 4, 7], // left
];

pub const BOTTOM: usize = 0;
pub const TOP: usize = 1;
pub const FRONT: usize = 2;
pub const RIGHT: usize = 3;
pub const BACK: usize = 4;
pub const LEFT: usize = 5;

pub fn cube_positions(origin: Vector3<f64>, size: f64) -> Vec<Vector3<f64>> {
    let corners = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ];
    corners
        .iter()
        .map(|&(x, y, z)| origin + p(x, y, z) * size)
        .collect()
}

/// Adds a closed cube to `t`; faces are returned in [`CUBE_FACES`] order.
pub fn add_cube(t: &mut Topology, origin: Vector3<f64>, size: f64) -> (Vec<VertexId>, Vec<FaceId>) {
    let vs: Vec<VertexId> = cube_positions(origin, size)
        .into_iter()
        .map(|q| t.add_vertex(q))
        .collect();
    let fs = CUBE_FACES
        .iter()
        .map(|face| {
            let corners: Vec<VertexId> = face.iter().map(|&i| vs[i]).collect();
            t.add_polygon(&corners).expect("cube face")
        })
        .collect();
    (vs, fs)
}

pub fn cube() -> (Topology, Vec<VertexId>, Vec<FaceId>) {
    let mut t = Topology::new();
    let (vs, fs) = add_cube(&mut t, p(0.0, 0.0, 0.0), 1.0);
    (t, vs, fs)
}

pub fn counts(t: &Topology) -> (usize, usize, usize) {
    (t.vertex_count(), t.edge_count(), t.face_count())
}

/// Every live face as its corner list, keyed by face id.
pub fn snapshot(t: &Topology) -> Vec<(FaceId, Vec<VertexId>)> {
    t.face_ids()
        .map(|f| (f, t.face_vertices(f).to_vec()))
        .collect()
}
