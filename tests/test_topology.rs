// tests/test_topology.rs
mod common;

use common::*;
use winged::{Vector3, VertexId};

#[test]
fn test_triangle_creation() {
    let (t, [a, b, c], f) = triangle();
    assert_eq!(counts(&t), (3, 3, 1));
    assert_eq!(t.face_size(f), 3);
    assert_eq!(t.face_vertices(f).to_vec(), vec![a, b, c]);
    assert!(approx_v(t.face_normal(f), p(0.0, 0.0, 1.0)));
    for v in [a, b, c] {
        assert_eq!(t.valence(v), 2);
        assert!(t.is_boundary_vertex(v));
    }
    assert!(t.validate().is_ok());
}

#[test]
fn test_clockwise_triangle_faces_down() {
    let mut t = Topology::new();
    let a = t.add_vertex(p(0.0, 0.0, 0.0));
    let b = t.add_vertex(p(0.0, 1.0, 0.0));
    let c = t.add_vertex(p(1.0, 0.0, 0.0));
    let f = t.add_polygon(&[a, b, c]).unwrap();
    assert!(approx_v(t.face_normal(f), p(0.0, 0.0, -1.0)));
}

#[test]
fn test_cube_is_closed() {
    let (t, vs, fs) = cube();
    assert_eq!(counts(&t), (8, 12, 6));
    for &v in &vs {
        assert_eq!(t.valence(v), 3);
        assert!(!t.is_boundary_vertex(v));
    }
    for e in t.edge_ids() {
        assert!(!t.is_boundary_edge(e));
    }
    let expected = [
        (BOTTOM, p(0.0, 0.0, -1.0)),
        (TOP, p(0.0, 0.0, 1.0)),
        (FRONT, p(0.0, -1.0, 0.0)),
        (RIGHT, p(1.0, 0.0, 0.0)),
        (BACK, p(0.0, 1.0, 0.0)),
        (LEFT, p(-1.0, 0.0, 0.0)),
    ];
    for (face, normal) in expected {
        assert!(approx_v(t.face_normal(fs[face]), normal));
        assert_eq!(t.face_size(fs[face]), 4);
    }
    assert!(t.validate().is_ok());
}

#[test]
fn test_quad_grid() {
    let (t, grid) = quad_grid(3);
    assert_eq!(counts(&t), (16, 24, 9));
    // (1, 1) is interior, (0, 0) a corner, (1, 0) on the border
    assert_eq!(t.valence(grid[5]), 4);
    assert!(!t.is_boundary_vertex(grid[5]));
    assert_eq!(t.valence(grid[0]), 2);
    assert_eq!(t.valence(grid[1]), 3);
    assert!(t.is_boundary_vertex(grid[1]));
    assert_eq!(t.vertex_faces(grid[5]).len(), 4);
    assert!(t.validate().is_ok());
}

#[test]
fn test_face_center_and_prev() {
    let (t, _, f) = quad();
    assert!(approx_v(t.face_center(f), p(0.5, 0.5, 0.0)));
    for h in t.face_half_edges(f) {
        assert_eq!(t.next(t.prev(h)), h);
        assert_eq!(t.destination(t.prev(h)), t.origin(h));
    }
}

#[test]
fn test_rejected_polygon_leaves_no_trace() {
    let (mut t, [a, b, c], _) = triangle();
    let before = (counts(&t), t.arena_sizes(), snapshot(&t));

    // same winding again: every edge already has a face on that side
    assert!(t.add_polygon(&[a, b, c]).is_none());
    // too few corners
    assert!(t.add_polygon(&[a, b]).is_none());
    assert_eq!((counts(&t), t.arena_sizes(), snapshot(&t)), before);

    // a polygon walking the same edge twice
    let d = t.add_vertex(p(2.0, 0.0, 0.0));
    let e = t.add_vertex(p(3.0, 0.0, 0.0));
    let g = t.add_vertex(p(3.0, 1.0, 0.0));
    let sizes = t.arena_sizes();
    assert!(t.add_polygon(&[d, e, d, g]).is_none());
    assert_eq!(t.arena_sizes(), sizes);
    assert_eq!(t.edge_count(), 3);
    assert!(t.out_edge(d).is_none());
    assert!(t.validate().is_ok());
}

#[test]
fn test_add_edge_rejects_loops() {
    let mut t = Topology::new();
    let a = t.add_vertex(p(0.0, 0.0, 0.0));
    let b = t.add_vertex(p(1.0, 0.0, 0.0));
    assert!(t.add_edge(a, a).is_none());
    let h = t.add_edge(a, b).unwrap();
    assert_eq!(t.origin(h), a);
    assert_eq!(t.destination(h), b);
    assert!(t.is_boundary_edge(h.edge()));
    assert_eq!(t.find_half_edge(b, a), Some(h.pair()));
}

#[test]
fn test_free_slots_are_reused() {
    let (mut t, vs, _) = cube();
    let h = t.find_half_edge(vs[0], vs[1]).unwrap();
    let (from, to) = (t.origin(h), t.destination(h));
    assert!(t.collapse_edge(h).is_some());
    assert_eq!(counts(&t), (7, 11, 6));

    let dead = if t.is_vertex_live(from) { to } else { from };
    assert!(!t.is_vertex_live(dead));
    let sizes = t.arena_sizes();

    // the freed slots are handed out again before the arenas grow
    let e = t.edge_ids().next().unwrap();
    let mid = t.edge_midpoint(e.left());
    t.split_edge(e.left(), mid);
    assert_eq!(t.arena_sizes(), sizes);
    assert!(t.is_vertex_live(dead));
    assert_eq!(t.position(dead), mid);
    assert!(t.validate().is_ok());
}

#[test]
fn test_lowest_free_vertex_first() {
    let (mut t, grid) = quad_grid(2);
    // dissolving the center frees exactly one vertex slot
    let center = grid[4];
    assert!(t.dissolve_vertex(center).is_some());
    let v: VertexId = t.add_vertex(p(5.0, 5.0, 5.0));
    assert_eq!(v, center);
    assert_eq!(t.arena_sizes().0, 9);
}

#[test]
fn test_affected_tracking() {
    let (mut t, vs, fs) = cube();
    t.clear_affected();
    assert!(t.affected.is_empty());

    t.set_position(vs[6], p(1.5, 1.5, 1.5));
    assert!(t.affected.vertices.contains(&vs[6]));
    for face in [TOP, RIGHT, BACK] {
        assert!(t.affected.faces.contains(&fs[face]));
    }
    assert!(!t.affected.faces.contains(&fs[BOTTOM]));
    assert_eq!(t.affected.edges.len(), 3);

    t.clear_affected();
    assert!(t.affected.is_empty());
}

#[test]
fn test_positions_are_packed() {
    let (t, vs, _) = cube();
    let buffer = t.positions().as_slice();
    assert!(buffer.len() >= vs.len() * 3);
    let v = vs[6];
    let at = v.index() * 3;
    assert_eq!(
        Vector3::new(buffer[at], buffer[at + 1], buffer[at + 2]),
        p(1.0, 1.0, 1.0)
    );
}
