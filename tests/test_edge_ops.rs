// tests/test_edge_ops.rs
mod common;

use common::*;
use winged::mesh::EdgeRemoval;

#[test]
fn test_split_edge() {
    let (mut t, [a, b, _], f) = triangle();
    let h = t.find_half_edge(a, b).unwrap();
    let new_out = t.split_edge(h, p(0.5, 0.0, 0.0));
    let m = t.destination(new_out);

    assert_eq!(counts(&t), (4, 4, 1));
    assert_eq!(t.origin(new_out), a);
    assert_eq!(t.origin(h), m);
    assert_eq!(t.destination(h), b);
    assert_eq!(t.face_size(f), 4);
    assert_eq!(t.valence(m), 2);
    assert_eq!(t.position(m), p(0.5, 0.0, 0.0));
    assert!(t.validate().is_ok());
}

#[test]
fn test_split_wire_edge() {
    let mut t = Topology::new();
    let a = t.add_vertex(p(0.0, 0.0, 0.0));
    let b = t.add_vertex(p(2.0, 0.0, 0.0));
    let h = t.add_edge(a, b).unwrap();
    let new_out = t.split_edge(h, p(1.0, 0.0, 0.0));
    let m = t.destination(new_out);

    assert_eq!(counts(&t), (3, 2, 0));
    assert_eq!(t.valence(a), 1);
    assert_eq!(t.valence(m), 2);
    assert_eq!(t.next(new_out.pair()), new_out);
    assert!(t.validate().is_ok());

    // and again from the other end
    let back = t.find_half_edge(b, m).unwrap();
    t.split_edge(back, p(1.5, 0.0, 0.0));
    assert_eq!(counts(&t), (4, 3, 0));
    assert!(t.validate().is_ok());
}

#[test]
fn test_split_edge_hanging_off_triangle() {
    let (mut t, [_, _, c], f) = triangle();
    let d = t.add_vertex(p(-1.0, 2.0, 0.0));
    let spur = t.add_edge(c, d).unwrap();
    assert!(t.validate().is_ok());

    // origin on the triangle
    t.split_edge(spur, p(-0.5, 1.5, 0.0));
    assert_eq!(counts(&t), (5, 5, 1));
    assert!(t.validate().is_ok());

    // origin at the loose end
    let tip = t.find_half_edge(d, t.origin(spur)).unwrap();
    t.split_edge(tip, p(-0.75, 1.75, 0.0));
    assert_eq!(counts(&t), (6, 6, 1));
    assert_eq!(t.face_size(f), 3);
    assert_eq!(t.valence(d), 1);
    assert!(t.validate().is_ok());
}

#[test]
fn test_split_then_collapse_interior_edge() {
    let (mut t, grid) = quad_grid(3);
    let (a, b) = (grid[5], grid[6]);
    let h = t.find_half_edge(a, b).unwrap();
    let mid = t.edge_midpoint(h);
    let new_out = t.split_edge(h, mid);
    assert_eq!(counts(&t), (17, 25, 9));
    assert!(t.validate().is_ok());

    assert!(t.can_collapse(new_out));
    assert!(t.collapse_edge(new_out).is_some());
    assert_eq!(counts(&t), (16, 24, 9));
    for f in t.face_ids() {
        assert_eq!(t.face_size(f), 4);
    }
    assert!(t.validate().is_ok());
}

#[test]
fn test_collapse_refused_on_lone_triangle() {
    let (mut t, [a, b, _], _) = triangle();
    let h = t.find_half_edge(a, b).unwrap();
    assert!(!t.can_collapse(h));
    let before = snapshot(&t);
    assert!(t.collapse_edge(h).is_none());
    assert_eq!(snapshot(&t), before);
    assert_eq!(counts(&t), (3, 3, 1));
}

#[test]
fn test_collapse_undo_restores_cube() {
    let (mut t, vs, _) = cube();
    let before = snapshot(&t);
    let h = t.find_half_edge(vs[0], vs[1]).unwrap();
    let patch = t.collapse_edge(h).unwrap();
    assert_eq!(counts(&t), (7, 11, 6));
    assert!(t.validate().is_ok());

    t.undo(patch);
    assert_eq!(counts(&t), (8, 12, 6));
    assert_eq!(snapshot(&t), before);
    assert_eq!(t.position(vs[0]), p(0.0, 0.0, 0.0));
    assert!(t.validate().is_ok());
}

#[test]
fn test_insert_then_remove_edge() {
    let (mut t, [a, b, c, d], f) = quad();
    let ab = t.find_half_edge(a, b).unwrap();
    let da = t.find_half_edge(d, a).unwrap();

    let out = t.insert_edge(ab, da).unwrap();
    assert_eq!(counts(&t), (4, 5, 2));
    assert_eq!(t.origin(out), b);
    assert_eq!(t.destination(out), d);
    let new_face = t.face_of(out).unwrap();
    assert_ne!(new_face, f);
    assert_eq!(t.face_of(out.pair()), Some(f));
    assert_eq!(t.face_size(new_face), 3);
    assert_eq!(t.face_size(f), 3);
    assert!(t.face_vertices(f).contains(&c));
    assert!(t.validate().is_ok());

    assert_eq!(t.remove_edge(out), Some(EdgeRemoval::Merged(new_face)));
    assert_eq!(counts(&t), (4, 4, 1));
    assert_eq!(t.face_size(new_face), 4);
    assert!(t.validate().is_ok());
}

#[test]
fn test_insert_edge_rejections() {
    let (mut t, [a, b, c, _], _) = quad();
    let ab = t.find_half_edge(a, b).unwrap();
    let bc = t.find_half_edge(b, c).unwrap();
    let cd = t.next(bc);
    // neighbours, and a diagonal that would leave a two-sided face
    assert!(t.insert_edge(ab, bc).is_none());
    assert!(t.insert_edge(ab, cd).is_none());
    // the outer side has no face
    assert!(t.insert_edge(ab.pair(), bc.pair()).is_none());
    assert_eq!(counts(&t), (4, 4, 1));
}

#[test]
fn test_remove_edge_rejects_dangling() {
    let (mut t, [a, b, _, _], _) = quad();
    let ab = t.find_half_edge(a, b).unwrap();
    assert!(t.remove_edge(ab).is_none());
    assert_eq!(counts(&t), (4, 4, 1));
}

#[test]
fn test_record_and_undo_split() {
    let (mut t, vs, _) = cube();
    let before = (snapshot(&t), t.arena_sizes());
    let h = t.find_half_edge(vs[4], vs[5]).unwrap();
    let (new_out, patch) = t.record(|t| t.split_edge(h, p(0.5, 0.0, 1.0)));
    assert!(t.is_edge_live(new_out.edge()));
    assert_eq!(counts(&t), (9, 13, 6));
    assert!(!patch.is_empty());

    t.undo(patch);
    assert_eq!((snapshot(&t), t.arena_sizes()), before);
    assert!(t.affected.edges.contains(&h.edge()));
    assert!(t.validate().is_ok());
}

#[test]
fn test_dissolve_vertex() {
    let (mut t, grid) = quad_grid(2);
    let merged = t.dissolve_vertex(grid[4]).unwrap();
    assert_eq!(counts(&t), (8, 8, 1));
    assert_eq!(t.face_size(merged), 8);
    assert!(!t.is_vertex_live(grid[4]));
    assert!(t.validate().is_ok());

    // corner vertex: only one face around it
    assert!(t.dissolve_vertex(grid[0]).is_none());
}

#[test]
fn test_make_hole_and_refill() {
    let (mut t, vs, fs) = cube();
    assert!(t.make_hole(fs[TOP]));
    assert_eq!(counts(&t), (8, 12, 5));
    assert!(t.is_boundary_vertex(vs[4]));
    assert_eq!(t.edge_ids().filter(|&e| t.is_boundary_edge(e)).count(), 4);
    assert!(t.validate().is_ok());
    assert!(!t.make_hole(fs[TOP]));

    let top: Vec<_> = CUBE_FACES[TOP].iter().map(|&i| vs[i]).collect();
    assert!(t.add_polygon(&top).is_some());
    assert_eq!(counts(&t), (8, 12, 6));
    assert!(t.validate().is_ok());
}

#[test]
fn test_make_hole_removes_wire_edges() {
    let (mut t, vs, f) = quad();
    assert!(t.make_hole(f));
    assert_eq!(counts(&t), (4, 0, 0));
    for v in vs {
        assert!(t.out_edge(v).is_none());
    }
    assert!(t.validate().is_ok());
}
