// tests/test_cage.rs
mod common;

use common::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use winged::{
    CageConfig, CageError, FaceId, PreviewCage, Ray, Selection, Vector3, VertexId,
    spatial::NodeId,
};

type Cage = PreviewCage<f64>;

fn cube_cage() -> Cage {
    let polygons: Vec<Vec<usize>> = CUBE_FACES.iter().map(|f| f.to_vec()).collect();
    Cage::from_polygons(&cube_positions(p(0.0, 0.0, 0.0), 1.0), &polygons, CageConfig::default()).unwrap()
}

/// Bumpy `n` by `n` height field, so fan triangles are not coplanar.
fn terrain(n: usize, rng: &mut StdRng) -> Cage {
    let mut positions = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            positions.push(p(i as f64, j as f64, rng.random_range(-0.3..0.3)));
        }
    }
    let at = |i: usize, j: usize| j * (n + 1) + i;
    let mut polygons = Vec::new();
    for j in 0..n {
        for i in 0..n {
            polygons.push(vec![at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]);
        }
    }
    Cage::from_polygons(&positions, &polygons, CageConfig::default()).unwrap()
}

fn random_down_ray(rng: &mut StdRng, n: f64) -> Ray<f64> {
    let origin = p(rng.random_range(-2.0..n + 2.0), rng.random_range(-2.0..n + 2.0), 10.0);
    let target = p(rng.random_range(0.0..n), rng.random_range(0.0..n), 0.0);
    Ray::through(origin, target)
}

fn assert_same_pick(cage: &mut Cage, ray: &Ray<f64>) {
    let fast = cage.ray_pick(ray);
    let slow = cage.ray_pick_exhaustive(ray);
    match (fast, slow) {
        (None, None) => {}
        (Some(a), Some(b)) => {
            assert!(approx(a.t, b.t), "{a:?} vs {b:?}");
            assert_eq!(a.face, b.face);
        }
        other => panic!("pick mismatch: {other:?}"),
    }
}

fn face_sel(cage: &Cage, face: usize) -> Selection {
    let f = FaceId::new(face);
    assert!(cage.topology().is_face_live(f));
    Selection::faces([f])
}

#[test]
fn test_pick_cube_top() {
    init_logging();
    let mut cage = cube_cage();
    let ray = Ray::new(p(0.3, 0.6, 5.0), p(0.0, 0.0, -1.0));
    let hit = cage.ray_pick(&ray).unwrap();
    assert!(approx(hit.t, 4.0));
    assert_eq!(hit.face, FaceId::new(TOP));
    // the fan triangle toward the x = 0 edge, nearest its y = 1 corner
    assert_eq!(hit.vertex, VertexId::new(7));
    assert_eq!(cage.topology().origin(hit.edge), VertexId::new(7));
    assert_eq!(cage.topology().destination(hit.edge), VertexId::new(4));

    let miss = Ray::new(p(3.0, 3.0, 5.0), p(0.0, 0.0, -1.0));
    assert!(cage.ray_pick(&miss).is_none());
}

/// Small cubes scattered through a 20 unit box.
fn scattered_cubes(count: usize, rng: &mut StdRng) -> (Cage, Vec<Vector3<f64>>) {
    let mut positions = Vec::new();
    let mut polygons = Vec::new();
    let mut centers = Vec::new();
    for k in 0..count {
        let origin = p(
            rng.random_range(0.0..20.0),
            rng.random_range(0.0..20.0),
            rng.random_range(0.0..20.0),
        );
        centers.push(origin + Vector3::splat(0.15));
        positions.extend(cube_positions(origin, 0.3));
        polygons.extend(CUBE_FACES.iter().map(|f| f.iter().map(|i| i + 8 * k).collect::<Vec<_>>()));
    }
    let cage = Cage::from_polygons(&positions, &polygons, CageConfig::default()).unwrap();
    (cage, centers)
}

#[test]
fn test_pick_matches_exhaustive_scan() {
    let mut rng = StdRng::seed_from_u64(42);
    let (mut cage, centers) = scattered_cubes(80, &mut rng);
    let tree = cage.bvh().tree().unwrap();
    assert!(tree.is_split(NodeId::ROOT));
    assert!(tree.node_count() > 8);

    let mut hits = 0;
    for _ in 0..300 {
        let origin = p(
            rng.random_range(-10.0..30.0),
            rng.random_range(-10.0..30.0),
            rng.random_range(-10.0..30.0),
        );
        let aim = centers[rng.random_range(0..centers.len())];
        let jitter = p(
            rng.random_range(-0.2..0.2),
            rng.random_range(-0.2..0.2),
            rng.random_range(-0.2..0.2),
        );
        let ray = Ray::through(origin, aim + jitter);
        if cage.ray_pick(&ray).is_some() {
            hits += 1;
        }
        assert_same_pick(&mut cage, &ray);
    }
    assert!(hits > 50);
}

#[test]
fn test_pick_follows_edits() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut cage = terrain(12, &mut rng);

    // lift a block of faces well above the rest
    let block: Vec<FaceId> = (0..12 * 12)
        .filter(|i| (i % 12) < 4 && (i / 12) < 4)
        .map(FaceId::new)
        .collect();
    cage.set_selection(Selection::faces(block.iter().copied()));
    let (_, lift) = cage.translate_selection(p(0.0, 0.0, 3.0)).unwrap();
    for _ in 0..200 {
        let ray = random_down_ray(&mut rng, 12.0);
        assert_same_pick(&mut cage, &ray);
    }

    let ray = Ray::new(p(1.5, 1.5, 10.0), p(0.0, 0.0, -1.0));
    let hit = cage.ray_pick(&ray).unwrap();
    assert!(hit.t < 7.5);

    cage.undo(lift);
    let hit = cage.ray_pick(&ray).unwrap();
    assert!(hit.t > 9.5);
    for _ in 0..100 {
        let ray = random_down_ray(&mut rng, 12.0);
        assert_same_pick(&mut cage, &ray);
    }
}

#[test]
fn test_extrude_and_undo() {
    let mut cage = cube_cage();
    cage.set_selection(face_sel(&cage, TOP));
    let (_, patch) = cage.extrude_face(1.0).unwrap();
    assert_eq!(counts(cage.topology()), (12, 20, 10));
    assert!(cage.topology().validate().is_ok());

    let down = Ray::new(p(0.3, 0.6, 5.0), p(0.0, 0.0, -1.0));
    let hit = cage.ray_pick(&down).unwrap();
    assert!(approx(hit.t, 3.0));
    assert_eq!(hit.face, FaceId::new(TOP));
    assert_same_pick(&mut cage, &Ray::new(p(0.5, -3.0, 1.5), p(0.0, 1.0, 0.0)));

    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
    assert!(cage.topology().validate().is_ok());
    let hit = cage.ray_pick(&down).unwrap();
    assert!(approx(hit.t, 4.0));
    assert_eq!(cage.selection(), &face_sel(&cage, TOP));
}

#[test]
fn test_inset_pulls_corners_in() {
    let mut cage = cube_cage();
    cage.set_selection(face_sel(&cage, TOP));
    cage.inset_face(0.5).unwrap();
    assert_eq!(counts(cage.topology()), (12, 20, 10));
    let t = cage.topology();
    let top = FaceId::new(TOP);
    for v in t.face_vertices(top) {
        let q = t.position(v);
        assert!(approx(q.z, 1.0));
        assert!(approx((q.x - 0.5).abs(), 0.25));
        assert!(approx((q.y - 0.5).abs(), 0.25));
    }
}

#[test]
fn test_cut_edge() {
    let mut cage = cube_cage();
    let e = cage
        .topology()
        .find_half_edge(VertexId::new(4), VertexId::new(5))
        .unwrap()
        .edge();
    cage.set_selection(Selection::edges([e]));
    let (cuts, patch) = cage.cut_edge(3).unwrap();
    assert_eq!(cuts.len(), 2);
    assert_eq!(counts(cage.topology()), (10, 14, 6));
    let xs: Vec<f64> = cuts.iter().map(|&v| cage.topology().position(v).x).collect();
    assert!(approx(xs[0], 1.0 / 3.0));
    assert!(approx(xs[1], 2.0 / 3.0));
    assert_eq!(cage.selection(), &Selection::vertices(cuts.iter().copied()));

    // connecting the two cuts is refused: they are neighbours on every face
    assert!(matches!(
        cage.connect_vertex(),
        Err(CageError::Unavailable { .. })
    ));

    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
    assert!(cage.selection().is_empty());
}

#[test]
fn test_bevel_and_undo() {
    let mut cage = cube_cage();
    cage.set_selection(Selection::vertices([VertexId::new(6)]));
    let (result, patch) = cage.bevel_vertex(0.2).unwrap();
    assert_eq!(counts(cage.topology()), (10, 15, 7));
    assert_eq!(cage.selection(), &Selection::faces(result.faces.iter().copied()));
    let corner = p(1.0, 1.0, 1.0);
    for &v in &result.vertices {
        assert!(approx(cage.topology().position(v).distance(&corner), 0.2));
    }
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
    assert_eq!(cage.topology().position(VertexId::new(6)), corner);

    let e = cage
        .topology()
        .find_half_edge(VertexId::new(4), VertexId::new(5))
        .unwrap()
        .edge();
    cage.set_selection(Selection::edges([e]));
    let (_, patch) = cage.bevel_edge(0.1).unwrap();
    assert_eq!(counts(cage.topology()), (10, 15, 7));
    assert!(cage.topology().validate().is_ok());
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
}

#[test]
fn test_dissolve_and_collapse() {
    let mut cage = cube_cage();
    let top = cage
        .topology()
        .find_half_edge(VertexId::new(4), VertexId::new(5))
        .unwrap()
        .edge();
    cage.set_selection(Selection::edges([top]));
    let (kept, patch) = cage.collapse_edge().unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(counts(cage.topology()), (7, 11, 6));
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));

    cage.set_selection(Selection::edges([top]));
    let (merged, patch) = cage.dissolve_edge().unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(counts(cage.topology()), (8, 11, 5));
    assert_eq!(cage.topology().face_size(merged[0]), 6);
    assert!(cage.topology().validate().is_ok());

    // vertex 4 is down to two edges; removing another would leave it dangling
    let side = cage
        .topology()
        .find_half_edge(VertexId::new(4), VertexId::new(7))
        .unwrap()
        .edge();
    cage.set_selection(Selection::edges([side]));
    assert!(matches!(
        cage.dissolve_edge(),
        Err(CageError::Unavailable { .. })
    ));
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));

    cage.set_selection(Selection::vertices([VertexId::new(0)]));
    let (merged, patch) = cage.dissolve_vertex().unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(counts(cage.topology()), (7, 9, 4));
    assert_eq!(cage.topology().face_size(merged[0]), 6);
    assert!(cage.topology().validate().is_ok());
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
}

#[test]
fn test_bridge_and_hole() {
    let mut positions = cube_positions(p(0.0, 0.0, 0.0), 1.0);
    positions.extend(cube_positions(p(2.0, 0.0, 0.0), 1.0));
    let polygons: Vec<Vec<usize>> = CUBE_FACES
        .iter()
        .map(|f| f.to_vec())
        .chain(CUBE_FACES.iter().map(|f| f.iter().map(|i| i + 8).collect()))
        .collect();
    let mut cage = Cage::from_polygons(&positions, &polygons, CageConfig::default()).unwrap();

    let (a, b) = (FaceId::new(RIGHT), FaceId::new(6 + LEFT));
    cage.set_selection(Selection::faces([a, b]));
    let (quads, patch) = cage.bridge().unwrap();
    assert_eq!(quads.len(), 4);
    assert_eq!(counts(cage.topology()), (16, 28, 14));

    // a ray down the tube now hits the tube from inside
    let along = Ray::new(p(1.5, 0.5, 0.5), p(0.0, 0.0, 1.0));
    let hit = cage.ray_pick(&along).unwrap();
    assert!(approx(hit.t, 0.5));
    assert!(quads.contains(&hit.face));

    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (16, 24, 12));
    assert!(cage.ray_pick(&along).is_none());

    cage.set_selection(Selection::faces([FaceId::new(TOP)]));
    let (removed, _) = cage.make_hole().unwrap();
    assert_eq!(removed, 1);
    assert_eq!(counts(cage.topology()), (16, 24, 11));
    let down = Ray::new(p(0.5, 0.5, 5.0), p(0.0, 0.0, -1.0));
    let hit = cage.ray_pick(&down).unwrap();
    assert_eq!(hit.face, FaceId::new(BOTTOM));
    assert!(approx(hit.t, 5.0));
}

#[test]
fn test_edit_errors() {
    let mut cage = cube_cage();
    assert!(matches!(
        cage.extrude_face(1.0),
        Err(CageError::NothingSelected { .. })
    ));

    cage.set_selection(face_sel(&cage, TOP));
    assert!(matches!(
        cage.cut_edge(2),
        Err(CageError::WrongMode { expected: "edge", .. })
    ));
    assert!(matches!(cage.bridge(), Err(CageError::Unavailable { .. })));

    // two faces sharing an edge cannot be bridged; nothing changes
    cage.set_selection(Selection::faces([FaceId::new(TOP), FaceId::new(FRONT)]));
    let before = snapshot(cage.topology());
    assert!(matches!(cage.bridge(), Err(CageError::Unavailable { .. })));
    assert_eq!(snapshot(cage.topology()), before);

    let bad = Cage::from_polygons(
        &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)],
        &[vec![0, 1, 2]],
        CageConfig::default(),
    );
    assert!(matches!(bad, Err(CageError::InvalidPolygon { index: 0 })));
}

#[test]
fn test_sync_leaves_affected_alone() {
    let mut cage = cube_cage();
    assert!(cage.affected().is_empty());
    cage.set_selection(Selection::vertices([VertexId::new(6)]));
    cage.translate_selection(Vector3::new(0.5, 0.5, 0.5)).unwrap();
    assert!(cage.affected().vertices.contains(&VertexId::new(6)));
    assert_eq!(cage.affected().faces.len(), 3);

    let top = FaceId::new(TOP);
    let expected = winged::spatial::compute_sphere(cage.topology(), top);
    assert!(approx_v(cage.spheres().center(top), expected.center));
    assert!(approx(cage.spheres().radius(top), expected.radius));

    cage.clear_affected();
    assert!(cage.affected().is_empty());
}

#[test]
fn test_loop_cut_and_undo() {
    init_logging();
    let mut cage = cube_cage();
    let sides: Vec<_> = [(0, 4), (1, 5), (2, 6), (3, 7)]
        .into_iter()
        .map(|(a, b)| {
            cage.topology()
                .find_half_edge(VertexId::new(a), VertexId::new(b))
                .unwrap()
                .edge()
        })
        .collect();
    cage.set_selection(Selection::edges(sides));
    let (_, cut) = cage.cut_edge(2).unwrap();
    let (ring, connect) = cage.connect_vertex().unwrap();
    assert_eq!(ring.len(), 4);
    let (caps, split) = cage.loop_cut().unwrap();
    assert_eq!(caps.len(), 2);
    assert_eq!(counts(cage.topology()), (16, 24, 12));
    assert_eq!(cage.selection(), &Selection::faces(caps.iter().copied()));
    assert!(cage.topology().validate().is_ok());

    let up = Ray::new(p(0.3, 0.6, 0.25), p(0.0, 0.0, 1.0));
    let hit = cage.ray_pick(&up).unwrap();
    assert!(caps.contains(&hit.face));
    assert!(approx(hit.t, 0.25));

    cage.undo(split);
    cage.undo(connect);
    cage.undo(cut);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
    cage.refresh_bvh();
    assert!(cage.bvh().tree().unwrap().check(cage.spheres()));
}

#[test]
fn test_dissolve_face_and_undo() {
    let mut cage = cube_cage();
    cage.set_selection(Selection::faces([FaceId::new(TOP), FaceId::new(FRONT)]));
    let (merged, patch) = cage.dissolve_face().unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(cage.topology().face_size(merged[0]), 6);
    assert_eq!(counts(cage.topology()), (8, 11, 5));
    assert_eq!(cage.selection(), &Selection::faces(merged.iter().copied()));
    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
}

#[test]
fn test_collapse_face_and_undo() {
    let mut cage = cube_cage();
    cage.set_selection(face_sel(&cage, TOP));
    let (kept, patch) = cage.collapse_face().unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(counts(cage.topology()), (5, 8, 5));
    assert!(approx_v(cage.topology().position(kept[0]), p(0.5, 0.5, 1.0)));
    assert_eq!(cage.selection(), &Selection::vertices(kept.iter().copied()));

    // the left slope of the pyramid rises as z = 2x
    let down = Ray::new(p(0.4, 0.55, 3.0), p(0.0, 0.0, -1.0));
    let hit = cage.ray_pick(&down).unwrap();
    assert!(approx(hit.t, 2.2));
    assert_eq!(cage.topology().face_size(hit.face), 3);

    cage.undo(patch);
    assert_eq!(counts(cage.topology()), (8, 12, 6));
}
