// tests/test_random_edits.rs
mod common;

use common::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use winged::{CageConfig, CageError, EdgeId, FaceId, Patch, PreviewCage, Selection, Vector3, VertexId};

type Cage = PreviewCage<f64>;

const EDITS: [&str; 14] = [
    "translate",
    "cut edge",
    "connect vertex",
    "collapse edge",
    "dissolve edge",
    "dissolve vertex",
    "extrude face",
    "inset face",
    "bevel edge",
    "bevel vertex",
    "bridge",
    "dissolve face",
    "collapse face",
    "loop cut",
];

fn grid_cage(n: usize) -> Cage {
    let (t, _) = quad_grid(n);
    Cage::with_topology(t, CageConfig::default())
}

fn cube_cage() -> Cage {
    let (t, _, _) = cube();
    Cage::with_topology(t, CageConfig::default())
}

fn pick<I: Copy>(rng: &mut StdRng, items: &[I]) -> Option<I> {
    if items.is_empty() {
        return None;
    }
    Some(items[rng.random_range(0..items.len())])
}

/// Mesh, sphere and octree agree after an edit.
fn check_cage(cage: &mut Cage, context: &str) {
    if let Err(e) = cage.topology().validate() {
        panic!("{context}: {e}");
    }
    cage.refresh_bvh();
    let t = cage.topology();
    let spheres = cage.spheres();
    let tree = cage.bvh().tree().expect("octree is built");
    assert!(tree.check(spheres), "{context}: octree entries out of place");
    assert_eq!(tree.len(), t.face_count(), "{context}: octree size");
    for f in t.face_ids() {
        assert!(spheres.owner(f).is_some(), "{context}: {f:?} missing from octree");
        for v in t.face_vertices(f) {
            let d = spheres.center(f).distance(&t.position(v));
            assert!(d <= spheres.radius(f) + 1e-9, "{context}: stale sphere on {f:?}");
        }
    }
}

fn state(cage: &Cage) -> (Vec<(FaceId, Vec<VertexId>)>, Vec<(VertexId, Vector3<f64>)>, (usize, usize, usize)) {
    let t = cage.topology();
    let positions = t.vertex_ids().map(|v| (v, t.position(v))).collect();
    (snapshot(t), positions, t.arena_sizes())
}

/// Picks an edit, selects something it can act on and applies it.
fn random_edit(cage: &mut Cage, rng: &mut StdRng) -> (&'static str, Result<Patch<f64>, CageError>) {
    let op = rng.random_range(0..EDITS.len());
    let t = cage.topology();
    let vertices: Vec<VertexId> = t.vertex_ids().collect();
    let edges: Vec<EdgeId> = t.edge_ids().collect();
    let faces: Vec<FaceId> = t.face_ids().collect();

    let selection = match op {
        0 | 5 | 9 => Selection::vertices(pick(rng, &vertices)),
        1 | 3 | 4 => Selection::edges(pick(rng, &edges)),
        2 => match pick(rng, &faces) {
            Some(f) => {
                let corners = t.face_vertices(f);
                let a = rng.random_range(0..corners.len());
                let b = rng.random_range(0..corners.len());
                Selection::vertices([corners[a], corners[b]])
            }
            None => Selection::vertices([]),
        },
        8 => {
            let count = rng.random_range(1..4);
            let chosen: Vec<EdgeId> = (0..count).filter_map(|_| pick(rng, &edges)).collect();
            Selection::edges(chosen)
        }
        10 => {
            let a = pick(rng, &faces);
            let b = pick(rng, &faces);
            Selection::faces(a.into_iter().chain(b))
        }
        11 => match pick(rng, &faces) {
            Some(f) => {
                let mut group = vec![f];
                group.extend(t.face_half_edges(f).filter_map(|h| t.face_of(h.pair())).take(2));
                Selection::faces(group)
            }
            None => Selection::faces([]),
        },
        13 => match pick(rng, &faces) {
            Some(f) => Selection::edges(t.face_half_edges(f).map(|h| h.edge()).collect::<Vec<_>>()),
            None => Selection::edges([]),
        },
        _ => Selection::faces(pick(rng, &faces)),
    };
    cage.set_selection(selection);

    let patch = match op {
        0 => {
            let delta = Vector3::new(
                rng.random_range(-0.2..0.2),
                rng.random_range(-0.2..0.2),
                rng.random_range(-0.2..0.2),
            );
            cage.translate_selection(delta).map(|(_, p)| p)
        }
        1 => cage.cut_edge(rng.random_range(2..4)).map(|(_, p)| p),
        2 => cage.connect_vertex().map(|(_, p)| p),
        3 => cage.collapse_edge().map(|(_, p)| p),
        4 => cage.dissolve_edge().map(|(_, p)| p),
        5 => cage.dissolve_vertex().map(|(_, p)| p),
        6 => cage.extrude_face(0.3).map(|(_, p)| p),
        7 => cage.inset_face(0.3).map(|(_, p)| p),
        8 => cage.bevel_edge(0.1).map(|(_, p)| p),
        9 => cage.bevel_vertex(0.1).map(|(_, p)| p),
        10 => cage.bridge().map(|(_, p)| p),
        11 => cage.dissolve_face().map(|(_, p)| p),
        12 => cage.collapse_face().map(|(_, p)| p),
        _ => cage.loop_cut().map(|(_, p)| p),
    };
    (EDITS[op], patch)
}

/// Applies `steps` random edits, occasionally undoing the newest one, then
/// unwinds everything and compares with the starting mesh.
fn run_sequence(mut cage: Cage, seed: u64, steps: usize) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = state(&cage);
    let mut patches: Vec<Patch<f64>> = Vec::new();
    let mut applied = 0;

    for step in 0..steps {
        if !patches.is_empty() && rng.random_range(0..8) == 0 {
            let patch = patches.pop().unwrap();
            cage.undo(patch);
            check_cage(&mut cage, &format!("seed {seed} step {step}: undo"));
            continue;
        }
        let (name, patch) = random_edit(&mut cage, &mut rng);
        check_cage(&mut cage, &format!("seed {seed} step {step}: {name}"));
        if let Ok(patch) = patch {
            applied += 1;
            patches.push(patch);
        }
    }

    while let Some(patch) = patches.pop() {
        cage.undo(patch);
    }
    check_cage(&mut cage, &format!("seed {seed}: unwound"));
    assert_eq!(state(&cage), start, "seed {seed}: unwound mesh differs");
    applied
}

#[test]
fn test_random_edits_on_grid() {
    init_logging();
    let applied: usize = (0..8).map(|seed| run_sequence(grid_cage(4), seed, 40)).sum();
    assert!(applied > 0);
}

#[test]
fn test_random_edits_on_cube() {
    init_logging();
    let applied: usize = (100..108).map(|seed| run_sequence(cube_cage(), seed, 40)).sum();
    assert!(applied > 0);
}

#[test]
fn test_failed_edit_leaves_cage_untouched() {
    let mut cage = cube_cage();
    let before = state(&cage);
    cage.set_selection(Selection::faces([]));
    assert!(matches!(cage.dissolve_face(), Err(CageError::NothingSelected { .. })));
    assert!(matches!(cage.loop_cut(), Err(CageError::WrongMode { .. })));
    cage.set_selection(Selection::edges([EdgeId::new(0)]));
    assert!(matches!(cage.loop_cut(), Err(CageError::Unavailable { .. })));
    check_cage(&mut cage, "after failed edits");
    assert_eq!(state(&cage), before);
}
