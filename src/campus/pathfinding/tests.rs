//! Tests for corridor graph construction, breadth-first routing and narration.
//!
//! Coordinates are chosen so corridor endpoints coincide bit-for-bit where a
//! join is intended; near-misses are deliberate.

use super::*;
use crate::campus::map::{CampusMap, Corridor, Room};
use crate::campus::math::PositionKey;

fn v(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

fn corridor(id: &str, start: Vec3, end: Vec3) -> Corridor {
    Corridor::new(id, start, end)
}

fn room(id: &str, position: Vec3) -> Room {
    Room::new(id, format!("Room {}", id), position, "main")
}

/// A ──(0,0)→(10,0)── B ──(10,0)→(10,10)
fn l_shape() -> Vec<Corridor> {
    vec![
        corridor("A", v(0.0, 0.0), v(10.0, 0.0)),
        corridor("B", v(10.0, 0.0), v(10.0, 10.0)),
    ]
}

/// Straight chain of `n` unit-length corridors along +x, ids `c0..c{n-1}`.
fn chain(n: usize) -> Vec<Corridor> {
    (0..n)
        .map(|i| corridor(&format!("c{}", i), v(i as f32, 0.0), v(i as f32 + 1.0, 0.0)))
        .collect()
}

// ============================================================================
// Graph builder
// ============================================================================

#[test]
fn test_corridor_adds_both_directions() {
    let graph = CorridorGraph::build(&l_shape(), &[], DEFAULT_ROOM_LINK_RADIUS);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 4);

    let corner = graph.node_at(v(10.0, 0.0)).expect("shared endpoint should be one node");
    let ids: Vec<&str> = graph.neighbors(corner).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"], "insertion order must be preserved");
}

#[test]
fn test_shared_endpoints_are_not_deduplicated() {
    let corridors = vec![
        corridor("east", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("east-bis", v(0.0, 0.0), v(5.0, 0.0)),
    ];
    let graph = CorridorGraph::build(&corridors, &[], DEFAULT_ROOM_LINK_RADIUS);
    let origin = graph.node_at(v(0.0, 0.0)).unwrap();
    assert_eq!(graph.neighbors(origin).len(), 2);
}

#[test]
fn test_isolated_room_still_gets_a_node() {
    let graph = CorridorGraph::build(&l_shape(), &[room("lonely", v(50.0, 50.0))], DEFAULT_ROOM_LINK_RADIUS);
    let node = graph.node_at(v(50.0, 50.0)).expect("room must be addressable");
    assert!(graph.neighbors(node).is_empty());
}

#[test]
fn test_room_bridge_edges() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![room("R", v(10.0, 0.5))];
    let graph = CorridorGraph::build(&corridors, &rooms, DEFAULT_ROOM_LINK_RADIUS);

    let end = graph.node_at(v(10.0, 0.0)).unwrap();
    let room_node = graph.node_at(v(10.0, 0.5)).unwrap();
    let start = graph.node_at(v(0.0, 0.0)).unwrap();

    let from_end: Vec<(EdgeKind, &str, NodeIndex)> =
        graph.neighbors(end).iter().map(|e| (e.kind, e.id.as_str(), e.next)).collect();
    assert_eq!(from_end, vec![(EdgeKind::Corridor, "C", start), (EdgeKind::Room, "R", room_node)]);

    let from_room: Vec<(EdgeKind, &str, NodeIndex)> =
        graph.neighbors(room_node).iter().map(|e| (e.kind, e.id.as_str(), e.next)).collect();
    assert_eq!(from_room, vec![(EdgeKind::Corridor, "C", start)]);
}

#[test]
fn test_room_link_radius_is_strict() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![room("R", v(10.0, 1.0))];
    let graph = CorridorGraph::build(&corridors, &rooms, 1.0);
    let room_node = graph.node_at(v(10.0, 1.0)).unwrap();
    assert!(graph.neighbors(room_node).is_empty(), "distance exactly 1.0 must not link");
}

#[test]
fn test_room_link_ignores_height() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![room("R", Vec3::new(10.0, 25.0, 0.5))];
    let graph = CorridorGraph::build(&corridors, &rooms, 1.0);
    let room_node = graph.node_at(v(10.0, 0.5)).unwrap();
    assert_eq!(graph.neighbors(room_node).len(), 1);
}

#[test]
fn test_malformed_input_does_not_panic() {
    let corridors = vec![
        corridor("nan", Vec3::new(f32::NAN, 0.0, 0.0), v(1.0, 1.0)),
        corridor("dot", v(3.0, 3.0), v(3.0, 3.0)),
    ];
    let graph = CorridorGraph::build(&corridors, &[], DEFAULT_ROOM_LINK_RADIUS);
    assert_eq!(graph.edge_count(), 4);

    assert!(find_path(&corridors, &[], v(3.0, 3.0), v(1.0, 1.0)).is_empty());
    assert_eq!(
        find_route(&corridors, &[], v(3.0, 3.0), v(1.0, 1.0), &SearchConfig::default()),
        SearchOutcome::Unreachable
    );
}

#[test]
fn test_nearest_node_respects_radius() {
    let graph = CorridorGraph::build(&l_shape(), &[], DEFAULT_ROOM_LINK_RADIUS);
    let (node, distance) = graph.nearest_node(v(9.0, 1.0), 5.0).unwrap();
    assert_eq!(graph.node(node).position, v(10.0, 0.0));
    assert!((distance - 2f32.sqrt()).abs() < 1e-5);
    assert!(graph.nearest_node(v(50.0, 50.0), 5.0).is_none());
}

// ============================================================================
// Search engine
// ============================================================================

#[test]
fn test_concrete_l_shape() {
    assert_eq!(find_path(&l_shape(), &[], v(0.0, 0.0), v(10.0, 10.0)), vec!["A", "B"]);
}

#[test]
fn test_room_at_exact_endpoint_resolves_to_corridor_only() {
    // The room bridge is a self-loop at (10,0) and gets skipped; the goal
    // test fires on arrival at the corridor endpoint.
    let rooms = vec![room("R", v(10.0, 0.0))];
    assert_eq!(find_path(&l_shape(), &rooms, v(0.0, 0.0), v(10.0, 0.0)), vec!["A"]);
}

#[test]
fn test_every_corridor_connects_its_endpoints() {
    let corridors = vec![
        corridor("A", v(0.0, 0.0), v(10.0, 0.0)),
        corridor("B", v(10.0, 0.0), v(10.0, 10.0)),
        corridor("C", v(10.0, 10.0), v(-4.5, 10.0)),
        corridor("D", v(-4.5, 10.0), v(0.0, 0.0)),
    ];
    for c in &corridors {
        assert_eq!(find_path(&corridors, &[], c.start, c.end), vec![c.id.clone()], "{} forward", c.id);
        assert_eq!(find_path(&corridors, &[], c.end, c.start), vec![c.id.clone()], "{} backward", c.id);
    }
}

#[test]
fn test_disjoint_corridors_are_unreachable() {
    let corridors = vec![
        corridor("west", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("east", v(20.0, 0.0), v(25.0, 0.0)),
    ];
    assert!(find_path(&corridors, &[], v(0.0, 0.0), v(25.0, 0.0)).is_empty());
    assert_eq!(
        find_route(&corridors, &[], v(0.0, 0.0), v(25.0, 0.0), &SearchConfig::default()),
        SearchOutcome::Unreachable
    );
}

#[test]
fn test_near_but_not_identical_endpoints_do_not_join() {
    let corridors = vec![
        corridor("a", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("b", v(5.001, 0.0), v(9.0, 0.0)),
    ];
    assert!(find_path(&corridors, &[], v(0.0, 0.0), v(9.0, 0.0)).is_empty());
}

#[test]
fn test_room_bridging_threshold() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];

    let near = vec![room("R", v(10.0, 0.99))];
    assert_eq!(find_path(&corridors, &near, v(0.0, 0.0), v(10.0, 0.99)), vec!["C", "R"]);

    let far = vec![room("R", v(10.0, 1.01))];
    assert!(find_path(&corridors, &far, v(0.0, 0.0), v(10.0, 1.01)).is_empty());
}

#[test]
fn test_room_is_a_pass_through() {
    // The room near C's end lets a walker start in the room and leave along C.
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![room("R", v(10.0, 0.5))];
    assert_eq!(find_path(&corridors, &rooms, v(10.0, 0.5), v(0.0, 0.0)), vec!["C"]);
}

#[test]
fn test_goal_tolerance_absorbs_drift() {
    let drifted_goal = Vec3::new(10.004, 3.0, 9.996);
    assert_eq!(find_path(&l_shape(), &[], v(0.0, 0.0), drifted_goal), vec!["A", "B"]);

    let too_far = v(10.02, 10.0);
    assert!(find_path(&l_shape(), &[], v(0.0, 0.0), too_far).is_empty());
}

#[test]
fn test_start_must_match_a_key_exactly() {
    // Goal matching is tolerant, start lookup is not.
    let drifted_start = v(0.001, 0.0);
    assert_eq!(
        find_route(&l_shape(), &[], drifted_start, v(10.0, 10.0), &SearchConfig::default()),
        SearchOutcome::Unreachable
    );
}

#[test]
fn test_same_start_and_end() {
    let p = v(10.0, 0.0);
    assert!(find_path(&l_shape(), &[], p, p).is_empty());
    assert_eq!(
        find_route(&l_shape(), &[], p, p, &SearchConfig::default()),
        SearchOutcome::AlreadyThere
    );

    // Also off-graph.
    let nowhere = v(-99.0, -99.0);
    assert_eq!(
        find_route(&l_shape(), &[], nowhere, nowhere, &SearchConfig::default()),
        SearchOutcome::AlreadyThere
    );
}

#[test]
fn test_fewest_edges_wins_over_shorter_distance() {
    // Direct corridor is long; the detour is short but takes two edges.
    let corridors = vec![
        corridor("detour-1", v(0.0, 0.0), v(1.0, 1.0)),
        corridor("detour-2", v(1.0, 1.0), v(2.0, 0.0)),
        corridor("long-way", v(0.0, 0.0), v(2.0, 0.0)),
    ];
    assert_eq!(find_path(&corridors, &[], v(0.0, 0.0), v(2.0, 0.0)), vec!["long-way"]);
}

#[test]
fn test_ties_break_by_insertion_order() {
    // Two equal-length routes around a square; the first-inserted branch wins.
    let north_first = vec![
        corridor("north-1", v(0.0, 0.0), v(0.0, 5.0)),
        corridor("east-1", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("north-2", v(0.0, 5.0), v(5.0, 5.0)),
        corridor("east-2", v(5.0, 0.0), v(5.0, 5.0)),
    ];
    assert_eq!(find_path(&north_first, &[], v(0.0, 0.0), v(5.0, 5.0)), vec!["north-1", "north-2"]);

    let east_first = vec![
        corridor("east-1", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("north-1", v(0.0, 0.0), v(0.0, 5.0)),
        corridor("north-2", v(0.0, 5.0), v(5.0, 5.0)),
        corridor("east-2", v(5.0, 0.0), v(5.0, 5.0)),
    ];
    assert_eq!(find_path(&east_first, &[], v(0.0, 0.0), v(5.0, 5.0)), vec!["east-1", "east-2"]);
}

#[test]
fn test_parallel_corridors_take_the_first() {
    let corridors = vec![
        corridor("upper", v(0.0, 0.0), v(5.0, 0.0)),
        corridor("lower", v(0.0, 0.0), v(5.0, 0.0)),
    ];
    assert_eq!(find_path(&corridors, &[], v(0.0, 0.0), v(5.0, 0.0)), vec!["upper"]);
    assert_eq!(find_path(&corridors, &[], v(5.0, 0.0), v(0.0, 0.0)), vec!["upper"]);
}

#[test]
fn test_cycles_terminate() {
    let triangle = vec![
        corridor("a", v(0.0, 0.0), v(4.0, 0.0)),
        corridor("b", v(4.0, 0.0), v(2.0, 3.0)),
        corridor("c", v(2.0, 3.0), v(0.0, 0.0)),
    ];
    assert!(find_path(&triangle, &[], v(0.0, 0.0), v(40.0, 40.0)).is_empty());
    assert_eq!(find_path(&triangle, &[], v(0.0, 0.0), v(2.0, 3.0)), vec!["c"]);
}

#[test]
fn test_iteration_cap_returns_empty() {
    let corridors = chain(1500);
    let goal = v(1500.0, 0.0);
    assert!(find_path(&corridors, &[], v(0.0, 0.0), goal).is_empty());
    assert_eq!(
        find_route(&corridors, &[], v(0.0, 0.0), goal, &SearchConfig::default()),
        SearchOutcome::IterationLimit { iterations: DEFAULT_MAX_ITERATIONS }
    );

    let generous = SearchConfig { max_iterations: 5000, ..Default::default() };
    match find_route(&corridors, &[], v(0.0, 0.0), goal, &generous) {
        SearchOutcome::Found(steps) => assert_eq!(steps.len(), 1500),
        other => panic!("expected a route with a raised cap, got {:?}", other),
    }
}

#[test]
fn test_iteration_cap_is_configurable() {
    let corridors = chain(10);
    let tight = SearchConfig { max_iterations: 3, ..Default::default() };
    assert!(matches!(
        find_route(&corridors, &[], v(0.0, 0.0), v(10.0, 0.0), &tight),
        SearchOutcome::IterationLimit { .. }
    ));
    assert!(find_route(&corridors, &[], v(0.0, 0.0), v(2.0, 0.0), &tight).is_found());
}

#[test]
fn test_steps_carry_their_kind() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![room("R", v(10.0, 0.5))];
    let outcome = find_route(&corridors, &rooms, v(0.0, 0.0), v(10.0, 0.5), &SearchConfig::default());
    assert_eq!(outcome.steps(), &[RouteStep::corridor("C"), RouteStep::room("R")]);
}

#[test]
fn test_symmetry_on_random_grids() {
    let mut rng = fastrand::Rng::with_seed(0x5EED);
    for _ in 0..20 {
        // Random subset of a 6x6 lattice's edges.
        let mut corridors = Vec::new();
        for x in 0..6 {
            for z in 0..6 {
                let here = v(x as f32 * 3.0, z as f32 * 3.0);
                if x < 5 && rng.bool() {
                    corridors.push(corridor(&format!("h{}_{}", x, z), here, v((x + 1) as f32 * 3.0, z as f32 * 3.0)));
                }
                if z < 5 && rng.bool() {
                    corridors.push(corridor(&format!("v{}_{}", x, z), here, v(x as f32 * 3.0, (z + 1) as f32 * 3.0)));
                }
            }
        }
        for _ in 0..10 {
            let a = v(rng.usize(0..6) as f32 * 3.0, rng.usize(0..6) as f32 * 3.0);
            let b = v(rng.usize(0..6) as f32 * 3.0, rng.usize(0..6) as f32 * 3.0);
            let forward = find_path(&corridors, &[], a, b);
            let backward = find_path(&corridors, &[], b, a);
            assert_eq!(forward.len(), backward.len(), "asymmetric between {:?} and {:?}", a, b);
            assert_eq!(forward, find_path(&corridors, &[], a, b), "repeat query must match");
        }
    }
}

#[test]
fn test_found_paths_form_a_chain() {
    let corridors = vec![
        corridor("A", v(0.0, 0.0), v(10.0, 0.0)),
        corridor("B", v(10.0, 10.0), v(10.0, 0.0)),
        corridor("C", v(10.0, 10.0), v(20.0, 10.0)),
    ];
    let path = find_path(&corridors, &[], v(20.0, 10.0), v(0.0, 0.0));
    assert_eq!(path, vec!["C", "B", "A"]);

    let mut at = v(20.0, 10.0);
    for id in &path {
        let c = corridors.iter().find(|c| &c.id == id).unwrap();
        at = if PositionKey::of(at) == PositionKey::of(c.start) {
            c.end
        } else {
            assert_eq!(PositionKey::of(at), PositionKey::of(c.end));
            c.start
        };
    }
    assert_eq!(at, v(0.0, 0.0));
}

#[test]
fn test_checked_route_rejects_colliding_ids() {
    let map = CampusMap {
        corridors: vec![corridor("X", v(0.0, 0.0), v(1.0, 0.0))],
        rooms: vec![room("X", v(1.0, 0.5))],
        ..Default::default()
    };
    let err = find_route_checked(&map, v(0.0, 0.0), v(1.0, 0.0), &SearchConfig::default()).unwrap_err();
    assert!(matches!(err, CampusError::DuplicateId { .. }));
}

#[test]
fn test_checked_route_rejects_non_finite_endpoints() {
    let map = CampusMap { corridors: l_shape(), ..Default::default() };
    let err = find_route_checked(&map, v(f32::INFINITY, 0.0), v(1.0, 0.0), &SearchConfig::default()).unwrap_err();
    assert!(matches!(err, CampusError::NonFiniteCoordinate { .. }));
    assert!(find_route_checked(&map, v(0.0, 0.0), v(10.0, 10.0), &SearchConfig::default())
        .unwrap()
        .is_found());
}

// ============================================================================
// Instruction synthesis
// ============================================================================

#[test]
fn test_describe_forward_path() {
    let corridors = l_shape();
    let path = find_path(&corridors, &[], v(0.0, 0.0), v(10.0, 10.0));
    let lines = describe_path(&path, &corridors, &[], v(0.0, 0.0));
    assert_eq!(
        lines,
        vec![
            "Take corridor A from (0.0, 0.0, 0.0) to (10.0, 0.0, 0.0)",
            "Take corridor B from (10.0, 0.0, 0.0) to (10.0, 0.0, 10.0)",
        ]
    );
}

#[test]
fn test_describe_path_always_ends_at_authored_end() {
    let corridors = vec![corridor("A", v(0.0, 0.0), v(10.0, 0.0))];
    let lines = describe_path(&["A".to_string()], &corridors, &[], v(10.0, 0.0));
    assert_eq!(lines, vec!["Take corridor A from (10.0, 0.0, 0.0) to (10.0, 0.0, 0.0)"]);

    let lines = describe_path(&["B".to_string(), "A".to_string()], &l_shape(), &[], v(10.0, 10.0));
    assert_eq!(
        lines,
        vec![
            "Take corridor B from (10.0, 0.0, 10.0) to (10.0, 0.0, 10.0)",
            "Take corridor A from (10.0, 0.0, 10.0) to (10.0, 0.0, 0.0)",
        ]
    );
}

#[test]
fn test_describe_path_room_does_not_move_the_walker() {
    let corridors = vec![
        corridor("C1", v(0.0, 0.0), v(10.0, 0.0)),
        corridor("C2", v(10.0, 0.0), v(20.0, 0.0)),
    ];
    let rooms = vec![Room::new("R", "Records", v(10.0, 0.4), "main")];
    let ids: Vec<String> = ["C1", "R", "C2"].iter().map(|s| s.to_string()).collect();
    let lines = describe_path(&ids, &corridors, &rooms, v(0.0, 0.0));
    assert_eq!(
        lines,
        vec![
            "Take corridor C1 from (0.0, 0.0, 0.0) to (10.0, 0.0, 0.0)",
            "Enter room Records at (10.0, 0.0, 0.4)",
            "Take corridor C2 from (10.0, 0.0, 0.0) to (20.0, 0.0, 0.0)",
        ]
    );
}

#[test]
fn test_describe_route_follows_the_walker() {
    let map = CampusMap { corridors: l_shape(), ..Default::default() };
    let steps = vec![RouteStep::corridor("B"), RouteStep::corridor("A")];
    let lines = describe_route(&steps, &map, v(10.0, 10.0), &InstructionStyle::default());
    assert_eq!(
        lines,
        vec![
            "Take corridor B from (10.0, 0.0, 10.0) to (10.0, 0.0, 0.0)",
            "Take corridor A from (10.0, 0.0, 0.0) to (0.0, 0.0, 0.0)",
        ]
    );

    let map = CampusMap {
        corridors: vec![
            corridor("C1", v(0.0, 0.0), v(10.0, 0.0)),
            corridor("C2", v(10.0, 0.0), v(20.0, 0.0)),
        ],
        rooms: vec![Room::new("R", "Records", v(10.0, 0.4), "main")],
        ..Default::default()
    };
    let steps = vec![RouteStep::corridor("C1"), RouteStep::room("R"), RouteStep::corridor("C2")];
    let lines = describe_route(&steps, &map, v(0.0, 0.0), &InstructionStyle::default());
    assert_eq!(lines[2], "Take corridor C2 from (10.0, 0.0, 0.4) to (20.0, 0.0, 0.0)");
}

#[test]
fn test_describe_room_step() {
    let corridors = vec![corridor("C", v(0.0, 0.0), v(10.0, 0.0))];
    let rooms = vec![Room::new("R", "Radiology", v(10.0, 0.5), "main")];
    let lines = describe_path(&["C".to_string(), "R".to_string()], &corridors, &rooms, v(0.0, 0.0));
    assert_eq!(lines[1], "Enter room Radiology at (10.0, 0.0, 0.5)");
}

#[test]
fn test_describe_empty_path() {
    assert_eq!(describe_path(&[], &l_shape(), &[], v(0.0, 0.0)), vec![NO_PATH_MESSAGE]);
}

#[test]
fn test_describe_unknown_id_keeps_alignment() {
    let lines = describe_path(&["A".to_string(), "ghost".to_string()], &l_shape(), &[], v(0.0, 0.0));
    assert_eq!(lines.len(), 2);
    assert!(lines[1].is_empty());
}

#[test]
fn test_describe_prefers_corridors_on_id_clash() {
    let corridors = vec![corridor("X", v(0.0, 0.0), v(1.0, 0.0))];
    let rooms = vec![room("X", v(1.0, 0.5))];
    let lines = describe_path(&["X".to_string()], &corridors, &rooms, v(0.0, 0.0));
    assert!(lines[0].starts_with("Take corridor X"));

    // Tagged steps go to the right collection.
    let map = CampusMap { corridors, rooms, ..Default::default() };
    let lines = describe_route(&[RouteStep::room("X")], &map, v(1.0, 0.0), &InstructionStyle::default());
    assert!(lines[0].starts_with("Enter room Room X"));
}

#[test]
fn test_coordinate_precision_is_configurable() {
    let style = InstructionStyle { coordinate_decimals: 3 };
    let lines = describe_path_with(&["A".to_string()], &l_shape(), &[], v(0.0, 0.0), &style);
    assert_eq!(lines[0], "Take corridor A from (0.000, 0.000, 0.000) to (10.000, 0.000, 0.000)");
}
