mod common;

use std::sync::Arc;

use common::{gate, grid_universe, temporary, universe};
use everoute_lib::{EdgeKind, ExclusionSet, JumpCalculator, RoutePlanner, UniverseGraph};

fn triangle_with_gates() -> RoutePlanner {
    let gates = vec![
        gate(1, "Alpha » Gamma - Gate1", 1),
        gate(2, "Gamma » Alpha - Gate2", 3),
    ];
    RoutePlanner::new(
        Arc::new(UniverseGraph::demo()),
        &gates,
        &[],
        ExclusionSet::new(),
    )
}

#[test]
fn triangle_direct_route_ranks_before_gate() {
    let planner = triangle_with_gates();
    let routes = planner.find("Alpha", "Gamma").expect("query");

    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r.hop_count() == 1));
    assert_eq!(
        routes[0].waypoints[1].connection_type,
        Some(EdgeKind::Stargate)
    );
    assert_eq!(
        routes[1].waypoints[1].connection_type,
        Some(EdgeKind::Ansiblex)
    );
    assert_eq!(routes[1].waypoints[1].gate_id, Some(1));
    assert_eq!(routes[0].waypoints[0].connection_type, None);
}

#[test]
fn temporary_shortcut_beats_longer_stargate_route() {
    let universe = universe(&[(1, "Alpha"), (2, "Beta"), (3, "Gamma")], &[(1, 2), (2, 3)]);
    let planner = RoutePlanner::new(
        Arc::new(universe),
        &[],
        &[temporary(1, 1, 3)],
        ExclusionSet::new(),
    );
    let routes = planner.find("Alpha", "Gamma").expect("query");

    assert_eq!(routes.len(), 1, "only minimal-length routes are returned");
    assert_eq!(routes[0].hop_count(), 1);
    assert_eq!(routes[0].temporary_count(), 1);
    assert_eq!(routes[0].system_ids(), vec![1, 3]);
}

#[test]
fn isolated_system_is_unreachable() {
    let universe = universe(&[(1, "A"), (2, "B"), (3, "C")], &[(1, 2)]);
    let planner = RoutePlanner::new(Arc::new(universe), &[], &[], ExclusionSet::new());

    assert!(planner.find("A", "C").expect("query").is_empty());
    let err = planner.find_required("A", "C").expect_err("unreachable");
    assert!(err.is_unreachable());
}

#[test]
fn same_system_route_is_single_waypoint_for_every_system() {
    let systems = [(1, "A"), (2, "B"), (3, "Lonely")];
    let universe = universe(&systems, &[(1, 2)]);
    let planner = RoutePlanner::new(Arc::new(universe), &[], &[], ExclusionSet::new());

    for (_, name) in systems {
        let routes = planner.find(name, name).expect("query");
        assert_eq!(routes.len(), 1, "{name}");
        assert_eq!(routes[0].hop_count(), 0, "{name}");
        assert_eq!(routes[0].waypoints[0].system_name, name);
        assert_eq!(routes[0].waypoints[0].connection_type, None);
    }
}

#[test]
fn returned_routes_match_graph_distance() {
    let universe = Arc::new(grid_universe(6, 5));
    let planner = RoutePlanner::new(universe.clone(), &[], &[], ExclusionSet::new());
    let jumps = JumpCalculator::new(universe.clone());

    let names: Vec<String> = universe.systems().map(|s| s.name.clone()).collect();
    for from in names.iter().step_by(4) {
        for to in names.iter().step_by(3) {
            let routes = planner.find(from, to).expect("query");
            let distance = jumps.between(from, to).expect("connected grid");
            assert!(!routes.is_empty(), "{from} -> {to}");
            for route in &routes {
                assert_eq!(route.hop_count(), distance, "{from} -> {to}");
                assert_eq!(route.waypoints[0].system_name, *from);
                assert_eq!(route.waypoints[distance].system_name, *to);
            }
        }
    }
}

#[test]
fn ranking_orders_by_gates_then_temporary_links() {
    // Two 2-hop routes from A to D: via B (gate + stargate) and via C (temporary + stargate),
    // plus a plain stargate route via E.
    let universe = universe(
        &[(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")],
        &[(2, 4), (3, 4), (1, 5), (5, 4)],
    );
    let planner = RoutePlanner::new(
        Arc::new(universe),
        &[gate(7, "A » B - Bridge", 1)],
        &[temporary(1, 1, 3)],
        ExclusionSet::new(),
    );
    let routes = planner.find("A", "D").expect("query");

    let keys: Vec<(usize, usize)> = routes
        .iter()
        .map(|r| (r.ansiblex_count(), r.temporary_count()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys.first(), Some(&(0, 0)));
    assert!(routes.iter().all(|r| r.hop_count() == 2));
}

#[test]
fn avoided_systems_never_appear_in_routes() {
    let universe = Arc::new(grid_universe(5, 5));
    let avoided = ["S1-1", "S2-2", "S3-1", "S1-3"];
    let exclusions = ExclusionSet::resolve(&universe, &avoided, &[]).expect("names");
    let avoided_ids: Vec<i64> = avoided
        .iter()
        .map(|name| universe.system_by_name(name).expect("exists").id)
        .collect();
    let planner = RoutePlanner::new(universe.clone(), &[], &[], exclusions);

    for from in ["S0-0", "S4-4", "S0-4", "S2-0"] {
        for to in ["S4-0", "S2-4", "S3-3", "S0-2"] {
            for route in planner.find(from, to).expect("query") {
                for id in route.system_ids() {
                    assert!(!avoided_ids.contains(&id), "{from} -> {to} visits {id}");
                }
            }
        }
    }
}

#[test]
fn removed_link_forces_detour() {
    let universe = Arc::new(UniverseGraph::demo());
    let exclusions =
        ExclusionSet::resolve(&universe, &[] as &[&str], &[("Alpha", "Gamma")]).expect("names");
    let planner = RoutePlanner::new(universe, &[], &[], exclusions);
    let routes = planner.find("Alpha", "Gamma").expect("query");

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].system_ids(), vec![1, 2, 3]);
}

#[test]
fn rebuilding_yields_identical_results() {
    let universe = Arc::new(grid_universe(4, 4));
    let gates = vec![gate(1, "S0-0 » S3-3 - Express", 1_000)];
    let temps = vec![temporary(1, 1_001, 1_014)];

    let first = RoutePlanner::new(universe.clone(), &gates, &temps, ExclusionSet::new());
    let second = RoutePlanner::new(universe, &gates, &temps, ExclusionSet::new());

    for (from, to) in [("S0-0", "S3-3"), ("S0-1", "S3-2"), ("S1-1", "S2-2")] {
        let a = first.find(from, to).expect("query");
        let b = second.find(from, to).expect("query");
        assert_eq!(a, b, "{from} -> {to}");
        assert_eq!(a, first.find(from, to).expect("query"));
    }
}

#[test]
fn waypoints_carry_region_and_wormhole_annotations() {
    let mut universe_systems: Vec<everoute_lib::System> =
        UniverseGraph::demo().systems().cloned().collect();
    universe_systems.push(everoute_lib::System {
        id: 31_000_123,
        name: "J123456".to_string(),
        security: -1.0,
        region_id: 1,
        position: None,
    });
    let universe = UniverseGraph::new(
        universe_systems,
        [(1, 2), (2, 3)],
        std::collections::HashMap::from([(1, "Demo Region".to_string())]),
    );
    let planner = RoutePlanner::new(
        Arc::new(universe),
        &[],
        &[temporary(1, 3, 31_000_123)],
        ExclusionSet::new(),
    );
    let routes = planner.find("Alpha", "J123456").expect("query");

    assert_eq!(routes.len(), 1);
    let waypoints = &routes[0].waypoints;
    assert_eq!(waypoints.len(), 4);
    assert!(waypoints.iter().all(|w| w.region_name == "Demo Region"));
    assert!(waypoints[3].wormhole);
    assert!(!waypoints[2].wormhole);
    assert_eq!(waypoints[3].connection_type, Some(EdgeKind::Temporary));
    assert_eq!(waypoints[2].target_system.as_deref(), Some("J123456"));
}
