use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::{Gate, TemporaryConnection};
use crate::universe::{System, SystemId, UniverseGraph};

/// Classification for the edge used in the route graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Permanent inter-system link from the universe snapshot.
    Stargate,
    /// Player-owned jump bridge.
    Ansiblex,
    /// User-declared temporary link.
    Temporary,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EdgeKind::Stargate => "Stargate",
            EdgeKind::Ansiblex => "Ansiblex",
            EdgeKind::Temporary => "Temporary",
        };
        f.write_str(value)
    }
}

/// Typed edge pointing at another node by system id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub target: SystemId,
    pub kind: EdgeKind,
}

/// A system together with its typed connections.
#[derive(Debug, Clone)]
pub struct Node {
    pub system: System,
    connections: Vec<Connection>,
}

impl Node {
    fn new(system: System) -> Self {
        Self {
            system,
            connections: Vec::new(),
        }
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn is_connected(&self, target: SystemId, kind: EdgeKind) -> bool {
        self.connections
            .iter()
            .any(|c| c.target == target && c.kind == kind)
    }

    fn push_unique(&mut self, target: SystemId, kind: EdgeKind) -> bool {
        if self.is_connected(target, kind) {
            return false;
        }
        self.connections.push(Connection { target, kind });
        true
    }
}

/// Systems and links the user does not want to travel through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    avoided: HashSet<SystemId>,
    removed: HashSet<(String, String)>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit a system from the graph entirely.
    pub fn avoid(mut self, system: SystemId) -> Self {
        self.avoided.insert(system);
        self
    }

    /// Suppress every link between two systems, by name, in either order.
    pub fn remove_link(mut self, a: &str, b: &str) -> Self {
        self.removed.insert(link_key(a, b));
        self
    }

    /// Build an exclusion set from user-facing names.
    ///
    /// Unknown avoided systems and unknown link endpoints are reported with
    /// suggestions rather than silently ignored.
    pub fn resolve<S: AsRef<str>>(
        universe: &UniverseGraph,
        avoided: &[S],
        removed: &[(S, S)],
    ) -> Result<Self> {
        let mut set = Self::new();
        for name in avoided {
            set.avoided.insert(universe.resolve(name.as_ref())?.id);
        }
        for (a, b) in removed {
            let a = universe.resolve(a.as_ref())?;
            let b = universe.resolve(b.as_ref())?;
            set.removed.insert(link_key(&a.name, &b.name));
        }
        Ok(set)
    }

    pub fn is_avoided(&self, system: SystemId) -> bool {
        self.avoided.contains(&system)
    }

    pub fn is_removed(&self, a: &str, b: &str) -> bool {
        !self.removed.is_empty() && self.removed.contains(&link_key(a, b))
    }

    pub fn avoided(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.avoided.iter().copied()
    }
}

fn link_key(a: &str, b: &str) -> (String, String) {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Undirected multi-type route graph, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: HashMap<SystemId, Node>,
    edge_count: usize,
}

impl RouteGraph {
    pub fn node(&self, system: SystemId) -> Option<&Node> {
        self.nodes.get(&system)
    }

    /// Return the connections for a given system identifier.
    pub fn connections(&self, system: SystemId) -> &[Connection] {
        self.nodes
            .get(&system)
            .map(Node::connections)
            .unwrap_or(&[])
    }

    pub fn contains(&self, system: SystemId) -> bool {
        self.nodes.contains_key(&system)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges (each counted once per type).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// Combine the universe, gates, temporary links, and exclusions into a route graph.
///
/// Nodes are created lazily the first time an edge references them; avoided
/// systems never get a node, so any edge touching one is dropped. Gates whose
/// name does not resolve to a known destination are skipped.
pub fn build_route_graph(
    universe: &UniverseGraph,
    gates: &[Gate],
    temporary: &[TemporaryConnection],
    exclusions: &ExclusionSet,
) -> RouteGraph {
    let mut builder = GraphBuilder {
        universe,
        exclusions,
        graph: RouteGraph::default(),
    };

    for &(a, b) in universe.links() {
        builder.connect(a, b, EdgeKind::Stargate);
    }

    let mut skipped_gates = 0usize;
    for gate in gates {
        let Some(destination) = universe.gate_destination(&gate.name) else {
            skipped_gates += 1;
            debug!(gate = %gate.name, "gate destination could not be resolved");
            continue;
        };
        builder.connect(gate.solar_system_id, destination.id, EdgeKind::Ansiblex);
    }

    for connection in temporary {
        builder.connect(
            connection.system1_id,
            connection.system2_id,
            EdgeKind::Temporary,
        );
    }

    if skipped_gates > 0 {
        warn!(skipped_gates, "ignored gates with unresolvable names");
    }

    debug!(
        nodes = builder.graph.node_count(),
        edges = builder.graph.edge_count(),
        gates = gates.len(),
        temporary = temporary.len(),
        "built route graph"
    );

    builder.graph
}

struct GraphBuilder<'a> {
    universe: &'a UniverseGraph,
    exclusions: &'a ExclusionSet,
    graph: RouteGraph,
}

impl GraphBuilder<'_> {
    /// Ensure a node exists for `id`, returning `false` for avoided or unknown systems.
    fn ensure_node(&mut self, id: SystemId) -> bool {
        if self.exclusions.is_avoided(id) {
            return false;
        }
        if self.graph.nodes.contains_key(&id) {
            return true;
        }
        match self.universe.system(id) {
            Some(system) => {
                self.graph.nodes.insert(id, Node::new(system.clone()));
                true
            }
            None => false,
        }
    }

    fn connect(&mut self, a: SystemId, b: SystemId, kind: EdgeKind) {
        if a == b || !self.ensure_node(a) || !self.ensure_node(b) {
            return;
        }

        let (Some(name_a), Some(name_b)) = (
            self.universe.system(a).map(|s| s.name.as_str()),
            self.universe.system(b).map(|s| s.name.as_str()),
        ) else {
            return;
        };
        if self.exclusions.is_removed(name_a, name_b) {
            return;
        }

        let mut added = false;
        if let Some(node) = self.graph.nodes.get_mut(&a) {
            added |= node.push_unique(b, kind);
        }
        if let Some(node) = self.graph.nodes.get_mut(&b) {
            added |= node.push_unique(a, kind);
        }
        if added {
            self.graph.edge_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn gate(id: i64, name: &str, origin: SystemId) -> Gate {
        Gate {
            id,
            name: name.to_string(),
            solar_system_id: origin,
            region_id: None,
        }
    }

    #[test]
    fn connections_are_mutual_and_unique() {
        let universe = UniverseGraph::demo();
        let gates = vec![
            gate(1, "Alpha » Gamma - Gate1", 1),
            gate(2, "Gamma » Alpha - Gate2", 3),
        ];
        let graph = build_route_graph(&universe, &gates, &[], &ExclusionSet::new());

        let alpha = graph.connections(1);
        assert_eq!(
            alpha
                .iter()
                .filter(|c| c.target == 3 && c.kind == EdgeKind::Ansiblex)
                .count(),
            1
        );
        assert!(graph
            .connections(3)
            .contains(&Connection {
                target: 1,
                kind: EdgeKind::Ansiblex
            }));
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn avoided_systems_have_no_node() {
        let universe = UniverseGraph::demo();
        let exclusions = ExclusionSet::new().avoid(2);
        let graph = build_route_graph(&universe, &[], &[], &exclusions);

        assert!(!graph.contains(2));
        assert!(graph.connections(1).iter().all(|c| c.target != 2));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn removed_links_suppress_every_edge_type() {
        let universe = UniverseGraph::demo();
        let gates = vec![gate(1, "Alpha » Gamma - Gate1", 1)];
        let temporary = vec![TemporaryConnection {
            id: 1,
            system1_id: 3,
            system2_id: 1,
            expires_at: None,
        }];
        let exclusions = ExclusionSet::new().remove_link("gamma", "Alpha");
        let graph = build_route_graph(&universe, &gates, &temporary, &exclusions);

        assert!(graph.connections(1).iter().all(|c| c.target != 3));
        assert!(graph.connections(3).iter().all(|c| c.target != 1));
    }

    #[test]
    fn malformed_gate_names_are_skipped() {
        let universe = UniverseGraph::demo();
        let gates = vec![
            gate(1, "Alpha to Gamma", 1),
            gate(2, "Alpha » Nowhere - x", 1),
        ];
        let graph = build_route_graph(&universe, &gates, &[], &ExclusionSet::new());
        assert!(graph
            .connections(1)
            .iter()
            .all(|c| c.kind == EdgeKind::Stargate));
    }

    #[test]
    fn isolated_systems_are_not_materialised() {
        let mut systems: Vec<System> = UniverseGraph::demo().systems().cloned().collect();
        systems.push(System {
            id: 4,
            name: "Delta".to_string(),
            security: 0.1,
            region_id: 1,
            position: None,
        });
        let universe = UniverseGraph::new(systems, [(1, 2)], HashMap::new());
        let graph = build_route_graph(&universe, &[], &[], &ExclusionSet::new());
        assert_eq!(graph.node_count(), 2);
        assert!(!graph.contains(4));
    }

    #[test]
    fn resolve_reports_unknown_names() {
        let universe = UniverseGraph::demo();
        let err = ExclusionSet::resolve(&universe, &["Betta"], &[]).expect_err("typo");
        assert!(err.to_string().contains("Did you mean 'Beta'?"));

        let set = ExclusionSet::resolve(&universe, &["beta"], &[("Alpha", "Gamma")])
            .expect("valid names");
        assert!(set.is_avoided(2));
        assert!(set.is_removed("Gamma", "Alpha"));
    }
}
