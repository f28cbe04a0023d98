use std::collections::HashSet;

use crate::graph::{Connection, EdgeKind, RouteGraph};
use crate::universe::SystemId;

/// One walk through the route graph, starting at `start`.
///
/// Each connection names the system reached and the edge type used to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub start: SystemId,
    pub connections: Vec<Connection>,
}

impl Path {
    fn new(start: SystemId) -> Self {
        Self {
            start,
            connections: Vec::new(),
        }
    }

    /// System the walk currently ends at.
    pub fn terminal(&self) -> SystemId {
        self.connections
            .last()
            .map(|c| c.target)
            .unwrap_or(self.start)
    }

    pub fn edge_count(&self) -> usize {
        self.connections.len()
    }

    /// Systems visited in order, including the start.
    pub fn systems(&self) -> impl Iterator<Item = SystemId> + '_ {
        std::iter::once(self.start).chain(self.connections.iter().map(|c| c.target))
    }

    /// Number of edges of the given type.
    pub fn count_kind(&self, kind: EdgeKind) -> usize {
        self.connections.iter().filter(|c| c.kind == kind).count()
    }

    fn extended(&self, connection: Connection) -> Self {
        let mut connections = Vec::with_capacity(self.connections.len() + 1);
        connections.extend_from_slice(&self.connections);
        connections.push(connection);
        Self {
            start: self.start,
            connections,
        }
    }
}

/// Enumerate shortest paths from `start` to `goal` by edge count.
///
/// The search runs breadth-first over partial paths, one layer at a time. Every
/// path of the first layer that reaches the goal is returned, in discovery
/// order; nothing longer is ever produced. A system is expanded at most once,
/// but reaching the goal is checked independently of that, so paths that share
/// a prefix and only differ on the final edge are all kept.
///
/// Returns an empty list when `start` is not in the graph or the goal cannot be
/// reached.
pub fn find_shortest_paths(graph: &RouteGraph, start: SystemId, goal: SystemId) -> Vec<Path> {
    if !graph.contains(start) {
        return Vec::new();
    }
    if start == goal {
        return vec![Path::new(start)];
    }

    let mut expanded: HashSet<SystemId> = HashSet::new();
    let mut layer = vec![Path::new(start)];

    while !layer.is_empty() {
        let mut found = Vec::new();
        let mut next = Vec::new();

        for path in &layer {
            let terminal = path.terminal();
            if !expanded.insert(terminal) {
                continue;
            }

            for &connection in graph.connections(terminal) {
                if connection.target == goal {
                    found.push(path.extended(connection));
                } else if found.is_empty() && !expanded.contains(&connection.target) {
                    next.push(path.extended(connection));
                }
            }
        }

        if !found.is_empty() {
            return found;
        }
        layer = next;
    }

    Vec::new()
}
