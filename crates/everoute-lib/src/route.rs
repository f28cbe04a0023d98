//! Route planning over the combined stargate / jump bridge / temporary graph.
//!
//! A [`RoutePlanner`] is built once from a universe snapshot, the current gate
//! and temporary link lists, and the user's exclusions. It is immutable
//! afterwards and can be shared across threads; rebuild it to pick up new
//! gates, links, or exclusions.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use everoute_lib::{ExclusionSet, RoutePlanner, UniverseGraph};
//!
//! let planner = RoutePlanner::new(
//!     Arc::new(UniverseGraph::demo()),
//!     &[],
//!     &[],
//!     ExclusionSet::new(),
//! );
//! let routes = planner.find("Alpha", "Gamma")?;
//! assert_eq!(routes[0].hop_count(), 1);
//! # Ok::<(), everoute_lib::Error>(())
//! ```

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::graph::{build_route_graph, ExclusionSet, RouteGraph};
use crate::path::find_shortest_paths;
use crate::store::{Gate, Store, TemporaryConnection};
use crate::universe::UniverseGraph;
use crate::waypoint::{build_waypoints, rank_routes, GateLookup, Route, Waypoint};

/// Read-only route planner for one snapshot of gates, links, and exclusions.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    universe: Arc<UniverseGraph>,
    graph: RouteGraph,
    gates: GateLookup,
    exclusions: ExclusionSet,
}

impl RoutePlanner {
    pub fn new(
        universe: Arc<UniverseGraph>,
        gates: &[Gate],
        temporary: &[TemporaryConnection],
        exclusions: ExclusionSet,
    ) -> Self {
        let graph = build_route_graph(&universe, gates, temporary, &exclusions);
        let gates = GateLookup::new(&universe, gates);
        Self {
            universe,
            graph,
            gates,
            exclusions,
        }
    }

    /// Snapshot gates and active temporary links from a store and build a planner.
    pub fn from_store(
        universe: Arc<UniverseGraph>,
        store: &dyn Store,
        exclusions: ExclusionSet,
    ) -> Result<Self> {
        let gates = store.list_gates()?;
        let temporary = store.list_temporary_connections()?;
        Ok(Self::new(universe, &gates, &temporary, exclusions))
    }

    pub fn universe(&self) -> &UniverseGraph {
        &self.universe
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Find every minimal-length route between two system names, best first.
    ///
    /// Unknown names fail with [`Error::UnknownSystem`]. An unreachable goal, or
    /// an avoided start or goal, yields an empty list.
    pub fn find(&self, from: &str, to: &str) -> Result<Vec<Route>> {
        let start = self.universe.resolve(from)?;
        let goal = self.universe.resolve(to)?;

        if self.exclusions.is_avoided(start.id) || self.exclusions.is_avoided(goal.id) {
            info!(from, to, routes = 0, "route query touches an avoided system");
            return Ok(Vec::new());
        }

        // Isolated systems never get a node, but a zero-hop route is still valid.
        if start.id == goal.id && !self.graph.contains(start.id) {
            return Ok(vec![Route {
                waypoints: vec![Waypoint {
                    system_id: start.id,
                    system_name: start.name.clone(),
                    system_security: start.security,
                    region_name: self.universe.region_name(start.region_id).to_string(),
                    wormhole: start.is_wormhole(),
                    connection_type: None,
                    gate_id: None,
                    gate_name: None,
                    target_system: None,
                }],
            }]);
        }

        let mut routes: Vec<Route> = find_shortest_paths(&self.graph, start.id, goal.id)
            .iter()
            .map(|path| build_waypoints(path, &self.graph, &self.universe, &self.gates))
            .collect();
        rank_routes(&mut routes);

        info!(from, to, routes = routes.len(), "route query");
        Ok(routes)
    }

    /// Like [`RoutePlanner::find`], but an empty result is an error.
    pub fn find_required(&self, from: &str, to: &str) -> Result<Vec<Route>> {
        let routes = self.find(from, to)?;
        if routes.is_empty() {
            return Err(Error::RouteNotFound {
                start: from.to_string(),
                goal: to.to_string(),
            });
        }
        Ok(routes)
    }
}
