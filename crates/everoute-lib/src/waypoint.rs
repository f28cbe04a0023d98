//! Human-facing route output.
//!
//! Converts raw search paths into ordered [`Waypoint`] sequences and ranks
//! equal-length alternatives so permanent infrastructure is preferred over
//! jump bridges, and jump bridges over temporary links.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{EdgeKind, RouteGraph};
use crate::path::Path;
use crate::store::Gate;
use crate::universe::{is_wormhole_id, SystemId, UniverseGraph};

/// One annotated stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub system_id: SystemId,
    pub system_name: String,
    pub system_security: f64,
    pub region_name: String,
    pub wormhole: bool,
    /// Edge type used to arrive here; `None` for the start system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<EdgeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_name: Option<String>,
    /// Name of the next system on the route; `None` for the goal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_system: Option<String>,
}

/// Ordered waypoints from start to goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Route {
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn hop_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub fn ansiblex_count(&self) -> usize {
        self.count_kind(EdgeKind::Ansiblex)
    }

    pub fn temporary_count(&self) -> usize {
        self.count_kind(EdgeKind::Temporary)
    }

    fn count_kind(&self, kind: EdgeKind) -> usize {
        self.waypoints
            .iter()
            .filter(|w| w.connection_type == Some(kind))
            .count()
    }

    /// System ids visited in order.
    pub fn system_ids(&self) -> Vec<SystemId> {
        self.waypoints.iter().map(|w| w.system_id).collect()
    }
}

/// Gates keyed by the system they are anchored in.
#[derive(Debug, Clone, Default)]
pub struct GateLookup {
    by_origin: HashMap<SystemId, Vec<(Option<SystemId>, Gate)>>,
}

impl GateLookup {
    pub fn new(universe: &UniverseGraph, gates: &[Gate]) -> Self {
        let mut by_origin: HashMap<SystemId, Vec<(Option<SystemId>, Gate)>> = HashMap::new();
        for gate in gates {
            let destination = universe.gate_destination(&gate.name).map(|s| s.id);
            by_origin
                .entry(gate.solar_system_id)
                .or_default()
                .push((destination, gate.clone()));
        }
        Self { by_origin }
    }

    /// Gate used to travel from `from` to `to`.
    ///
    /// Prefers the gate anchored at `from` leading to `to`; otherwise falls
    /// back to the gate anchored at `to` that leads back to `from`, since gate
    /// data may only be recorded on one side.
    pub fn gate_between(&self, from: SystemId, to: SystemId) -> Option<&Gate> {
        self.anchored(from, to).or_else(|| self.anchored(to, from))
    }

    fn anchored(&self, origin: SystemId, destination: SystemId) -> Option<&Gate> {
        self.by_origin
            .get(&origin)?
            .iter()
            .find(|(dest, _)| *dest == Some(destination))
            .map(|(_, gate)| gate)
    }
}

/// Turn a search path into forward-ordered waypoints.
///
/// The path is walked from the goal back to the start, then reversed, so the
/// first waypoint is the start system (without a connection type) and the last
/// is the goal.
pub fn build_waypoints(
    path: &Path,
    graph: &RouteGraph,
    universe: &UniverseGraph,
    gates: &GateLookup,
) -> Route {
    let systems: Vec<SystemId> = path.systems().collect();
    let mut waypoints = Vec::with_capacity(systems.len());

    for index in (0..systems.len()).rev() {
        let Some(node) = graph.node(systems[index]) else {
            continue;
        };
        let system = &node.system;

        let arrival = index
            .checked_sub(1)
            .map(|prev| (systems[prev], path.connections[prev].kind));
        let gate = match arrival {
            Some((previous, EdgeKind::Ansiblex)) => gates.gate_between(previous, system.id),
            _ => None,
        };
        let target_system = systems
            .get(index + 1)
            .and_then(|next| graph.node(*next))
            .map(|next| next.system.name.clone());

        waypoints.push(Waypoint {
            system_id: system.id,
            system_name: system.name.clone(),
            system_security: system.security,
            region_name: universe.region_name(system.region_id).to_string(),
            wormhole: is_wormhole_id(system.id),
            connection_type: arrival.map(|(_, kind)| kind),
            gate_id: gate.map(|g| g.id),
            gate_name: gate.map(|g| g.name.clone()),
            target_system,
        });
    }

    waypoints.reverse();
    Route { waypoints }
}

/// Order routes by fewest jump bridges, then fewest temporary links.
///
/// The sort is stable, so remaining ties keep discovery order.
pub fn rank_routes(routes: &mut [Route]) {
    routes.sort_by_key(|route| (route.ansiblex_count(), route.temporary_count()));
}
