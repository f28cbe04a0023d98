//! everoute library entry points.
//!
//! This crate loads a universe snapshot into memory, combines it with jump
//! bridges and temporary links into a route graph, and answers route queries
//! with every minimal-length path ranked by edge type. A separate capital
//! planner computes reachability from system coordinates and a jump range,
//! and a small jump calculator reports plain stargate hop counts. Higher-level
//! consumers (the CLI) should only depend on the functions exported here.
//!

#![deny(warnings)]

pub mod capital;
pub mod db;
pub mod error;
pub mod graph;
pub mod jumps;
pub mod path;
pub mod route;
pub mod store;
pub mod universe;
pub mod waypoint;

pub use capital::{
    distance_ly, load_capital_systems, path_distance, CapitalPlanner, CapitalRoute, CapitalSystem,
    METERS_PER_LIGHT_YEAR,
};
pub use db::load_universe;
pub use error::{Error, Result};
pub use graph::{build_route_graph, Connection, EdgeKind, ExclusionSet, Node, RouteGraph};
pub use jumps::JumpCalculator;
pub use path::{find_shortest_paths, Path};
pub use route::RoutePlanner;
pub use store::{ConnectionsFile, Gate, MemoryStore, Store, TemporaryConnection};
pub use universe::{
    is_wormhole_id, parse_gate_destination, RegionId, System, SystemId, SystemPosition,
    UniverseGraph,
};
pub use waypoint::{build_waypoints, rank_routes, GateLookup, Route, Waypoint};
