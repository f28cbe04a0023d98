//! Immutable universe snapshot: systems, static stargate links, and region names.
//!
//! A [`UniverseGraph`] is produced once by an import step (see
//! [`crate::db::load_universe`]) and then shared read-only by every planner.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for a solar system.
pub type SystemId = i64;

/// Numeric identifier for a region.
pub type RegionId = i64;

/// First system id of the wormhole-space block (inclusive).
pub const WORMHOLE_ID_START: SystemId = 31_000_000;

/// End of the wormhole-space block (exclusive).
pub const WORMHOLE_ID_END: SystemId = 32_000_000;

/// Minimum normalized similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Separator between origin and destination in a gate name.
const GATE_ROUTE_SEPARATOR: &str = " » ";

/// Separator between the destination and the free-text suffix of a gate name.
const GATE_SUFFIX_SEPARATOR: &str = " - ";

/// Cartesian coordinates for a solar system, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SystemPosition {
    /// Calculate the Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A solar system as loaded from the universe dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub id: SystemId,
    pub name: String,
    pub security: f64,
    pub region_id: RegionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SystemPosition>,
}

impl System {
    /// Whether the system lies in the wormhole id block.
    pub fn is_wormhole(&self) -> bool {
        is_wormhole_id(self.id)
    }
}

/// Returns `true` for ids in `31_000_000..32_000_000`.
pub fn is_wormhole_id(id: SystemId) -> bool {
    (WORMHOLE_ID_START..WORMHOLE_ID_END).contains(&id)
}

/// In-memory snapshot of the universe topology.
#[derive(Debug, Clone, Default)]
pub struct UniverseGraph {
    systems: BTreeMap<SystemId, System>,
    name_index: HashMap<String, SystemId>,
    links: Vec<(SystemId, SystemId)>,
    regions: HashMap<RegionId, String>,
}

impl UniverseGraph {
    /// Assemble a snapshot from its parts.
    ///
    /// Links are kept in the given order; a link listed twice (in either
    /// direction) is only stored once.
    pub fn new(
        systems: impl IntoIterator<Item = System>,
        links: impl IntoIterator<Item = (SystemId, SystemId)>,
        regions: HashMap<RegionId, String>,
    ) -> Self {
        let systems: BTreeMap<SystemId, System> =
            systems.into_iter().map(|system| (system.id, system)).collect();

        // Names differing only in case resolve to the lowest id.
        let mut name_index = HashMap::with_capacity(systems.len());
        for system in systems.values() {
            name_index
                .entry(system.name.to_lowercase())
                .or_insert(system.id);
        }

        let mut seen = HashSet::new();
        let links = links
            .into_iter()
            .filter(|&(a, b)| seen.insert((a.min(b), a.max(b))))
            .collect();

        Self {
            systems,
            name_index,
            links,
            regions,
        }
    }

    /// Small three-system triangle used for demos and tests.
    ///
    /// Systems sit on a line three light-years apart, so a 5 ly capital
    /// route from Alpha to Gamma needs a stop at Beta.
    pub fn demo() -> Self {
        let system = |id, name: &str, security, x_ly: f64| System {
            id,
            name: name.to_string(),
            security,
            region_id: 1,
            position: Some(SystemPosition {
                x: x_ly * crate::capital::METERS_PER_LIGHT_YEAR,
                y: 0.0,
                z: 0.0,
            }),
        };
        Self::new(
            [
                system(1, "Alpha", 0.5, 0.0),
                system(2, "Beta", 0.6, 3.0),
                system(3, "Gamma", 0.7, 6.0),
            ],
            [(1, 2), (2, 3), (1, 3)],
            HashMap::from([(1, "Demo Region".to_string())]),
        )
    }

    /// All systems ordered by identifier.
    pub fn systems(&self) -> impl Iterator<Item = &System> {
        self.systems.values()
    }

    /// Number of systems in the snapshot.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Static stargate links as unordered pairs.
    pub fn links(&self) -> &[(SystemId, SystemId)] {
        &self.links
    }

    /// Lookup a system by identifier.
    pub fn system(&self, id: SystemId) -> Option<&System> {
        self.systems.get(&id)
    }

    /// Lookup a system by its case-insensitive name.
    pub fn system_by_name(&self, name: &str) -> Option<&System> {
        self.name_index
            .get(&name.to_lowercase())
            .and_then(|id| self.systems.get(id))
    }

    /// Resolve a name or fail with suggestions for near misses.
    pub fn resolve(&self, name: &str) -> Result<&System> {
        self.system_by_name(name)
            .ok_or_else(|| Error::UnknownSystem {
                name: name.to_string(),
                suggestions: self.fuzzy_system_matches(name, 3),
            })
    }

    /// Display name of a region, empty when the region is unknown.
    pub fn region_name(&self, region_id: RegionId) -> &str {
        self.regions
            .get(&region_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Resolve the destination system encoded in a gate name.
    pub fn gate_destination(&self, gate_name: &str) -> Option<&System> {
        parse_gate_destination(gate_name).and_then(|name| self.system_by_name(name))
    }

    /// Suggest up to `limit` system names similar to `name`, best match first.
    pub fn fuzzy_system_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .systems
            .values()
            .filter_map(|system| {
                let score = strsim::normalized_levenshtein(&needle, &system.name.to_lowercase());
                (score >= SUGGESTION_THRESHOLD).then_some((score, system.name.as_str()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Project every positioned system into capital planner input.
    pub fn capital_systems(&self) -> Vec<crate::capital::CapitalSystem> {
        self.systems
            .values()
            .filter_map(|system| {
                system.position.map(|pos| crate::capital::CapitalSystem {
                    id: system.id,
                    name: system.name.clone(),
                    x: pos.x,
                    y: pos.y,
                    z: pos.z,
                })
            })
            .collect()
    }
}

/// Extract the destination name from a gate name such as `"A » B - Bridge"`.
///
/// Returns `None` when the name lacks the `" » "` separator.
pub fn parse_gate_destination(gate_name: &str) -> Option<&str> {
    let destination = gate_name.split(GATE_ROUTE_SEPARATOR).nth(1)?;
    let destination = match destination.find(GATE_SUFFIX_SEPARATOR) {
        Some(idx) => &destination[..idx],
        None => destination,
    };
    Some(destination)
}
