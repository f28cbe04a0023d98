//! Capital jump planner.
//!
//! Long-range vehicles ignore the stargate network: any system within the jump
//! range (straight-line light-years) is a neighbour. Adjacency is evaluated on
//! demand during the search by scanning every candidate system, which costs
//! O(N) per expansion. That is fine for the small capital catalog; for larger
//! catalogs call [`CapitalPlanner::with_spatial_index`] to answer neighbour
//! queries from a KD-tree instead, and [`CapitalPlanner::with_expansion_limit`]
//! to bound the work done per query.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::universe::SystemId;

/// Meters in one light-year.
pub const METERS_PER_LIGHT_YEAR: f64 = 9.4607e15;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Relative slack on radius queries; exact distances are re-checked afterwards.
const RADIUS_SLACK: f64 = 1e-9;

/// A system with coordinates in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalSystem {
    pub id: SystemId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CapitalSystem {
    /// Coordinates in light-years, with `-0.0` folded into `0.0`.
    fn coords_ly(&self) -> [f64; 3] {
        [
            self.x / METERS_PER_LIGHT_YEAR + 0.0,
            self.y / METERS_PER_LIGHT_YEAR + 0.0,
            self.z / METERS_PER_LIGHT_YEAR + 0.0,
        ]
    }
}

/// Straight-line distance between two systems in light-years.
pub fn distance_ly(a: &CapitalSystem, b: &CapitalSystem) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt() / METERS_PER_LIGHT_YEAR
}

/// Sum of light-year distances between consecutive systems.
pub fn path_distance(systems: &[CapitalSystem]) -> f64 {
    systems
        .windows(2)
        .map(|pair| distance_ly(&pair[0], &pair[1]))
        .sum()
}

/// Read a JSON array of `{id, name, x, y, z}` records.
pub fn load_capital_systems(path: &Path) -> Result<Vec<CapitalSystem>> {
    if !path.exists() {
        return Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path)?;
    let systems: Vec<CapitalSystem> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), systems = systems.len(), "loaded capital systems");
    Ok(systems)
}

/// A planned capital route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalRoute {
    pub systems: Vec<CapitalSystem>,
}

impl CapitalRoute {
    pub fn hop_count(&self) -> usize {
        self.systems.len().saturating_sub(1)
    }

    /// Total light-years travelled.
    pub fn distance_ly(&self) -> f64 {
        path_distance(&self.systems)
    }
}

/// KD-tree over distinct coordinates.
///
/// Tree items index into `groups`, which lists every system at that point.
/// A kiddo leaf cannot split more than `BUCKET_SIZE` identical points, so
/// co-located systems share one entry.
struct SpatialIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    groups: Vec<Vec<usize>>,
}

impl SpatialIndex {
    fn build(systems: &[CapitalSystem]) -> Self {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut by_point: HashMap<[u64; 3], usize> = HashMap::new();

        for (index, system) in systems.iter().enumerate() {
            let coords = system.coords_ly();
            match by_point.entry(coords.map(f64::to_bits)) {
                Entry::Occupied(slot) => groups[*slot.get()].push(index),
                Entry::Vacant(slot) => {
                    let group = groups.len();
                    slot.insert(group);
                    groups.push(vec![index]);
                    tree.add(&coords, group);
                }
            }
        }
        Self { tree, groups }
    }

    /// Candidate indices within `radius` light-years of `point`.
    fn within(&self, point: &[f64; 3], radius: f64) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .within::<SquaredEuclidean>(point, radius * radius)
            .into_iter()
            .flat_map(move |neighbour| self.groups[neighbour.item].iter().copied())
    }
}

/// Breadth-first planner over a jump-range adjacency.
pub struct CapitalPlanner {
    /// Candidate systems ordered by id.
    systems: Vec<CapitalSystem>,
    name_to_index: HashMap<String, usize>,
    jump_range: f64,
    spatial: Option<SpatialIndex>,
    expansion_limit: Option<usize>,
}

impl std::fmt::Debug for CapitalPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapitalPlanner")
            .field("systems", &self.systems.len())
            .field("jump_range", &self.jump_range)
            .field("indexed", &self.spatial.is_some())
            .field("expansion_limit", &self.expansion_limit)
            .finish()
    }
}

impl CapitalPlanner {
    /// Create a planner for the given catalog and jump range (light-years).
    pub fn new(systems: impl IntoIterator<Item = CapitalSystem>, jump_range: f64) -> Result<Self> {
        if !jump_range.is_finite() || jump_range <= 0.0 {
            return Err(Error::InvalidJumpRange { value: jump_range });
        }

        let mut systems: Vec<CapitalSystem> = systems.into_iter().collect();
        systems.sort_by_key(|s| s.id);
        systems.dedup_by_key(|s| s.id);

        // Duplicate names resolve to the lowest id.
        let mut name_to_index = HashMap::with_capacity(systems.len());
        for (index, system) in systems.iter().enumerate() {
            name_to_index.entry(system.name.clone()).or_insert(index);
        }

        Ok(Self {
            systems,
            name_to_index,
            jump_range,
            spatial: None,
            expansion_limit: None,
        })
    }

    /// Answer neighbour queries from a KD-tree instead of a linear scan.
    pub fn with_spatial_index(mut self) -> Self {
        let index = SpatialIndex::build(&self.systems);
        info!(
            systems = self.systems.len(),
            points = index.groups.len(),
            "built capital spatial index"
        );
        self.spatial = Some(index);
        self
    }

    /// Fail a query once more than `limit` systems have been expanded.
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = Some(limit);
        self
    }

    pub fn jump_range(&self) -> f64 {
        self.jump_range
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Find a route with the fewest jumps between two systems (exact names).
    pub fn plan(&self, start: &str, end: &str) -> Result<CapitalRoute> {
        info!(from = start, to = end, range = self.jump_range, "capital planner");
        let start_index = self.resolve(start)?;
        let end_index = self.resolve(end)?;

        if start_index == end_index {
            return Ok(CapitalRoute {
                systems: vec![self.systems[start_index].clone()],
            });
        }

        let mut parents: Vec<Option<usize>> = vec![None; self.systems.len()];
        let mut visited = vec![false; self.systems.len()];
        let mut queue = VecDeque::new();
        let mut expansions = 0usize;

        visited[start_index] = true;
        queue.push_back(start_index);

        while let Some(current) = queue.pop_front() {
            if current == end_index {
                break;
            }

            expansions += 1;
            if let Some(limit) = self.expansion_limit {
                if expansions > limit {
                    return Err(Error::SearchLimitExceeded { limit });
                }
            }

            for next in self.neighbours(current) {
                if !visited[next] {
                    visited[next] = true;
                    parents[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        if !visited[end_index] {
            return Err(Error::RouteNotFound {
                start: start.to_string(),
                goal: end.to_string(),
            });
        }

        let mut route = Vec::new();
        let mut current = Some(end_index);
        while let Some(index) = current {
            route.push(self.systems[index].clone());
            current = parents[index];
        }
        route.reverse();

        debug!(hops = route.len() - 1, expansions, "capital route found");
        Ok(CapitalRoute { systems: route })
    }

    fn resolve(&self, name: &str) -> Result<usize> {
        self.name_to_index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownSystem {
                name: name.to_string(),
                suggestions: self.suggestions(name),
            })
    }

    fn suggestions(&self, name: &str) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .systems
            .iter()
            .map(|s| (strsim::normalized_levenshtein(name, &s.name), s.name.as_str()))
            .filter(|(score, _)| *score >= 0.6)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().take(3).map(|(_, n)| n.to_string()).collect()
    }

    /// Systems within jump range of `index`, in id order.
    fn neighbours(&self, index: usize) -> Vec<usize> {
        let origin = &self.systems[index];
        let in_range = |other: usize| {
            other != index && distance_ly(origin, &self.systems[other]) <= self.jump_range
        };

        match &self.spatial {
            Some(index) => {
                let radius = self.jump_range * (1.0 + RADIUS_SLACK);
                let mut found: Vec<usize> = index
                    .within(&origin.coords_ly(), radius)
                    .filter(|&other| in_range(other))
                    .collect();
                found.sort_unstable();
                found
            }
            None => (0..self.systems.len()).filter(|&other| in_range(other)).collect(),
        }
    }
}
