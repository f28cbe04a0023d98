use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::universe::{SystemId, UniverseGraph};

/// Stargate hop counter.
///
/// Only static links are considered: no gates, temporary links, or exclusions.
/// Use this where a distance metric is needed rather than a full route.
#[derive(Debug, Clone)]
pub struct JumpCalculator {
    universe: Arc<UniverseGraph>,
    adjacency: HashMap<SystemId, Vec<SystemId>>,
}

impl JumpCalculator {
    pub fn new(universe: Arc<UniverseGraph>) -> Self {
        let mut adjacency: HashMap<SystemId, Vec<SystemId>> = HashMap::new();
        for &(a, b) in universe.links() {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        Self {
            universe,
            adjacency,
        }
    }

    /// Minimum number of stargate jumps between two named systems.
    pub fn between(&self, from: &str, to: &str) -> Result<usize> {
        debug!(from, to, "jump count");
        let start = self.universe.resolve(from)?.id;
        let goal = self.universe.resolve(to)?.id;
        if start == goal {
            return Ok(0);
        }

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);

        while let Some((current, distance)) = queue.pop_front() {
            let neighbours = self.adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            for &next in neighbours {
                if next == goal {
                    return Ok(distance + 1);
                }
                if visited.insert(next) {
                    queue.push_back((next, distance + 1));
                }
            }
        }

        Err(Error::RouteNotFound {
            start: from.to_string(),
            goal: to.to_string(),
        })
    }
}
