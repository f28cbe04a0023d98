//! Runtime configuration resolved from command-line flags and environment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use everoute_lib::{
    load_capital_systems, load_universe, CapitalSystem, ConnectionsFile, MemoryStore,
    UniverseGraph,
};

pub const DATASET_ENV: &str = "EVEROUTE_DATASET";
pub const CONNECTIONS_ENV: &str = "EVEROUTE_CONNECTIONS";
pub const CAPITAL_SYSTEMS_ENV: &str = "EVEROUTE_CAPITAL_SYSTEMS";
pub const JUMP_RANGE_ENV: &str = "EVEROUTE_JUMP_RANGE";

/// Jump range used when neither `--range` nor the environment set one.
pub const DEFAULT_JUMP_RANGE: f64 = 5.0;

/// Values supplied on the command line. Unset fields fall back to the environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dataset: Option<PathBuf>,
    pub connections: Option<PathBuf>,
    pub capital_systems: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// SQLite universe dataset. `None` selects the built-in demo universe.
    pub dataset: Option<PathBuf>,
    /// JSON document with gates and temporary links.
    pub connections: Option<PathBuf>,
    /// JSON capital catalog. `None` projects the universe's positioned systems.
    pub capital_systems: Option<PathBuf>,
    pub jump_range: f64,
}

impl CliConfig {
    pub fn resolve(overrides: CliOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        overrides: CliOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path_from_env = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        let jump_range = match lookup(JUMP_RANGE_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{JUMP_RANGE_ENV} must be a number, got '{raw}'"))?,
            None => DEFAULT_JUMP_RANGE,
        };

        Ok(Self {
            dataset: overrides.dataset.or_else(|| path_from_env(DATASET_ENV)),
            connections: overrides
                .connections
                .or_else(|| path_from_env(CONNECTIONS_ENV)),
            capital_systems: overrides
                .capital_systems
                .or_else(|| path_from_env(CAPITAL_SYSTEMS_ENV)),
            jump_range,
        })
    }

    /// Load the configured universe, or the demo universe when none is set.
    pub fn load_universe(&self) -> Result<Arc<UniverseGraph>> {
        let universe = match &self.dataset {
            Some(path) => load_universe(path)
                .with_context(|| format!("failed to load dataset from {}", path.display()))?,
            None => {
                info!("no dataset configured; using the demo universe");
                UniverseGraph::demo()
            }
        };
        debug!(
            systems = universe.system_count(),
            links = universe.links().len(),
            "universe ready"
        );
        Ok(Arc::new(universe))
    }

    /// Store holding gates and temporary links from the connections file.
    ///
    /// The capital catalog is not read, so route queries do not depend on it.
    pub fn load_connections_store(&self) -> Result<MemoryStore> {
        let no_systems: Vec<CapitalSystem> = Vec::new();
        match &self.connections {
            Some(path) => Ok(read_connections(path)?.into_store(no_systems)),
            None => Ok(MemoryStore::new(Vec::new(), Vec::new(), no_systems)),
        }
    }

    /// Store holding only the capital catalog.
    pub fn load_capital_store(&self, universe: &UniverseGraph) -> Result<MemoryStore> {
        let catalog = self.capital_catalog(universe)?;
        Ok(MemoryStore::new(Vec::new(), Vec::new(), catalog))
    }

    /// Systems available to the capital planner.
    pub fn capital_catalog(&self, universe: &UniverseGraph) -> Result<Vec<CapitalSystem>> {
        match &self.capital_systems {
            Some(path) => load_capital_systems(path).with_context(|| {
                format!("failed to load capital systems from {}", path.display())
            }),
            None => Ok(universe.capital_systems()),
        }
    }
}

fn read_connections(path: &Path) -> Result<ConnectionsFile> {
    ConnectionsFile::from_path(path)
        .with_context(|| format!("failed to load connections from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use everoute_lib::Store;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| env.get(key).cloned()
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let overrides = CliOverrides {
            dataset: Some(PathBuf::from("flag.db")),
            ..CliOverrides::default()
        };
        let config = CliConfig::resolve_with(
            overrides,
            lookup(&[(DATASET_ENV, "env.db"), (CONNECTIONS_ENV, "links.json")]),
        )
        .expect("config");
        assert_eq!(config.dataset, Some(PathBuf::from("flag.db")));
        assert_eq!(config.connections, Some(PathBuf::from("links.json")));
        assert_eq!(config.capital_systems, None);
    }

    #[test]
    fn jump_range_defaults_and_parses() {
        let config = CliConfig::resolve_with(CliOverrides::default(), lookup(&[])).expect("config");
        assert_eq!(config.jump_range, DEFAULT_JUMP_RANGE);
        assert_eq!(config.dataset, None);

        let config =
            CliConfig::resolve_with(CliOverrides::default(), lookup(&[(JUMP_RANGE_ENV, " 7.5 ")]))
                .expect("config");
        assert_eq!(config.jump_range, 7.5);
    }

    #[test]
    fn rejects_non_numeric_jump_range() {
        let err = CliConfig::resolve_with(CliOverrides::default(), lookup(&[(JUMP_RANGE_ENV, "far")]))
            .expect_err("not a number");
        assert!(err.to_string().contains(JUMP_RANGE_ENV));
    }

    #[test]
    fn blank_environment_paths_are_ignored() {
        let config = CliConfig::resolve_with(CliOverrides::default(), lookup(&[(DATASET_ENV, "  ")]))
            .expect("config");
        assert_eq!(config.dataset, None);
    }

    #[test]
    fn demo_universe_backs_unconfigured_stores() {
        let config = CliConfig::resolve_with(CliOverrides::default(), lookup(&[])).expect("config");
        let universe = config.load_universe().expect("demo");
        assert_eq!(universe.system_count(), 3);

        let store = config.load_connections_store().expect("store");
        assert!(store.list_gates().expect("gates").is_empty());
        assert!(store.list_systems().expect("systems").is_empty());

        let store = config.load_capital_store(&universe).expect("store");
        assert_eq!(store.list_systems().expect("systems").len(), 3);
    }

    #[test]
    fn connections_store_ignores_capital_catalog() {
        let config = CliConfig::resolve_with(
            CliOverrides::default(),
            lookup(&[(CAPITAL_SYSTEMS_ENV, "/definitely/missing.json")]),
        )
        .expect("config");
        assert!(config.load_connections_store().is_ok());

        let universe = config.load_universe().expect("demo");
        let err = config
            .load_capital_store(&universe)
            .expect_err("missing catalog");
        assert!(err.to_string().contains("failed to load capital systems"));
    }
}
