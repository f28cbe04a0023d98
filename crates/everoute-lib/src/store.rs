//! Persistence contract for jump bridges and temporary connections.
//!
//! Route planners never talk to a store while answering queries; they take a
//! snapshot through [`Store`] at construction time. [`MemoryStore`] is the
//! in-process backend used by the CLI and tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capital::CapitalSystem;
use crate::error::{Error, Result};
use crate::universe::{RegionId, SystemId};

/// A jump bridge anchored in `solar_system_id`.
///
/// The destination is not stored; it is encoded in `name` as
/// `"<Origin> » <Destination> - <free text>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub solar_system_id: SystemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
}

/// User-declared undirected link between two systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryConnection {
    #[serde(default)]
    pub id: i64,
    pub system1_id: SystemId,
    pub system2_id: SystemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TemporaryConnection {
    /// Whether the link has lapsed at `now`. Links without an expiry never lapse.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}

/// Storage operations the planners depend on.
pub trait Store: Send + Sync {
    fn list_gates(&self) -> Result<Vec<Gate>>;

    /// Temporary connections that have not expired yet.
    fn list_temporary_connections(&self) -> Result<Vec<TemporaryConnection>>;

    /// Systems with coordinates, keyed by id (capital planner input).
    fn list_systems(&self) -> Result<BTreeMap<SystemId, CapitalSystem>>;

    fn create_gate(&self, gate: Gate) -> Result<i64>;
    fn update_gate(&self, gate: Gate) -> Result<()>;
    fn delete_gate(&self, id: i64) -> Result<()>;

    fn create_temporary_connection(&self, connection: TemporaryConnection) -> Result<i64>;
    fn update_temporary_connection(&self, connection: TemporaryConnection) -> Result<()>;
    fn delete_temporary_connection(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    gates: Vec<Gate>,
    temporary: Vec<TemporaryConnection>,
    systems: BTreeMap<SystemId, CapitalSystem>,
    /// Highest id seeded or issued so far.
    last_gate_id: i64,
    last_temporary_id: i64,
}

/// Thread-safe in-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Seed a store. New ids continue after the highest seeded id, starting at 1.
    pub fn new(
        gates: Vec<Gate>,
        temporary: Vec<TemporaryConnection>,
        systems: impl IntoIterator<Item = CapitalSystem>,
    ) -> Self {
        let last_gate_id = gates.iter().map(|g| g.id).max().unwrap_or(0).max(0);
        let last_temporary_id = temporary.iter().map(|t| t.id).max().unwrap_or(0).max(0);
        let systems = systems.into_iter().map(|s| (s.id, s)).collect();

        Self {
            inner: RwLock::new(MemoryInner {
                gates,
                temporary,
                systems,
                last_gate_id,
                last_temporary_id,
            }),
        }
    }

    /// Temporary connections still active at `now`.
    pub fn active_temporary_connections_at(&self, now: DateTime<Utc>) -> Vec<TemporaryConnection> {
        self.read()
            .temporary
            .iter()
            .filter(|c| !c.is_expired(now))
            .cloned()
            .collect()
    }

    /// Drop every temporary connection that has expired at `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut inner = self.write();
        let before = inner.temporary.len();
        inner.temporary.retain(|c| !c.is_expired(now));
        let removed = before - inner.temporary.len();
        if removed > 0 {
            debug!(removed, "purged expired temporary connections");
        }
        removed
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn list_gates(&self) -> Result<Vec<Gate>> {
        Ok(self.read().gates.clone())
    }

    fn list_temporary_connections(&self) -> Result<Vec<TemporaryConnection>> {
        Ok(self.active_temporary_connections_at(Utc::now()))
    }

    fn list_systems(&self) -> Result<BTreeMap<SystemId, CapitalSystem>> {
        Ok(self.read().systems.clone())
    }

    fn create_gate(&self, mut gate: Gate) -> Result<i64> {
        let mut inner = self.write();
        let id = next_id(inner.last_gate_id, "gate")?;
        inner.last_gate_id = id;
        gate.id = id;
        inner.gates.push(gate);
        Ok(id)
    }

    fn update_gate(&self, gate: Gate) -> Result<()> {
        let mut inner = self.write();
        let slot = inner
            .gates
            .iter_mut()
            .find(|existing| existing.id == gate.id)
            .ok_or(Error::GateNotFound { id: gate.id })?;
        *slot = gate;
        Ok(())
    }

    fn delete_gate(&self, id: i64) -> Result<()> {
        let mut inner = self.write();
        let index = inner
            .gates
            .iter()
            .position(|gate| gate.id == id)
            .ok_or(Error::GateNotFound { id })?;
        inner.gates.remove(index);
        Ok(())
    }

    fn create_temporary_connection(&self, mut connection: TemporaryConnection) -> Result<i64> {
        let mut inner = self.write();
        let id = next_id(inner.last_temporary_id, "temporary connection")?;
        inner.last_temporary_id = id;
        connection.id = id;
        inner.temporary.push(connection);
        Ok(id)
    }

    fn update_temporary_connection(&self, connection: TemporaryConnection) -> Result<()> {
        let mut inner = self.write();
        let slot = inner
            .temporary
            .iter_mut()
            .find(|existing| existing.id == connection.id)
            .ok_or(Error::TemporaryConnectionNotFound { id: connection.id })?;
        *slot = connection;
        Ok(())
    }

    fn delete_temporary_connection(&self, id: i64) -> Result<()> {
        let mut inner = self.write();
        let index = inner
            .temporary
            .iter()
            .position(|connection| connection.id == id)
            .ok_or(Error::TemporaryConnectionNotFound { id })?;
        inner.temporary.remove(index);
        Ok(())
    }
}

fn next_id(last: i64, kind: &'static str) -> Result<i64> {
    last.checked_add(1).ok_or(Error::IdSpaceExhausted { kind })
}

/// JSON document listing gates and temporary connections.
///
/// ```json
/// {
///   "gates": [{ "id": 1, "name": "Alpha » Gamma - Bridge", "solar_system_id": 1 }],
///   "temporary": [{ "system1_id": 1, "system2_id": 3 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsFile {
    #[serde(default)]
    pub gates: Vec<Gate>,
    #[serde(default)]
    pub temporary: Vec<TemporaryConnection>,
}

impl ConnectionsFile {
    /// Read a connections document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path)?;
        let file: ConnectionsFile = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            gates = file.gates.len(),
            temporary = file.temporary.len(),
            "loaded connections file"
        );
        Ok(file)
    }

    /// Seed a [`MemoryStore`] with this document and the given capital catalog.
    pub fn into_store(self, systems: impl IntoIterator<Item = CapitalSystem>) -> MemoryStore {
        MemoryStore::new(self.gates, self.temporary, systems)
    }
}
