//! Shared fixtures for integration tests.
//!
//! Universes are built in memory; SQLite datasets are written to temporary
//! files so no checked-in binary fixtures are needed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use everoute_lib::{Gate, System, SystemId, SystemPosition, TemporaryConnection, UniverseGraph};
use rusqlite::Connection;

/// Build a universe from `(id, name)` pairs and static links, all in region 1.
pub fn universe(systems: &[(SystemId, &str)], links: &[(SystemId, SystemId)]) -> UniverseGraph {
    UniverseGraph::new(
        systems.iter().map(|&(id, name)| System {
            id,
            name: name.to_string(),
            security: 0.5,
            region_id: 1,
            position: None,
        }),
        links.iter().copied(),
        HashMap::from([(1, "Test Region".to_string())]),
    )
}

/// `width` x `height` grid of systems named `S<row>-<col>`, linked to right and down neighbours.
pub fn grid_universe(width: i64, height: i64) -> UniverseGraph {
    let id = |row: i64, col: i64| 1_000 + row * width + col;
    let mut systems = Vec::new();
    let mut links = Vec::new();
    for row in 0..height {
        for col in 0..width {
            systems.push(System {
                id: id(row, col),
                name: format!("S{row}-{col}"),
                security: 0.1 * (col % 10) as f64,
                region_id: 1 + row % 3,
                position: Some(SystemPosition {
                    x: col as f64,
                    y: row as f64,
                    z: 0.0,
                }),
            });
            if col + 1 < width {
                links.push((id(row, col), id(row, col + 1)));
            }
            if row + 1 < height {
                links.push((id(row, col), id(row + 1, col)));
            }
        }
    }
    UniverseGraph::new(
        systems,
        links,
        HashMap::from([
            (1, "North".to_string()),
            (2, "Middle".to_string()),
            (3, "South".to_string()),
        ]),
    )
}

pub fn gate(id: i64, name: &str, origin: SystemId) -> Gate {
    Gate {
        id,
        name: name.to_string(),
        solar_system_id: origin,
        region_id: None,
    }
}

pub fn temporary(id: i64, a: SystemId, b: SystemId) -> TemporaryConnection {
    TemporaryConnection {
        id,
        system1_id: a,
        system2_id: b,
        expires_at: None,
    }
}

/// Write a `SolarSystems`/`Jumps`/`Regions` dataset to `path`.
pub fn write_static_dataset(path: &Path) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        r#"
        CREATE TABLE Regions (
            regionID INTEGER PRIMARY KEY,
            regionName TEXT NOT NULL
        );
        CREATE TABLE SolarSystems (
            solarSystemId INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            regionID INTEGER,
            security REAL,
            centerX REAL,
            centerY REAL,
            centerZ REAL
        );
        CREATE TABLE Jumps (
            fromSystemId INTEGER NOT NULL,
            toSystemId INTEGER NOT NULL
        );
        INSERT INTO Regions VALUES (10, 'Heimatar'), (20, 'Metropolis');
        INSERT INTO SolarSystems VALUES
            (30000001, 'Rens', 10, 0.9, 0.0, 0.0, 0.0),
            (30000002, 'Frarn', 10, 0.7, 9.4607e15, 0.0, 0.0),
            (30000003, 'Hek', 20, 0.5, 1.89214e16, 0.0, 0.0),
            (31000005, 'J100001', 20, -1.0, NULL, NULL, NULL);
        INSERT INTO Jumps VALUES
            (30000001, 30000002),
            (30000002, 30000001),
            (30000002, 30000003),
            (30000003, 99999999);
        "#,
    )
}

/// Write a `mapSolarSystems`/`mapSolarSystemJumps` dataset without optional columns.
pub fn write_legacy_dataset(path: &Path) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        r#"
        CREATE TABLE mapSolarSystems (
            solarSystemID INTEGER PRIMARY KEY,
            solarSystemName TEXT NOT NULL
        );
        CREATE TABLE mapSolarSystemJumps (
            fromSolarSystemID INTEGER NOT NULL,
            toSolarSystemID INTEGER NOT NULL
        );
        INSERT INTO mapSolarSystems VALUES (1, 'Alpha'), (2, 'Beta'), (3, 'Gamma');
        INSERT INTO mapSolarSystemJumps VALUES (1, 2), (2, 3);
        "#,
    )
}
