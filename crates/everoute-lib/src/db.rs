use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use rusqlite::{Connection, Row};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::universe::{RegionId, System, SystemId, SystemPosition, UniverseGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaVariant {
    StaticData,
    LegacyMap,
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SchemaVariant::StaticData => "static_data",
            SchemaVariant::LegacyMap => "legacy_map",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionTable {
    table: &'static str,
    id_column: &'static str,
    name_column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PositionColumns {
    x: &'static str,
    y: &'static str,
    z: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SchemaDefinition {
    variant: SchemaVariant,
    systems_table: &'static str,
    system_id_column: &'static str,
    system_name_column: &'static str,
    jumps_table: &'static str,
    jump_from_column: &'static str,
    jump_to_column: &'static str,
    region_column: Option<&'static str>,
    region_table: Option<RegionTable>,
    security_column: Option<&'static str>,
    position_columns: Option<PositionColumns>,
}

const POSITION_CANDIDATES: [PositionColumns; 2] = [
    PositionColumns {
        x: "centerX",
        y: "centerY",
        z: "centerZ",
    },
    PositionColumns {
        x: "x",
        y: "y",
        z: "z",
    },
];

impl SchemaVariant {
    fn definition(self) -> SchemaDefinition {
        match self {
            SchemaVariant::StaticData => SchemaDefinition {
                variant: SchemaVariant::StaticData,
                systems_table: "SolarSystems",
                system_id_column: "solarSystemId",
                system_name_column: "name",
                jumps_table: "Jumps",
                jump_from_column: "fromSystemId",
                jump_to_column: "toSystemId",
                region_column: Some("regionID"),
                region_table: Some(RegionTable {
                    table: "Regions",
                    id_column: "regionID",
                    name_column: "regionName",
                }),
                security_column: Some("security"),
                position_columns: None,
            },
            SchemaVariant::LegacyMap => SchemaDefinition {
                variant: SchemaVariant::LegacyMap,
                systems_table: "mapSolarSystems",
                system_id_column: "solarSystemID",
                system_name_column: "solarSystemName",
                jumps_table: "mapSolarSystemJumps",
                jump_from_column: "fromSolarSystemID",
                jump_to_column: "toSolarSystemID",
                region_column: Some("regionID"),
                region_table: Some(RegionTable {
                    table: "mapRegions",
                    id_column: "regionID",
                    name_column: "regionName",
                }),
                security_column: Some("security"),
                position_columns: None,
            },
        }
    }
}

/// Load systems, stargate links, and region names from a SQLite dataset.
///
/// The loader performs runtime schema detection so both the
/// `SolarSystems`/`Jumps` layout and the legacy
/// `mapSolarSystems`/`mapSolarSystemJumps` layout are supported. Region,
/// security, and coordinate columns are optional; systems without them get a
/// region id of `0`, a security of `0.0`, and no position. Links referencing
/// unknown systems are dropped.
pub fn load_universe(db_path: &Path) -> Result<UniverseGraph> {
    if !db_path.exists() {
        return Err(Error::DatasetNotFound {
            path: db_path.to_path_buf(),
        });
    }

    let connection = Connection::open(db_path)?;
    let schema = detect_schema(&connection)?;
    debug!(schema = %schema.variant, path = %db_path.display(), "loading universe");

    let systems = load_systems(&connection, &schema)?;
    let links = load_links(&connection, &schema, &systems)?;
    let regions = load_regions(&connection, &schema)?;

    debug!(
        systems = systems.len(),
        links = links.len(),
        regions = regions.len(),
        "loaded universe"
    );

    Ok(UniverseGraph::new(systems.into_values(), links, regions))
}

fn detect_schema(connection: &Connection) -> Result<SchemaDefinition> {
    for variant in [SchemaVariant::StaticData, SchemaVariant::LegacyMap] {
        if let Some(schema) = refine_schema(connection, variant.definition())? {
            return Ok(schema);
        }
    }

    Err(Error::UnsupportedSchema)
}

/// Confirm the mandatory tables exist and drop optional columns that do not.
fn refine_schema(
    connection: &Connection,
    mut schema: SchemaDefinition,
) -> Result<Option<SchemaDefinition>> {
    if !table_exists(connection, schema.systems_table)?
        || !table_exists(connection, schema.jumps_table)?
    {
        return Ok(None);
    }

    if !table_has_columns(
        connection,
        schema.systems_table,
        &[schema.system_id_column, schema.system_name_column],
    )? {
        return Ok(None);
    }

    if !table_has_columns(
        connection,
        schema.jumps_table,
        &[schema.jump_from_column, schema.jump_to_column],
    )? {
        return Ok(None);
    }

    if let Some(column) = schema.region_column {
        if !table_has_columns(connection, schema.systems_table, &[column])? {
            schema.region_column = None;
        }
    }

    if let Some(table) = schema.region_table {
        if !table_exists(connection, table.table)?
            || !table_has_columns(connection, table.table, &[table.id_column, table.name_column])?
        {
            schema.region_table = None;
        }
    }

    if let Some(column) = schema.security_column {
        if !table_has_columns(connection, schema.systems_table, &[column])? {
            schema.security_column = None;
        }
    }

    for columns in POSITION_CANDIDATES {
        if table_has_columns(
            connection,
            schema.systems_table,
            &[columns.x, columns.y, columns.z],
        )? {
            schema.position_columns = Some(columns);
            break;
        }
    }

    Ok(Some(schema))
}

fn load_systems(
    connection: &Connection,
    schema: &SchemaDefinition,
) -> Result<HashMap<SystemId, System>> {
    let mut selects = vec![
        format!("{id} AS system_id", id = schema.system_id_column),
        format!("{name} AS system_name", name = schema.system_name_column),
    ];

    match schema.region_column {
        Some(column) => selects.push(format!("{column} AS region_id")),
        None => selects.push("NULL AS region_id".to_string()),
    }

    match schema.security_column {
        Some(column) => selects.push(format!("{column} AS security_status")),
        None => selects.push("NULL AS security_status".to_string()),
    }

    if let Some(columns) = schema.position_columns {
        selects.push(format!("{x} AS position_x", x = columns.x));
        selects.push(format!("{y} AS position_y", y = columns.y));
        selects.push(format!("{z} AS position_z", z = columns.z));
    } else {
        selects.push("NULL AS position_x".to_string());
        selects.push("NULL AS position_y".to_string());
        selects.push("NULL AS position_z".to_string());
    }

    let sql = format!(
        "SELECT {selects} FROM {table}",
        selects = selects.join(", "),
        table = schema.systems_table
    );

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_system)?;

    let mut systems = HashMap::new();
    for entry in rows {
        let system = entry?;
        systems.insert(system.id, system);
    }
    Ok(systems)
}

/// Load stargate links as unordered pairs in table order.
fn load_links(
    connection: &Connection,
    schema: &SchemaDefinition,
    systems: &HashMap<SystemId, System>,
) -> Result<Vec<(SystemId, SystemId)>> {
    let sql = format!(
        "SELECT {from}, {to} FROM {table} ORDER BY rowid",
        from = schema.jump_from_column,
        to = schema.jump_to_column,
        table = schema.jumps_table
    );

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped_edges = 0usize;
    for row in rows {
        let (from, to): (SystemId, SystemId) = row?;
        if !systems.contains_key(&from) || !systems.contains_key(&to) {
            skipped_edges += 1;
            continue;
        }
        if seen.insert((from.min(to), from.max(to))) {
            links.push((from, to));
        }
    }

    if skipped_edges > 0 {
        warn!(
            skipped_edges,
            "ignored jump edges referencing unknown systems",
        );
    }

    Ok(links)
}

fn load_regions(
    connection: &Connection,
    schema: &SchemaDefinition,
) -> Result<HashMap<RegionId, String>> {
    let Some(table) = schema.region_table else {
        return Ok(HashMap::new());
    };

    let sql = format!(
        "SELECT {id}, {name} FROM {table}",
        id = table.id_column,
        name = table.name_column,
        table = table.table
    );
    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut regions = HashMap::new();
    for row in rows {
        let (id, name): (RegionId, String) = row?;
        regions.insert(id, name);
    }
    Ok(regions)
}

fn row_to_system(row: &Row<'_>) -> rusqlite::Result<System> {
    let position = match (
        row.get::<_, Option<f64>>(4)?,
        row.get::<_, Option<f64>>(5)?,
        row.get::<_, Option<f64>>(6)?,
    ) {
        (Some(x), Some(y), Some(z)) => Some(SystemPosition { x, y, z }),
        _ => None,
    };

    Ok(System {
        id: row.get(0)?,
        name: row.get(1)?,
        region_id: row.get::<_, Option<RegionId>>(2)?.unwrap_or(0),
        security: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        position,
    })
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
