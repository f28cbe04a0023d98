//! Route command handler.

use anyhow::{Context, Result};
use tracing::info;

use everoute_lib::{ExclusionSet, RoutePlanner};

use crate::config::CliConfig;
use crate::output::{render_routes, OutputFormat};
use crate::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone, Default)]
pub struct RouteCommandArgs {
    pub from: String,
    pub to: String,
    /// Systems to leave out of the graph.
    pub avoid: Vec<String>,
    /// System pairs whose links are suppressed.
    pub remove: Vec<(String, String)>,
}

/// Parse a `--remove` value of the form `Origin:Destination`.
pub fn parse_removed_link(value: &str) -> Result<(String, String), String> {
    let (a, b) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ORIGIN:DESTINATION, got '{value}'"))?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return Err(format!("both systems are required in '{value}'"));
    }
    Ok((a.to_string(), b.to_string()))
}

/// Plan every minimal route and render them best first.
pub fn handle_route_command(
    config: &CliConfig,
    args: &RouteCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let universe = config.load_universe()?;
    let store = config.load_connections_store()?;
    let exclusions = ExclusionSet::resolve(&universe, &args.avoid, &args.remove)
        .context("failed to resolve exclusions")?;

    let planner = RoutePlanner::from_store(universe, &store, exclusions)?;
    info!(
        nodes = planner.graph().node_count(),
        edges = planner.graph().edge_count(),
        "route graph ready"
    );

    let routes = planner.find_required(&args.from, &args.to)?;
    render_routes(&args.from, &args.to, &routes, format, palette)
}
