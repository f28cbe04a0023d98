//! Rendering of command results as text or JSON.
//!
//! Renderers return a `String` so they can be tested without capturing stdout.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use everoute_lib::{distance_ly, CapitalRoute, CapitalSystem, EdgeKind, Route, Waypoint};

use crate::terminal::ColorPalette;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Serialize)]
struct RoutesDocument<'a> {
    from: &'a str,
    to: &'a str,
    routes: &'a [Route],
}

#[derive(Serialize)]
struct CapitalDocument<'a> {
    from: &'a str,
    to: &'a str,
    jump_range: f64,
    hops: usize,
    distance_ly: f64,
    systems: &'a [CapitalSystem],
}

#[derive(Serialize)]
struct JumpsDocument<'a> {
    from: &'a str,
    to: &'a str,
    jumps: usize,
}

pub fn render_routes(
    from: &str,
    to: &str,
    routes: &[Route],
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&RoutesDocument {
            from,
            to,
            routes,
        })?),
        OutputFormat::Text => Ok(routes_text(routes, palette)),
    }
}

fn routes_text(routes: &[Route], palette: &ColorPalette) -> String {
    let mut out = String::new();
    for (index, route) in routes.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "Route {} of {}: {} {} ({} via jump bridge, {} via temporary link)",
            index + 1,
            routes.len(),
            route.hop_count(),
            plural(route.hop_count(), "jump", "jumps"),
            route.ansiblex_count(),
            route.temporary_count(),
        );
        for waypoint in &route.waypoints {
            out.push_str(&waypoint_line(waypoint, palette));
            out.push('\n');
        }
    }
    out
}

fn waypoint_line(waypoint: &Waypoint, palette: &ColorPalette) -> String {
    let (tag, tag_color) = match waypoint.connection_type {
        None => ("STRT", palette.tag_start),
        Some(EdgeKind::Stargate) => ("GATE", palette.tag_stargate),
        Some(EdgeKind::Ansiblex) => ("BRDG", palette.tag_bridge),
        Some(EdgeKind::Temporary) => ("TEMP", palette.tag_temporary),
    };

    let mut line = format!(
        "  {tag_color}{tag}{reset} {bold}{name}{reset} {sec_color}{security:.1}{reset}",
        reset = palette.reset,
        bold = palette.white_bold,
        name = waypoint.system_name,
        sec_color = palette.security(waypoint.system_security),
        security = waypoint.system_security,
    );
    if !waypoint.region_name.is_empty() {
        let _ = write!(line, " {}{}{}", palette.gray, waypoint.region_name, palette.reset);
    }
    if waypoint.wormhole {
        line.push_str(" [wormhole]");
    }
    if let Some(gate) = &waypoint.gate_name {
        let _ = write!(line, " via {gate}");
    }
    line
}

pub fn render_capital(
    from: &str,
    to: &str,
    jump_range: f64,
    route: &CapitalRoute,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&CapitalDocument {
            from,
            to,
            jump_range,
            hops: route.hop_count(),
            distance_ly: route.distance_ly(),
            systems: &route.systems,
        })?),
        OutputFormat::Text => {
            let mut out = format!(
                "Capital route {from} -> {to} (range {jump_range:.2} ly): {} {}, {:.2} ly\n",
                route.hop_count(),
                plural(route.hop_count(), "jump", "jumps"),
                route.distance_ly(),
            );
            let mut previous: Option<&CapitalSystem> = None;
            for system in &route.systems {
                match previous {
                    None => {
                        let _ = writeln!(
                            out,
                            "  {}STRT{} {}{}{}",
                            palette.tag_start,
                            palette.reset,
                            palette.white_bold,
                            system.name,
                            palette.reset
                        );
                    }
                    Some(prev) => {
                        let _ = writeln!(
                            out,
                            "  {}JUMP{} {}{}{} {}({:.2} ly){}",
                            palette.tag_bridge,
                            palette.reset,
                            palette.white_bold,
                            system.name,
                            palette.reset,
                            palette.gray,
                            distance_ly(prev, system),
                            palette.reset
                        );
                    }
                }
                previous = Some(system);
            }
            Ok(out)
        }
    }
}

pub fn render_jumps(from: &str, to: &str, jumps: usize, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JumpsDocument { from, to, jumps })?),
        OutputFormat::Text => Ok(format!(
            "{from} -> {to}: {jumps} {}\n",
            plural(jumps, "jump", "jumps")
        )),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
