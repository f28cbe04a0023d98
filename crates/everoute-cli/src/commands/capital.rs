//! Capital jump command handler.

use anyhow::Result;

use everoute_lib::{CapitalPlanner, Store};

use crate::config::CliConfig;
use crate::output::{render_capital, OutputFormat};
use crate::terminal::ColorPalette;

#[derive(Debug, Clone, Default)]
pub struct CapitalCommandArgs {
    pub from: String,
    pub to: String,
    /// Jump range in light-years; falls back to the configured default.
    pub range: Option<f64>,
    /// Use the KD-tree neighbour index instead of a linear scan.
    pub indexed: bool,
}

pub fn handle_capital_command(
    config: &CliConfig,
    args: &CapitalCommandArgs,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    let universe = config.load_universe()?;
    let store = config.load_capital_store(&universe)?;
    let jump_range = args.range.unwrap_or(config.jump_range);

    let mut planner = CapitalPlanner::new(store.list_systems()?.into_values(), jump_range)?;
    if args.indexed {
        planner = planner.with_spatial_index();
    }

    let route = planner.plan(&args.from, &args.to)?;
    render_capital(&args.from, &args.to, jump_range, &route, format, palette)
}
