//! Jump count command handler.

use anyhow::Result;

use everoute_lib::JumpCalculator;

use crate::config::CliConfig;
use crate::output::{render_jumps, OutputFormat};

pub fn handle_jumps_command(
    config: &CliConfig,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<String> {
    let calculator = JumpCalculator::new(config.load_universe()?);
    let jumps = calculator.between(from, to)?;
    render_jumps(from, to, jumps, format)
}
