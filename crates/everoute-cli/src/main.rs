use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use everoute_cli::commands::capital::{handle_capital_command, CapitalCommandArgs};
use everoute_cli::commands::jumps::handle_jumps_command;
use everoute_cli::commands::route::{handle_route_command, parse_removed_link, RouteCommandArgs};
use everoute_cli::config::{CliConfig, CliOverrides};
use everoute_cli::logging::{init_logging, LoggingConfig};
use everoute_cli::output::OutputFormat;
use everoute_cli::terminal::ColorPalette;

#[derive(Parser, Debug)]
#[command(author, version, about = "Universe route and capital jump planner")]
struct Cli {
    /// SQLite universe dataset (env: EVEROUTE_DATASET). Defaults to the demo universe.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// JSON file with jump bridges and temporary links (env: EVEROUTE_CONNECTIONS).
    #[arg(long, global = true)]
    connections: Option<PathBuf>,

    /// JSON capital system catalog (env: EVEROUTE_CAPITAL_SYSTEMS).
    #[arg(long, global = true)]
    capital_systems: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every shortest route between two systems, best first.
    Route {
        /// Starting system name.
        #[arg(long = "from")]
        from: String,
        /// Destination system name.
        #[arg(long = "to")]
        to: String,
        /// System to avoid (repeatable).
        #[arg(long = "avoid")]
        avoid: Vec<String>,
        /// Link to ignore, as ORIGIN:DESTINATION (repeatable).
        #[arg(long = "remove", value_parser = parse_removed_link)]
        remove: Vec<(String, String)>,
    },
    /// Plan a capital route using straight-line jump range.
    Capital {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
        /// Jump range in light-years (env: EVEROUTE_JUMP_RANGE, default 5).
        #[arg(long)]
        range: Option<f64>,
        /// Use a KD-tree for neighbour lookups.
        #[arg(long)]
        indexed: bool,
    },
    /// Count stargate jumps between two systems.
    Jumps {
        #[arg(long = "from")]
        from: String,
        #[arg(long = "to")]
        to: String,
    },
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::from_env());
    let cli = Cli::parse();

    let config = CliConfig::resolve(CliOverrides {
        dataset: cli.dataset,
        connections: cli.connections,
        capital_systems: cli.capital_systems,
    })?;
    let palette = if cli.no_color {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };

    let output = match cli.command {
        Command::Route {
            from,
            to,
            avoid,
            remove,
        } => handle_route_command(
            &config,
            &RouteCommandArgs {
                from,
                to,
                avoid,
                remove,
            },
            cli.format,
            &palette,
        )?,
        Command::Capital {
            from,
            to,
            range,
            indexed,
        } => handle_capital_command(
            &config,
            &CapitalCommandArgs {
                from,
                to,
                range,
                indexed,
            },
            cli.format,
            &palette,
        )?,
        Command::Jumps { from, to } => handle_jumps_command(&config, &from, &to, cli.format)?,
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
