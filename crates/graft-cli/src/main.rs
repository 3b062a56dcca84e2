//! Graft CLI: the `graft` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let config = support::load_config_or_exit(&cli.config);
    support::init_logging(&config);

    match cli.command {
        Commands::Join {
            left,
            right,
            strategy,
            json,
        } => {
            let strategy = strategy
                .as_deref()
                .map(support::parse_or_exit)
                .unwrap_or(config.merge.strategy);
            commands::join::run(left, right, strategy, json)
        }

        Commands::Meet { left, right, json } => commands::meet::run(left, right, json),

        Commands::Le { left, right, json } => commands::le::run(left, right, json),

        Commands::Graph { map, json } => commands::graph::run(map, json),

        Commands::Decode { graph, json } => commands::decode::run(graph, json),

        Commands::Colimit {
            maps,
            chain,
            search,
            eval,
            json,
        } => {
            let search = search
                .as_deref()
                .map(support::parse_or_exit)
                .unwrap_or(config.colimit.search);
            commands::colimit::run(commands::colimit::Args {
                maps,
                chain,
                search,
                eval,
                json,
            })
        }

        Commands::Extend { map, x, y, json } => commands::extend::run(map, x, y, json),

        Commands::Complete {
            map,
            eval,
            probe_depth,
            json,
        } => commands::complete::run(
            map,
            eval,
            probe_depth.unwrap_or(config.colimit.probe_depth),
            json,
        ),

        Commands::Check { case, json } => commands::check::run(case, json),
    }
}
