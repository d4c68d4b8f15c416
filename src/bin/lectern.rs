//! Lectern CLI Binary
//!
//! Command-line interface for collecting books and signs from world data.

use anyhow::Context;
use clap::Parser;
use lectern::config::ConfigLoader;
use lectern::logging::init_logging;
use lectern::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;
    let logging = cli.logging_config(&config.logging);
    init_logging(Some(&logging)).context("initializing logging")?;

    let context = CliContext::from_config(config, cli.store.clone())?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
