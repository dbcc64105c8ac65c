mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod engine;
mod input;
mod logging;
mod render;
mod session;
mod theme;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::Cli;

fn main() {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
