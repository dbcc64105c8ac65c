pub mod completion;
pub mod config;
pub mod export;
pub mod list;
pub mod reset;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "statedeck".bold(),
        env!("CARGO_PKG_VERSION").cyan()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION").dimmed());
}
