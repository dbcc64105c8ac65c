use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::LaunchOptions;

#[derive(Parser)]
#[command(name = "statedeck")]
#[command(author, version, about)]
#[command(long_about = "A slide deck presenter with multi-state slides.\n\n\
    Slides can hold several content views; Space cycles them, arrows move\n\
    between slides, and the position is remembered between runs.\n\n\
    Examples:\n  \
    statedeck lecture.md              Present (fullscreen)\n  \
    statedeck lecture.md --windowed   Present in a window\n  \
    statedeck lecture.md --fresh      Start over from the first slide\n  \
    statedeck list lecture.md         Show slides and their states")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Ignore and clear saved progress
    #[arg(long, global = false)]
    pub fresh: bool,

    /// Where to keep the saved position (defaults to the data directory)
    #[arg(long, global = false)]
    pub state_file: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List slides, labels and state counts
    List {
        /// Deck file
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// State file to read the saved position from
        #[arg(long)]
        state_file: Option<PathBuf>,
    },

    /// Forget the saved position of a deck
    Reset {
        /// Deck file
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// State file to clear
        #[arg(long)]
        state_file: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Export every slide and state as PNG images
    Export {
        /// Deck file to export
        file: PathBuf,

        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. timing.autoplay_ms, timing.note_hide, input.swipe_threshold)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::List {
                file,
                json,
                state_file,
            }) => {
                ensure_exists(&file)?;
                crate::commands::list::run(&file, json, state_file)
            }
            Some(Commands::Reset {
                file,
                yes,
                state_file,
            }) => {
                ensure_exists(&file)?;
                crate::commands::reset::run(&file, yes, state_file, self.quiet)
            }
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Export {
                file,
                output_dir,
                width,
                height,
            }) => {
                ensure_exists(&file)?;
                crate::commands::export::run(file, output_dir, width, height)
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    ensure_exists(&file)?;
                    let options = LaunchOptions {
                        windowed: self.windowed,
                        slide: self.slide,
                        fresh: self.fresh,
                        state_file: self.state_file,
                    };
                    crate::app::run(file, options)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

fn ensure_exists(file: &std::path::Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_launch_flags() {
        let cli = Cli::try_parse_from([
            "statedeck",
            "talk.md",
            "--windowed",
            "--slide",
            "4",
            "--fresh",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("talk.md")));
        assert!(cli.windowed && cli.fresh);
        assert_eq!(cli.slide, Some(4));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_reset_subcommand() {
        let cli = Cli::try_parse_from(["statedeck", "reset", "talk.md", "--yes", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Reset { yes: true, .. })));
    }
}
