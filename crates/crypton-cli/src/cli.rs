//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed both random sources for a reproducible session
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Disable coloured terminal output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// The subcommand to run; interactive console when none is given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Console)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive console reading commands from stdin
    Console,
    /// Feed a script of commands, wait for staged output, print the result
    Replay {
        /// Script with one command per line; `#` starts a comment
        script: PathBuf,
        /// Extra virtual time to let the generator run after the script
        #[arg(long, default_value_t = 0)]
        settle_ms: u64,
        /// Print the final state as JSON instead of the terminal history
        #[arg(long)]
        json: bool,
    },
    /// Configuration helpers
    Config {
        /// Print an example configuration file
        #[arg(long)]
        example: bool,
    },
}
