//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;
pub mod formatters;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "skilllink",
    version,
    about = "Find students by skill, institute, branch and year"
)]
pub struct Cli {
    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable logging entirely
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the global one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["skilllink", "search", "ali", "--robot", "-vv"]).unwrap();
        assert!(cli.robot);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Search(_)));
    }
}
