//! Command line definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "AI risk assessment scoring", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration directory (overrides the configured base path)
    #[arg(short, long, global = true)]
    pub repository: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score an answer file
    Evaluate {
        /// YAML or JSON map of question id to answer
        #[arg(short, long)]
        answers: PathBuf,

        /// Include informational diagnostics
        #[arg(long)]
        trace: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the configuration and list its issues
    Validate,

    /// List categories and questions
    List,

    /// Reload the configuration whenever it changes, until interrupted
    Watch {
        /// Polling interval in seconds
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::parse_from([
            "aira",
            "--repository",
            "config",
            "evaluate",
            "--answers",
            "answers.yaml",
            "--json",
        ]);

        assert_eq!(cli.repository, Some(PathBuf::from("config")));
        match cli.command {
            Commands::Evaluate {
                answers,
                trace,
                json,
            } => {
                assert_eq!(answers, PathBuf::from("answers.yaml"));
                assert!(!trace);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_repository_is_global() {
        let cli = Cli::parse_from(["aira", "watch", "-i", "5", "--repository", "elsewhere"]);

        assert_eq!(cli.repository, Some(PathBuf::from("elsewhere")));
        assert!(matches!(cli.command, Commands::Watch { interval: Some(5) }));
    }

    #[test]
    fn test_watch_rejects_zero_interval() {
        let err = Cli::try_parse_from(["aira", "watch", "--interval", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
