//! CLI argument definitions using clap
//!
//! Commands:
//! - crossview view --data <path> [overrides]
//! - crossview serve --data <path> [overrides]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// crossview - live cross-filtered views over in-memory records
#[derive(Parser, Debug)]
#[command(name = "crossview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a collection, print one view and exit
    View {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Load a collection, then apply JSON commands from stdin until EOF
    Serve {
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Options shared by every subcommand; flags override the config file
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// JSON array of records
    #[arg(long)]
    pub data: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// "ascending" or "descending"
    #[arg(long)]
    pub direction: Option<String>,

    /// Page size; 0 disables pagination
    #[arg(long)]
    pub per_page: Option<usize>,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    /// Minimum log severity: trace, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_with_overrides() {
        let cli = Cli::try_parse_from([
            "crossview",
            "view",
            "--data",
            "people.json",
            "--sort",
            "age",
            "--per-page",
            "2",
            "--page",
            "3",
        ])
        .unwrap();

        match cli.command {
            Command::View { view } => {
                assert_eq!(view.data, PathBuf::from("people.json"));
                assert_eq!(view.sort.as_deref(), Some("age"));
                assert_eq!(view.per_page, Some(2));
                assert_eq!(view.page, Some(3));
                assert!(view.config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_data_is_required() {
        assert!(Cli::try_parse_from(["crossview", "serve"]).is_err());
    }
}
