//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// weekview - Your calendar week at a glance
#[derive(Debug, Parser)]
#[command(name = "weekview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "WEEKVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the week (default)
    Show(ShowArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of the `show` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ShowArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Any day of the week to show (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Timezone to show the week in (IANA or Windows name)
    #[arg(long, short)]
    pub timezone: Option<String>,

    /// Time-of-day pattern, e.g. "HH:mm" or "h:mm tt"
    #[arg(long)]
    pub time_format: Option<String>,

    /// Read events from a JSON file instead of Microsoft Graph
    #[arg(long, env = "WEEKVIEW_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand() {
        let cli = Cli::try_parse_from(["weekview"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn show_with_options() {
        let cli = Cli::try_parse_from([
            "weekview",
            "--debug",
            "show",
            "--json",
            "--date",
            "2025-08-13",
            "--timezone",
            "Pacific Standard Time",
            "--time-format",
            "h:mm tt",
        ])
        .unwrap();

        assert!(cli.debug);
        let Some(Command::Show(args)) = cli.command else {
            panic!("expected show command");
        };
        assert!(args.json);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 8, 13));
        assert_eq!(args.timezone.as_deref(), Some("Pacific Standard Time"));
        assert_eq!(args.time_format.as_deref(), Some("h:mm tt"));
    }

    #[test]
    fn rejects_bad_date() {
        let result = Cli::try_parse_from(["weekview", "show", "--date", "13/08/2025"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_actions() {
        let cli = Cli::try_parse_from(["weekview", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Validate
            })
        ));
    }
}
