//! Command-line interface for the `bloodbank` binary.

mod commands;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, DonateCommand, InventoryCommand, OutputFormat, RequestCommand, ServeCommand,
    StatusCommand, UrgencyArg,
};
pub use prompt::Prompter;

/// bloodbank - Blood donation and request desk
///
/// Register donors, file blood requests, browse stock, or serve the same
/// pages over HTTP.
#[derive(Debug, Parser)]
#[command(name = "bloodbank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the pages and form endpoints over HTTP
    Serve(ServeCommand),

    /// Register as a blood donor
    Donate(DonateCommand),

    /// Request blood for a patient
    Request(RequestCommand),

    /// Browse the blood inventory
    Inventory(InventoryCommand),

    /// List the navigable pages
    Pages,

    /// Show storage status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Verbosity selected by `-q` and `-v`.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "bloodbank");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["bloodbank", "-q", "pages"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["bloodbank", "pages"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["bloodbank", "-v", "pages"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["bloodbank", "-vv", "pages"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_serve_bind() {
        let cli = parse(&["bloodbank", "serve", "--bind", "0.0.0.0:9000"]);
        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(cmd.bind, Some("0.0.0.0:9000".parse().unwrap()));
    }

    #[test]
    fn test_parse_donate_flags() {
        let cli = parse(&[
            "bloodbank",
            "donate",
            "--full-name",
            "Ada Obi",
            "--age",
            "30",
            "--blood-type",
            "O-",
        ]);
        let Command::Donate(cmd) = cli.command else {
            panic!("expected donate");
        };
        assert_eq!(cmd.full_name.as_deref(), Some("Ada Obi"));
        assert_eq!(cmd.blood_type.as_deref(), Some("O-"));
        assert!(!cmd.interactive);
    }

    #[test]
    fn test_parse_request_urgency() {
        let cli = parse(&["bloodbank", "request", "--urgency", "critical", "-i"]);
        let Command::Request(cmd) = cli.command else {
            panic!("expected request");
        };
        assert_eq!(cmd.urgency, Some(UrgencyArg::Critical));
        assert!(cmd.interactive);
    }

    #[test]
    fn test_parse_inventory_filters() {
        let cli = parse(&[
            "bloodbank",
            "inventory",
            "--blood-type",
            "O-",
            "--status",
            "low",
            "--format",
            "json",
        ]);
        let Command::Inventory(cmd) = cli.command else {
            panic!("expected inventory");
        };
        assert_eq!(cmd.status.as_deref(), Some("low"));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["bloodbank", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["bloodbank", "config", "validate", "--file", "x.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }
}
