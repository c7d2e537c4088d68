//! `bloodbank` - CLI and HTTP service for the blood bank desk.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use bloodbank::cli::{
    Cli, Command, ConfigCommand, DonateCommand, InventoryCommand, OutputFormat, Prompter,
    RequestCommand, StatusCommand,
};
use bloodbank::config::Backend;
use bloodbank::forms::{Form, FormState, SubmitOutcome};
use bloodbank::inventory::{inventory, InventoryFilter, InventoryItem};
use bloodbank::{init_logging, open_store, server, Config, Page, SqliteStore, SubmissionStore};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Only commands that talk to a store need a valid configuration.
    let config_path = cli.config;
    let load = || {
        Config::load_from(config_path.clone()).context("failed to load configuration")
    };

    match cli.command {
        Command::Serve(cmd) => {
            let config = load()?;
            let addr = match cmd.bind {
                Some(addr) => addr,
                None => config.bind_addr()?,
            };
            let store = open_store(&config)?;
            server::serve(addr, store).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Donate(cmd) => handle_donate(&load()?, &cmd).await,
        Command::Request(cmd) => handle_request(&load()?, &cmd).await,
        Command::Inventory(cmd) => handle_inventory(&cmd).map(|()| ExitCode::SUCCESS),
        Command::Pages => {
            handle_pages();
            Ok(ExitCode::SUCCESS)
        }
        Command::Status(cmd) => handle_status(&load()?, &cmd).map(|()| ExitCode::SUCCESS),
        Command::Config(cmd) => handle_config(config_path.clone(), cmd),
    }
}

async fn handle_donate(config: &Config, cmd: &DonateCommand) -> anyhow::Result<ExitCode> {
    let store = open_store(config)?;
    let state = FormState::from_values(cmd.to_form());
    submit(state, store.as_ref(), cmd.interactive).await
}

async fn handle_request(config: &Config, cmd: &RequestCommand) -> anyhow::Result<ExitCode> {
    let store = open_store(config)?;
    let state = FormState::from_values(cmd.to_form());
    submit(state, store.as_ref(), cmd.interactive).await
}

async fn submit<F: Form>(
    mut state: FormState<F>,
    store: &dyn SubmissionStore,
    interactive: bool,
) -> anyhow::Result<ExitCode> {
    let outcome = if interactive {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        prompter.run(&mut state, store).await?
    } else {
        state.submit(store).await
    };

    match outcome {
        SubmitOutcome::Submitted(notice) => {
            println!("{}: {}", notice.title, notice.description);
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Rejected(violations) => {
            eprintln!("Please correct the following:");
            for violation in &violations {
                eprintln!("  {}: {}", violation.field, violation.message);
            }
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Failed(notice) => {
            eprintln!("{}: {}", notice.title, notice.description);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_inventory(cmd: &InventoryCommand) -> anyhow::Result<()> {
    let filter = InventoryFilter::from_input(
        cmd.blood_type.as_deref(),
        cmd.status.as_deref(),
        cmd.search.as_deref(),
    )?;
    let items = filter.apply(&inventory());

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Plain => {
            for item in &items {
                println!(
                    "{} {} {} units, {} stock, {} (updated {}, expires {})",
                    item.id,
                    item.blood_type,
                    item.quantity,
                    item.status,
                    item.location,
                    item.last_updated,
                    item.expiry_date
                );
            }
        }
        OutputFormat::Table => print_inventory_table(&items),
    }

    if items.is_empty() && cmd.format != OutputFormat::Json {
        println!("No inventory items match your filters");
    }
    Ok(())
}

fn print_inventory_table(items: &[InventoryItem]) {
    println!(
        "{:<8} {:<6} {:>8} {:<8} {:<12} {:<12} {}",
        "ID", "Type", "Units", "Status", "Updated", "Expires", "Location"
    );
    println!("{}", "-".repeat(74));
    for item in items {
        println!(
            "{:<8} {:<6} {:>8} {:<8} {:<12} {:<12} {}",
            item.id,
            item.blood_type.label(),
            item.quantity,
            item.status.label(),
            item.last_updated.to_string(),
            item.expiry_date.to_string(),
            item.location
        );
    }
}

fn handle_pages() {
    for page in Page::NAVIGABLE {
        println!("{:<12} {}", page.path().unwrap_or_default(), page.title());
    }
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let stats = match config.storage.backend {
        Backend::Sqlite => Some(SqliteStore::open(config.database_path())?.stats()?),
        Backend::Rest => None,
    };

    if cmd.json {
        let status = serde_json::json!({
            "backend": config.storage.backend,
            "database_path": config.database_path(),
            "rest_url": config.rest.url,
            "donors": stats.as_ref().map(|s| s.donors),
            "blood_requests": stats.as_ref().map(|s| s.blood_requests),
            "latest_submission": stats.as_ref().and_then(|s| s.latest_submission),
            "db_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("bloodbank status");
    println!("----------------");
    println!("Backend:        {}", config.storage.backend);
    match stats {
        Some(stats) => {
            println!("Database:       {}", config.database_path().display());
            println!("Donors:         {}", stats.donors);
            println!("Requests:       {}", stats.blood_requests);
            match stats.latest_submission {
                Some(at) => println!("Latest:         {}", at.to_rfc3339()),
                None => println!("Latest:         never"),
            }
            println!("Size:           {} bytes", stats.db_size_bytes);
        }
        None => println!("Data API:       {}", config.rest.url),
    }
    Ok(())
}

fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if !shown.rest.api_key.is_empty() {
        shown.rest.api_key = "<redacted>".to_string();
    }
    shown
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_unchecked(config_path)
                .context("failed to load configuration")?;
            if let Err(e) = config.validate() {
                eprintln!("Warning: {e}");
            }
            let config = redacted(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:        {}", config.storage.backend);
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Rest]");
                println!("  URL:            {}", config.rest.url);
                println!("  API key:        {}", config.rest.api_key);
                println!("  Timeout (s):    {}", config.rest.timeout_secs);
                println!();
                println!("[Server]");
                println!("  Bind:           {}", config.server.bind);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            if let Err(e) = Config::load_from(Some(path)) {
                println!("Configuration error: {e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration is valid.");
        }
    }
    Ok(ExitCode::SUCCESS)
}
