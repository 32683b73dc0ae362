//! Taskboard server
//!
//! A REST backend for tasks that reference each other as subtasks, backed by
//! a single JSON file.

use anyhow::{Result, bail};
use clap::Parser;
use taskboard::api::{ApiState, start_server};
use taskboard::cli::check::{CheckArgs, run_check};
use taskboard::cli::show::run_show;
use taskboard::cli::{Cli, Command};
use taskboard::config::{Config, ConfigLoader, ConfigPaths};
use taskboard::db::Database;
use taskboard::format::OutputFormat;
use taskboard::logging::{self, LogTarget};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    // Load configuration with tier merging; --config replaces the file tiers
    let mut paths = ConfigPaths::discover();
    if let Some(config_path) = &cli.config {
        paths = paths.with_explicit_file(config_path);
    }
    let mut loader = ConfigLoader::load_with_paths(paths)?;
    for (tier, path) in loader.sources() {
        debug!("Loaded {} config from {}", tier, path.display());
    }

    // Override from CLI arguments
    let config = loader.config_mut();
    if let Some(store) = &cli.store {
        config.server.store_path = store.into();
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = loader.into_config();

    let db = Database::open(&config.server.store_path)?;

    match cli.command {
        Some(Command::Check(args)) => run_check_command(&db, &args)?,
        Some(Command::Show(args)) => println!("{}", run_show(&db, &args)?),
        Some(Command::Serve) | None => run_server(config, db).await?,
    }

    Ok(())
}

fn run_check_command(db: &Database, args: &CheckArgs) -> Result<()> {
    let Some(format) = OutputFormat::from_str(&args.format) else {
        bail!("Unknown format '{}', expected markdown or json", args.format);
    };

    let report = run_check(db)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Markdown => print!("{}", report.to_markdown()),
    }

    if args.strict && !report.is_clean() {
        bail!("{} problem(s) found in {}", report.problem_count(), db.location());
    }
    Ok(())
}

async fn run_server(config: Config, db: Database) -> Result<()> {
    info!("Using task store {}", db.location());

    let addr = config.server.socket_addr()?;
    let state = ApiState::new(db, config.pagination);
    let handle = start_server(state, addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");
    handle.shutdown().await;

    Ok(())
}
