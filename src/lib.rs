//! phainspect library root.
//! Exposes the CLI parser, the REST router, the high-level run() function
//! and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Seed => commands::seed::handle(cfg),
        Commands::Inspection { action } => commands::inspection::handle(action, cfg),
        Commands::Area { action } => commands::area::handle(action, cfg),
        Commands::Response { action } => commands::response::handle(action, cfg),
        Commands::Pmi { action } => commands::pmi::handle(action, cfg),
        Commands::Image { action } => commands::image::handle(action, cfg),
        Commands::Signature { action } => commands::signature::handle(action, cfg),
        Commands::Dashboard { .. } => commands::dashboard::handle(&cli.command, cfg),
        Commands::Inspector { action } => commands::inspector::handle(action, cfg),
        Commands::Auth { action } => commands::auth::handle(action, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Serve { .. } => commands::serve::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // --db wins over the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
