//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use ifood_core::config;

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "ifood")]
#[command(version = "0.1")]
#[command(about = "Browse iFood addresses, home feed and merchants")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in with a one-time code sent to your email
    Login,
    /// Log out (remove saved credentials)
    Logout,
    /// Exchange the saved refresh token for a new pair
    Refresh,
    /// List saved delivery addresses
    Addresses,
    /// Pick an address, a home feed list, and see its merchants
    Browse,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // default to the browse flow
    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
        Commands::Login => commands::auth::login(&load_config()?).await,
        Commands::Logout => commands::auth::logout(),
        Commands::Refresh => commands::auth::refresh(&load_config()?).await,
        Commands::Addresses => commands::browse::addresses(&load_config()?).await,
        Commands::Browse => commands::browse::run(&load_config()?).await,
    }
}

fn load_config() -> Result<config::Config> {
    config::Config::load().context("load config")
}
