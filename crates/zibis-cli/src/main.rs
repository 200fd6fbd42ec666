mod catalog;
mod estimate;
mod pricing;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zibis_store::ZibisStore;

use crate::catalog::CatalogCommands;
use crate::pricing::PricingCommands;
use crate::settings::SettingsCommands;

#[derive(Debug, Parser)]
#[command(name = "zibis-cli")]
#[command(about = "Zibis estimate configurator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the pricing record
    Pricing {
        #[command(subcommand)]
        command: PricingCommands,
    },
    /// Inspect and edit catalog items
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Compute an estimate for a selection file against the live store
    Estimate {
        /// JSON selection file (`activation`, `quantities`, `switchCounts`, ...)
        #[arg(long)]
        selection: PathBuf,
        /// Print the dealer tier next to retail
        #[arg(long)]
        dealer: bool,
    },
    /// Back up or restore pricing and catalog
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("zibis-cli ready; run with --help for commands");
        return Ok(());
    };

    // Offline command: validates a local file without touching the store.
    if let Commands::Pricing {
        command: PricingCommands::Check { file },
    } = &command
    {
        return pricing::run_pricing_check(file);
    }

    let store = connect_store()?;
    match command {
        Commands::Pricing { command } => match command {
            PricingCommands::Show => pricing::run_pricing_show(&store).await,
            PricingCommands::Set { edits } => pricing::run_pricing_set(&store, &edits).await,
            PricingCommands::Check { .. } => Ok(()),
        },
        Commands::Catalog { command } => catalog::run(&store, command).await,
        Commands::Estimate { selection, dealer } => {
            estimate::run_estimate(&store, &selection, dealer).await
        }
        Commands::Settings { command } => match command {
            SettingsCommands::Export { output } => {
                settings::run_settings_export(&store, output.as_deref()).await
            }
            SettingsCommands::Import { file, yes } => {
                settings::run_settings_import(&store, &file, yes).await
            }
        },
    }
}

fn connect_store() -> anyhow::Result<ZibisStore> {
    let config = zibis_core::load_app_config()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(ZibisStore::from_config(&config)?)
}

#[cfg(test)]
mod tests;
