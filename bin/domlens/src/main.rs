mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "domlens")]
#[command(about = "Visual DOM element inspector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a page interactively (HTML file or URL)
    Inspect {
        /// Path to an HTML file, or an http(s) URL to fetch
        source: String,

        /// URL the page claims to be served from (checked against the
        /// allow-list; defaults to the fetched URL or file://<path>)
        #[arg(long)]
        url: Option<String>,
    },

    /// Simulate the external login handshake for a user id
    Login {
        /// User id delivered by the sign-in page
        user_id: String,
    },

    /// Show configuration and sign-in status
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Inspect { source, url } => {
            commands::inspect::run(source, url).await?;
        }
        Commands::Login { user_id } => {
            commands::login::run(user_id).await?;
        }
        Commands::Status => {
            commands::status::run().await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                commands::config_cmd::show().await?;
            }
            ConfigCommands::Path => {
                commands::config_cmd::path().await?;
            }
        },
    }

    Ok(())
}
