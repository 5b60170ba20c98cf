//! beefdeets main entry point
//!
//! This binary handles CLI parsing, logging setup, startup validation and
//! either serves the HTTP control API or runs a single player operation.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beefdeets::config::{Config, DEFAULT_CONFIG_PATH};
use beefdeets::control::{ActionOutcome, CommandHandler, ControlServer};
use beefdeets::{registry, PlayerAdapter, APP_NAME, VERSION};

/// Remote HTTP control surface for a local DeaDBeeF player
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version = VERSION, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the DeaDBeeF binary (overrides the configuration)
    #[arg(long, global = true)]
    player: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP control API
    Serve {
        /// Bind address (overrides the configuration)
        #[arg(long)]
        bind: Option<String>,

        /// Bind port (overrides the configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the current track as JSON
    NowPlaying {
        /// Comma-separated field names
        #[arg(long)]
        fields: Option<String>,
    },

    /// Perform a transport action
    Action {
        /// Action name, see `actions`
        name: String,
    },

    /// List the available transport actions
    Actions,

    /// Show player and service versions
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize structured logging with tracing
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the CLI command; `Ok(false)` means the command ran but failed
async fn run(cli: Cli) -> anyhow::Result<bool> {
    // A registry entry without a usable name must stop us before any route exists
    registry()
        .validate()
        .context("Action registry is misconfigured")?;

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if let Some(player) = cli.player {
        config.player.path = player;
    }

    match cli.command {
        Commands::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.http.bind_address = bind;
            }
            if let Some(port) = port {
                config.http.bind_port = port;
            }
            config.validate()?;
            serve(config).await?;
            Ok(true)
        }
        Commands::NowPlaying { fields } => {
            config.validate()?;
            let handler = create_handler(&config);
            let snapshot = handler.now_playing(fields.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(true)
        }
        Commands::Action { name } => {
            config.validate()?;
            let handler = create_handler(&config);
            let outcome: ActionOutcome = handler.perform_named(&name).await;
            println!("{}", outcome.to_json()?);
            Ok(outcome.is_ok())
        }
        Commands::Actions => {
            for name in registry().names() {
                println!("{}", name);
            }
            Ok(true)
        }
        Commands::Version => {
            config.validate()?;
            let handler = create_handler(&config);
            println!("{} v{}", APP_NAME, VERSION);
            match handler.version().await {
                Ok(response) => {
                    println!("DeaDBeeF {}", response.version);
                    Ok(true)
                }
                Err(e) => {
                    println!("DeaDBeeF: {}", e);
                    Ok(false)
                }
            }
        }
    }
}

fn create_handler(config: &Config) -> CommandHandler {
    let adapter = Arc::new(PlayerAdapter::from_config(config));
    CommandHandler::new(adapter).with_fallback_cover(config.album_cover.fallback_path.clone())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting {} v{}", APP_NAME, VERSION);

    let handler = Arc::new(create_handler(&config));
    info!("Player: {}", handler.adapter().describe());
    info!("Actions: {}", registry().names().join(", "));

    let addr = config.http.socket_addr()?;
    let server = ControlServer::new(addr, handler);
    server.start().await?;

    info!("Shutting down");
    Ok(())
}
