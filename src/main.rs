use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use protected_fetch::config::AppConfig;
use protected_fetch::fetcher::ProtectedFetcher;
use protected_fetch::health::check_health;
use protected_fetch::surface::{FileSurface, SurfaceRegistry, TerminalSurface};
use protected_fetch::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "protected-fetch", about = "Fetch cookie-protected API data and render it")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL of the API (overrides server.base_url)
    #[arg(long)]
    base_url: Option<String>,

    /// Cookie to send with credentialed requests, as NAME=VALUE (repeatable)
    #[arg(long = "cookie", value_name = "NAME=VALUE")]
    cookies: Vec<String>,

    /// Render into this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Fetch /api/v1/data and render the outcome (default)
    Data,
    /// Check the API health endpoint
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    config.credentials.cookies.extend(cli.cookies);
    if cli.output.is_some() {
        config.output.path = cli.output;
    }
    config.validate()?;

    // Initialize tracing; logs go to stderr so stdout stays the output surface
    let json = cli.log_json || config.logging.json;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::debug!(config = ?config, "Loaded configuration");

    let transport = Arc::new(HttpTransport::from_config(&config)?);

    match cli.command.unwrap_or(Command::Data) {
        Command::Data => {
            let mut surfaces = SurfaceRegistry::new();
            let surface_id = config.output.surface_id.as_str();
            match &config.output.path {
                Some(path) => {
                    surfaces.register(FileSurface::new(surface_id, path));
                }
                None => {
                    surfaces.register(TerminalSurface::stdout(surface_id));
                }
            }

            ProtectedFetcher::new(transport, surfaces)
                .with_surface_id(surface_id)
                .execute()
                .await?;
        }
        Command::Health => {
            let health = check_health(transport.as_ref()).await?;
            println!("{}: {}", health.status, health.message);
        }
    }

    Ok(())
}
