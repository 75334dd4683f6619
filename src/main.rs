use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mercari_listing::{
    config::{Config, DatabaseBackend},
    image_assets::ImageStore,
    repositories::Repositories,
    services::ListingService,
    web::{shutdown_signal, WebServer},
};

#[derive(Parser)]
#[command(name = "mercari-listing")]
#[command(version)]
#[command(about = "A minimal marketplace listing service with content-addressed image storage")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Use the flat JSON file store instead of SQLite
    #[arg(long)]
    json_store: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" || cli.log_level == "debug" {
        format!(
            "mercari_listing={},tower_http={}",
            cli.log_level, cli.log_level
        )
    } else {
        format!("mercari_listing={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting listing service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }
    if cli.json_store {
        config.database.backend = DatabaseBackend::Json;
    }

    let repositories = Repositories::connect(&config.database).await?;

    let images = ImageStore::from_config(&config.storage);
    images.ensure_storage_dir().await?;
    if !images.default_image_path().exists() {
        tracing::warn!(
            "Default image {} is missing; unknown images will return 404",
            images.default_image_path().display()
        );
    }
    info!("Image directory: {}", images.image_dir().display());

    let listing = ListingService::new(repositories.clone(), images);
    info!("Allowing cross-origin requests from {}", config.web.front_url);

    let web_server = WebServer::new(config, listing)?;
    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    let result = web_server.serve_with_shutdown(shutdown_signal()).await;

    repositories.close().await;
    info!("Shutdown complete");

    result
}
