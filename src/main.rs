use clap::Parser;
use dialdesk::adapters::call_store::InMemoryCallStore;
use dialdesk::adapters::file_storage::UploadStore;
use dialdesk::cli::Cli;
use dialdesk::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Dialdesk on {}:{}", host, port);
    info!("Loaded {} products", settings.products.len());

    let uploads = Arc::new(UploadStore::local(&settings.uploads.dir)?);
    let calls = Arc::new(InMemoryCallStore::new());
    let settings = Arc::new(RwLock::new(settings));

    let app = dialdesk::create_app(settings, calls, uploads).await;

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
