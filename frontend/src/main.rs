use clap::Parser;
use frontend::AssetConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AssetConfig::parse();
    let app = frontend::router(&config.public_dir);

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Serving {} on {}", config.public_dir.display(), addr);
    axum::serve(listener, app).await?;

    Ok(())
}
