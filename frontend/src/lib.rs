//! Static asset server for the chess frontend
//!
//! Serves `index.html` at `/` and every other file from the public
//! directory. No API routes live here.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use clap::Parser;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

const DEFAULT_PUBLIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

#[derive(Parser, Debug, Clone)]
#[command(name = "frontend", about = "Static file server for the chess UI")]
pub struct AssetConfig {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "FRONTEND_PORT", default_value_t = 5173)]
    pub port: u16,

    /// Directory holding index.html and assets
    #[arg(long, env = "PUBLIC_DIR", default_value = DEFAULT_PUBLIC_DIR)]
    pub public_dir: PathBuf,
}

impl AssetConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn router(public_dir: impl AsRef<Path>) -> Router {
    let dir = public_dir.as_ref();
    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .fallback_service(ServeDir::new(dir))
        .layer(TraceLayer::new_for_http())
}
