//! Move service configuration
//!
//! Values come from command-line flags or the environment (a `.env` file is
//! loaded by `main` first).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Upper bound on tree searches per request
pub const MAX_SEARCHES: i64 = 10_000;

const DEFAULT_WEIGHTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/model/evaluator_weights.json");

#[derive(Parser, Debug, Clone)]
#[command(name = "backend", about = "Chess move service")]
pub struct ServerConfig {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Evaluator weights for the model-backed selector
    #[arg(long, env = "MODEL_WEIGHTS", default_value = DEFAULT_WEIGHTS)]
    pub weights: PathBuf,

    /// Tree searches per request
    #[arg(
        long,
        env = "MCTS_SEARCHES",
        default_value_t = 75,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SEARCHES)
    )]
    pub searches: u32,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
