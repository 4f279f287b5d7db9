//! order-server - delivery order management service
//!
//! Bootstrap order:
//! 1. `.env` + environment configuration
//! 2. tracing (stdout, optional daily file)
//! 3. backends (PostgreSQL/Redis or in-memory), seed user
//! 4. HTTP server with graceful ctrl-c shutdown

use order_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let _guard = init_logger_with_file(&config.log_level, config.log_dir.as_deref());

    tracing::info!(
        "Starting order-server (env: {}, port: {})",
        config.environment,
        config.http_port
    );

    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
