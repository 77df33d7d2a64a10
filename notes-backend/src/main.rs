use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod config;
mod controllers;
mod db;
mod error;
mod models;

use config::Config;
use db::Connector;

pub struct AppState {
    /// Lazily-opened database shared by every worker
    pub connector: Arc<Connector>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notes backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    log::info!(
        "Database at {} (pool size {}), opened on first request",
        config.database_url,
        config.db_pool_size
    );

    let connector = Arc::new(Connector::new(
        config.database_url.clone(),
        config.db_pool_size,
    ));
    let started_at = Instant::now();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                connector: Arc::clone(&connector),
                started_at,
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    log::info!(
        "Notes API listening on http://{}:{}",
        config.bind_address,
        config.port
    );

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
