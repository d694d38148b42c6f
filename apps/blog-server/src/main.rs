//! # Blogicum Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use blog_server::handlers;
use blog_server::middleware::error::error_pages;
use blog_server::observability::RequestIdMiddleware;
use blog_server::telemetry::{TelemetryConfig, init_telemetry};
use blog_server::{AppConfig, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Blogicum on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await;

    HttpServer::new(move || {
        App::new()
            .wrap(error_pages())
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
