use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use checkout_gateway::{config::Config, handlers, metrics};
use dotenv::dotenv;
use risk_core::{EventLog, RiskEngine};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .json()
        .init();

    info!("Starting Checkout Gateway...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!("Configuration loaded successfully");

    metrics::register_metrics(prometheus::default_registry())
        .expect("metrics can be registered");

    let engine = Arc::new(RiskEngine::new(
        config.engine.clone(),
        config.decision.clone(),
        config.replay.clone(),
    ));
    let events = Arc::new(EventLog::new(config.events.capacity));

    info!("Risk engine initialized successfully");

    let server_config = config.server.clone();

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(engine.clone()))
            .app_data(web::Data::new(events.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
