use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use tokio::sync::oneshot;

mod config;
mod controllers;
mod gateway;
mod models;
mod relay;

use config::Config;
use gateway::GatewaySession;
use relay::RelayService;

pub struct AppState {
    pub relay: RelayService,
}

impl AppState {
    pub fn new(session: Arc<dyn GatewaySession>) -> Self {
        Self {
            relay: RelayService::new(session),
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    // One gateway session for the whole process, shared by every request
    log::info!("Connecting to Discord gateway");
    let (gateway_shutdown_tx, gateway_shutdown_rx) = oneshot::channel();
    let (session, gateway_task) =
        gateway::discord::start_gateway(&config.discord_bot_token, gateway_shutdown_rx)
            .await
            .map_err(|e| {
                log::error!("Failed to create Discord client: {}", e);
                io::Error::other(e.to_string())
            })?;
    let session: Arc<dyn GatewaySession> = session;

    log::info!("Starting relay server on http://{}:{}", config.host, config.port);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState::new(Arc::clone(&session))))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::servers::config)
            .configure(controllers::messages::config)
            .configure(controllers::audit_logs::config)
            .configure(controllers::members::config)
            .configure(controllers::roles::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;

    log::info!("HTTP server stopped, shutting down gateway");
    let _ = gateway_shutdown_tx.send(());
    if let Err(e) = gateway_task.await {
        log::error!("Gateway task ended abnormally: {}", e);
    }

    result
}
