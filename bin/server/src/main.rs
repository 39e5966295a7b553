mod config;
mod constants;
mod handlers;
mod scheduler;
mod state;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use config::ServerConfig;
use keygen::KeyGenerator;
use manager::FileManager;
use metadata::MetadataStore;
use state::AppState;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with env filter
    // Filter out actix-server worker shutdown messages
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info")
                    .add_directive("actix_server::worker=warn".parse().unwrap())
                    .add_directive("actix_server::accept=warn".parse().unwrap())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting keyed file storage server (PID: {})",
        std::process::id()
    );

    let config = ServerConfig::load().context("Failed to load configuration")?;

    let store = MetadataStore::load(&config.data_file)
        .with_context(|| format!("Failed to load metadata snapshot {:?}", config.data_file))?;
    info!("Metadata snapshot loaded from {:?}", config.data_file);

    let keygen = KeyGenerator::new(config.public_key_length, config.private_key_length);
    let manager = FileManager::new(
        store,
        config.backend_config(),
        keygen,
        config.upload_folder.clone(),
    );

    let bind_address = config.bind_address();
    let state = web::Data::new(AppState::new(manager, config));

    scheduler::spawn_sweep(state.clone());

    info!("Starting server on http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(handlers::upload::upload)
            .service(handlers::download::download)
            .service(handlers::delete::delete)
            .service(handlers::health::health)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind to {}", bind_address))?
    .run()
    .await
    .context("Server terminated with an error")
}
