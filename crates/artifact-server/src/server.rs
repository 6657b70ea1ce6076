use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use artifact_core::Config;
use artifact_llm::CredentialSource;
use std::io;

use crate::handlers;
use crate::state::AppState;

/// Route table under `/api/v1`, shared by the binary and the tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::handler))
            .route("/providers", web::get().to(handlers::providers::handler))
            .route("/generate", web::post().to(handlers::generate::handler))
            .route(
                "/generate/stream",
                web::post().to(handlers::stream::handler),
            )
            .route("/export", web::post().to(handlers::export::handler))
            .route("/snapshots/{key}", web::get().to(handlers::snapshots::get))
            .route("/snapshots/{key}", web::put().to(handlers::snapshots::put))
            .route(
                "/snapshots/{key}",
                web::delete().to(handlers::snapshots::delete),
            ),
    );
}

pub async fn run_server(config: Config) -> io::Result<()> {
    let port = config.port;
    let state = AppState::new(config, CredentialSource::from_env());
    run_server_with_state(state, port).await
}

pub async fn run_server_with_state(state: AppState, port: u16) -> io::Result<()> {
    state.init().await;

    let available = state.provider().available_providers();
    if available.is_empty() {
        log::warn!("No AI provider API keys found; generation requests will fail until one is set");
    } else {
        log::info!(
            "Available providers: {}",
            available
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let state = web::Data::new(state);
    log::info!("Listening on http://0.0.0.0:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(4 * 1024 * 1024))
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
