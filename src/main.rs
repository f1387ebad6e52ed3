mod config;
mod domain;
mod entity;
mod infrastructure;
mod presentation;
mod shutdown;
mod usecase;

#[cfg(test)]
mod test_support;

use axum::{Json, Router, routing::get};
use sea_orm::{ConnectOptions, Database};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::AppConfig,
    infrastructure::{
        event_repository::PostgresEventRepository,
        jwt_identity_verifier::JwtIdentityVerifier,
        monitoring::{ChannelMonitoringPublisher, MonitoringWorker, monitoring_channel},
        participant_repository::PostgresParticipantRepository,
        registration_repository::PostgresRegistrationRepository,
        schema,
    },
    presentation::handlers::{
        participant_handler::create_participant_router,
        registration_handler::create_registration_router,
    },
    shutdown::shutdown_signal,
    usecase::{participant_usecase::ParticipantUsecase, registration_usecase::RegistrationUsecase},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    tracing::info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .sqlx_logging(true);

    let db = Database::connect(opt).await.map_err(|e| {
        tracing::error!("Failed to connect to database: {}", e);
        e
    })?;
    tracing::info!("Database connection established");

    if config.auto_migrate {
        schema::create_tables(&db).await?;
        tracing::info!("Database schema ensured");
    }

    let (monitoring_sender, monitoring_receiver) = monitoring_channel();
    let monitoring_worker = tokio::spawn(
        MonitoringWorker::new(monitoring_receiver, &config.monitoring_log_dir).run(),
    );

    let event_repository = PostgresEventRepository::new(db.clone());
    let participant_repository = PostgresParticipantRepository::new(db.clone());
    let registration_repository = PostgresRegistrationRepository::new(db.clone());

    let registration_usecase = RegistrationUsecase::new(
        event_repository,
        participant_repository.clone(),
        registration_repository,
        ChannelMonitoringPublisher::new(monitoring_sender),
    );

    let app = build_app(
        create_registration_router(
            registration_usecase,
            ParticipantUsecase::new(participant_repository.clone()),
            JwtIdentityVerifier::new(&config.jwt_secret),
        ),
        create_participant_router(ParticipantUsecase::new(participant_repository)),
    );

    let listener = TcpListener::bind(config.listen).await?;
    tracing::info!("Server listening on {}", config.listen);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // the router owned the last monitoring sender, so the worker drains and stops
    if let Err(e) = monitoring_worker.await {
        tracing::error!(error = %e, "monitoring worker panicked");
    }

    db.close().await?;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_app(registration_router: Router, participant_router: Router) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/registrations", registration_router)
        .nest("/api/participants", participant_router)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
