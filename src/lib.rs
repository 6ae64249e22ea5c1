//! csboard is a customer-service inquiry board with customer and admin
//! sessions.

#![forbid(unsafe_code)]
#![deny(unused_mut)]

pub mod config;
mod database;
pub mod error;
mod middleware;
mod router;
mod seed;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use adapters::outbound::clock::SystemClock;
use adapters::outbound::crypto::Argon2PasswordHasher;
use adapters::outbound::persistence::memory::{
    MemoryInquiryRepository, MemoryUserRepository,
};
use adapters::outbound::persistence::postgres::{
    PgInquiryRepository, PgUserRepository,
};
use adapters::outbound::storage::LocalAttachmentStorage;
use adapters::outbound::telemetry::TracingTelemetry;
use application::error::ApplicationError;
use application::ports::inbound::{Authenticate, InquiryService};
use application::ports::outbound::{
    AttachmentStorage, Clock, InquiryRepository, PasswordHasher,
    TelemetryPort, UserRepository,
};
use application::usecases::{
    AttachmentHandler, AuthenticateUseCase, InquiryUseCase,
};
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode, header};
use axum::{Router, middleware as AxumMiddleware};
use config::Configuration;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub auth: Arc<dyn Authenticate>,
    pub inquiries: Arc<dyn InquiryService>,
    pub attachments: Arc<AttachmentHandler>,
    /// `None` when no Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(10)))
        // Remove sensitive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE, header::SET_COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        );

    let session = middleware::session_layer(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_size);

    router::router()
        // The gate reads the session, so the session layer wraps it.
        .layer(AxumMiddleware::from_fn(middleware::gate))
        .layer(session)
        .layer(body_limit)
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Outbound adapters the services are built on.
pub struct Adapters {
    pub users: Arc<dyn UserRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
    pub storage: Arc<dyn AttachmentStorage>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
    pub telemetry: Arc<dyn TelemetryPort>,
}

impl Adapters {
    /// PostgreSQL stores when configured, in-memory ones otherwise.
    pub async fn from_config(
        config: &Configuration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (users, inquiries): (
            Arc<dyn UserRepository>,
            Arc<dyn InquiryRepository>,
        ) = match &config.postgres {
            Some(postgres) => {
                let pool = database::connect(postgres).await?;
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgInquiryRepository::new(pool)),
                )
            },
            None => {
                tracing::warn!(
                    "missing `postgres` entry on `config.yaml` file, data is kept in memory"
                );
                (
                    Arc::new(MemoryUserRepository::new()),
                    Arc::new(MemoryInquiryRepository::new()),
                )
            },
        };

        let argon2 = config.argon2.clone().unwrap_or_default();
        let hasher = Argon2PasswordHasher::new(
            argon2.memory_cost,
            argon2.iterations,
            argon2.parallelism,
        )?;

        Ok(Self {
            users,
            inquiries,
            storage: Arc::new(LocalAttachmentStorage::new(&config.upload_dir)),
            hasher: Arc::new(hasher),
            clock: Arc::new(SystemClock::new()),
            telemetry: Arc::new(TracingTelemetry::new()),
        })
    }
}

/// Wire services over `adapters`, seeding demo data when enabled.
pub async fn build_state(
    config: Arc<Configuration>,
    adapters: Adapters,
    metrics: Option<PrometheusHandle>,
) -> Result<AppState, ApplicationError> {
    let attachments =
        Arc::new(AttachmentHandler::new(Arc::clone(&adapters.storage)));

    if config.seed {
        seed::Seeder {
            users: adapters.users.as_ref(),
            inquiries: adapters.inquiries.as_ref(),
            attachments: &attachments,
            hasher: adapters.hasher.as_ref(),
            clock: adapters.clock.as_ref(),
        }
        .seed()
        .await?;
    }

    let auth = AuthenticateUseCase::new(
        Arc::clone(&adapters.users),
        adapters.hasher,
        Arc::clone(&adapters.telemetry),
    );
    let inquiries = InquiryUseCase::new(
        adapters.inquiries,
        adapters.users,
        Arc::clone(&attachments),
        adapters.clock,
        adapters.telemetry,
    );

    Ok(AppState {
        config,
        auth: Arc::new(auth),
        inquiries: Arc::new(inquiries),
        attachments,
        metrics,
    })
}

/// Initialize the application state.
pub async fn initialize_state(
    config: Arc<Configuration>,
    metrics: Option<PrometheusHandle>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let adapters = Adapters::from_config(&config).await?;
    Ok(build_state(config, adapters, metrics).await?)
}
