//! HTTP surface: application state, router and server lifecycle

pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tokio::signal;
use tracing::{info, warn};

use crate::audit::{
    audit_routes, AuditInterceptor, AuditLogService, AuditStore, AuditWriter, InMemoryAuditStore,
    PgAuditStore,
};
use crate::config::{AuditStoreKind, Config, CorsConfig};
use crate::db;
use crate::features::{self, FeatureState};
use crate::middleware;

/// Everything the handlers share
#[derive(Clone)]
pub struct AppState {
    pub writer: AuditWriter,
    pub audit_logs: AuditLogService,
    pub features: FeatureState,
    /// Present when audit entries go to Postgres
    pub db: Option<PgPool>,
}

impl AppState {
    /// Wire the audit pipeline and the audited services around `store`
    pub fn new(store: Arc<dyn AuditStore>, db: Option<PgPool>) -> Self {
        let writer = AuditWriter::new(Arc::clone(&store));
        let interceptor = AuditInterceptor::new(writer.clone());

        Self {
            features: FeatureState::new(&interceptor),
            audit_logs: AuditLogService::new(store),
            writer,
            db,
        }
    }

    /// State backed by a process-local audit store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryAuditStore::new()), None)
    }

    /// Connect to Postgres, apply migrations and use it as the audit store
    pub async fn postgres(config: &Config) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.database).await?;
        db::run_migrations(&pool).await?;

        Ok(Self::new(Arc::new(PgAuditStore::new(pool.clone())), Some(pool)))
    }

    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        match config.audit.store {
            AuditStoreKind::Postgres => Self::postgres(config).await,
            AuditStoreKind::Memory => {
                warn!("Using in-memory audit store; entries are lost on restart");
                Ok(Self::in_memory())
            },
        }
    }
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let api_v1 = features::router(state.features.clone())
        .nest("/audit-logs", audit_routes().with_state(state.audit_logs.clone()));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(state)
        .nest("/api/v1", api_v1)
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
}

/// Run the server until a shutdown signal, then drain pending audit writes
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config).await?;
    let writer = state.writer.clone();
    let app = create_router(state, &config.cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, audit_store = %config.audit.store, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    info!(pending = writer.pending(), "Flushing audit writes");
    if tokio::time::timeout(timeout, writer.flush()).await.is_err() {
        warn!(
            pending = writer.pending(),
            timeout_secs = config.server.shutdown_timeout_secs,
            "Audit writes still pending at shutdown; remaining entries are lost"
        );
    }

    info!("Server shut down gracefully");
    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "SecHub Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health(State(state): State<AppState>) -> Response {
    let audit_store = state.audit_logs.store_kind();

    if let Some(pool) = &state.db {
        if let Err(e) = db::health_check(pool).await {
            tracing::error!("Database health check failed: {:?}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "audit_store": audit_store
                })),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "audit_store": audit_store
        })),
    )
        .into_response()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
