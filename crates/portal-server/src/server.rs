use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use portal_auth::{AuthState, TokenVerifier, authentication_middleware};
use portal_db_memory::InMemoryStore;
use portal_db_postgres::PostgresStore;
use portal_service::{Logged, PatientService};
use portal_storage::DynStore;

use crate::config::{AppConfig, StorageBackend};
use crate::handlers::{self, AppState};
use crate::middleware as app_middleware;

pub struct PortalServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the full application router over the given storage gateway.
pub fn build_app(cfg: &AppConfig, store: DynStore) -> anyhow::Result<Router> {
    let service = Arc::new(Logged::new(PatientService::new(store)));
    let state = AppState { service };

    let mut app = Router::new()
        // Banner and health endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Patients
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/api/patients/{id}",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        // Payments
        .route(
            "/api/patients/{id}/payments",
            get(handlers::list_patient_payments),
        )
        .route("/api/payments", post(handlers::create_payment))
        .with_state(state);

    if cfg.auth.enabled {
        let verifier = TokenVerifier::from_config(&cfg.auth)?;
        app = app.layer(middleware::from_fn_with_state(
            AuthState::new(verifier),
            authentication_middleware,
        ));
    }

    // Middleware stack (order: request id -> auth (above) -> cors/trace -> body limit)
    let app = app
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let req_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    http.method = %req.method(),
                    http.target = %req.uri(),
                    request_id = %req_id
                )
            }),
        )
        .layer(axum::extract::DefaultBodyLimit::max(cfg.server.body_limit_bytes));

    Ok(app)
}

/// Creates the storage gateway selected by the configuration.
pub async fn build_store(cfg: &AppConfig) -> anyhow::Result<DynStore> {
    let store: DynStore = match cfg.storage.backend {
        StorageBackend::Postgres => Arc::new(PostgresStore::new(&cfg.storage.postgres).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory storage backend; data is not persisted");
            Arc::new(InMemoryStore::new())
        }
    };
    tracing::info!(backend = store.backend_name(), "Storage gateway ready");
    Ok(store)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<PortalServer> {
        let store = build_store(&self.config).await?;
        let app = build_app(&self.config, store)?;

        Ok(PortalServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
