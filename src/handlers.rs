use crate::config::Config;
use crate::errors::AppError;
use crate::export::clipboard_text;
use crate::lookup::{self, DisplayState};
use crate::models::{BankInfo, QueryRequest, QueryResponse};
use crate::services::{BankRegistryService, BenefitApiService, PersistenceService};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use moka::future::Cache;
use serde_json::json;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// IN100 lookup API client (sign-in + balance finder).
    pub benefit_api: BenefitApiService,
    /// Bank registry client used for enrichment.
    pub bank_registry: BankRegistryService,
    /// Hosted persistence client.
    pub persistence: PersistenceService,
    /// Bank code → registry entry cache. A negative result is cached too so
    /// a flaky registry is not hammered on every record change.
    pub bank_cache: Cache<String, Option<BankInfo>>,
    /// The single "current displayed record" slot.
    pub display: RwLock<DisplayState>,
    /// Monotonic query generation; the newest generation owns `display`.
    pub generation: AtomicU64,
    /// External IP recorded in persisted rows.
    pub origin_ip: String,
}

impl AppState {
    pub fn new(
        config: Config,
        benefit_api: BenefitApiService,
        origin_ip: String,
    ) -> Self {
        let bank_registry = BankRegistryService::new(&config);
        let persistence = PersistenceService::new(&config);
        // Bank registry entries are effectively static; 24h TTL.
        let bank_cache = Cache::builder()
            .time_to_live(std::time::Duration::from_secs(86_400))
            .max_capacity(1_000)
            .build();

        Self {
            config,
            benefit_api,
            bank_registry,
            persistence,
            bank_cache,
            display: RwLock::new(DisplayState::default()),
            generation: AtomicU64::new(0),
            origin_ip,
        }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-in100-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/queries
///
/// Runs the full lookup workflow for `{identity, benefitNumber}` and
/// answers with the normalized record, its presentation rows and any
/// informational notice.
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    tracing::info!(
        "POST /api/v1/queries - benefit: {}",
        request.benefit_number
    );

    if request.identity.trim().is_empty() || request.benefit_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "identity and benefitNumber are required".to_string(),
        ));
    }

    let response = lookup::run_query(state, request).await?;
    Ok(Json(response))
}

/// GET /api/v1/queries/current
///
/// The current display state: record (if any), notice, phase and the
/// `loading` signal consumed by the presentation layer.
pub async fn current_query(State(state): State<Arc<AppState>>) -> Json<DisplayState> {
    let display = state.display.read().await;
    Json(display.clone())
}

/// GET /api/v1/queries/current/clipboard
///
/// Clipboard serialization of the current record: UTF-8 text, one field per
/// line, `*Label*: Value`. Derived from the same row sequence as the table.
pub async fn current_query_clipboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let display = state.display.read().await;
    let record = display
        .record
        .as_ref()
        .ok_or_else(|| AppError::NotFound("no query result to export".to_string()))?;

    let text = clipboard_text(&crate::export::presentation_rows(record));
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}
