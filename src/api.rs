use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::extract::VariationDirection;
use crate::fetcher::{ExchangeRate, RatesSnapshot};
use crate::services::RatesService;
use crate::store::{
    BaseMonetariaHistoryEntry, BaseMonetariaLatest, BaseMonetariaSection, IndicatorsDocument,
    IndicatorsRepository, LiquidityHistoryEntry, LiquidityLatest,
};

pub const RATES_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Clone)]
pub struct AppState {
    pub indicators_repo: IndicatorsRepository,
    pub rates_service: RatesService,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Rates fetched on demand; a rate is null when its source failed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LiveRatesResponse {
    pub eur: Option<ExchangeRate>,
    pub usd: Option<ExchangeRate>,
    pub usdt: Option<ExchangeRate>,
    pub fetched_at: DateTime<Utc>,
}

impl LiveRatesResponse {
    fn new(snapshot: RatesSnapshot, fetched_at: DateTime<Utc>) -> Self {
        Self {
            eur: snapshot.eur,
            usd: snapshot.usd,
            usdt: snapshot.usdt,
            fetched_at,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BCV Indicators API",
        description = "Weekly monetary indicators and exchange rates published by the Banco Central de Venezuela"
    ),
    paths(health, get_indicators, get_rates),
    components(schemas(
        HealthResponse,
        LiveRatesResponse,
        ExchangeRate,
        IndicatorsDocument,
        LiquidityLatest,
        LiquidityHistoryEntry,
        BaseMonetariaSection,
        BaseMonetariaLatest,
        BaseMonetariaHistoryEntry,
        VariationDirection
    )),
    tags((name = "indicators"), (name = "rates"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/indicators", get(get_indicators))
        .route("/rates", get(get_rates))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/indicators",
    tag = "indicators",
    responses(
        (status = 200, description = "Latest published indicators", body = IndicatorsDocument),
        (status = 404, description = "Nothing published yet"),
        (status = 500, description = "Published document could not be read")
    )
)]
#[instrument(skip(state))]
async fn get_indicators(
    State(state): State<AppState>,
) -> Result<Json<IndicatorsDocument>, StatusCode> {
    debug!("Loading published indicators");
    let document = state
        .indicators_repo
        .load()
        .await
        .map_err(|e| {
            error!("Failed to read published indicators: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            warn!("No indicators published yet");
            StatusCode::NOT_FOUND
        })?;

    info!("Serving indicators for {}", document.latest.date);
    Ok(Json(document))
}

#[utoipa::path(
    get,
    path = "/api/v1/rates",
    tag = "rates",
    responses((status = 200, description = "Live exchange rates", body = LiveRatesResponse))
)]
#[instrument(skip(state))]
async fn get_rates(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Fetching live exchange rates");
    let snapshot = state.rates_service.live().await;
    let response = LiveRatesResponse::new(snapshot, Utc::now());

    info!(
        "Serving live rates (eur: {}, usd: {}, usdt: {})",
        response.eur.is_some(),
        response.usd.is_some(),
        response.usdt.is_some()
    );

    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, RATES_CACHE_CONTROL)],
        Json(response),
    )
}
