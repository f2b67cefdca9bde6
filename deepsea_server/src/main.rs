use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use deepsea_core::{fresh_seed, spin_with_seed, EngineConfig};
use deepsea_shared::{
    AdminSetParamsRequest, ApiError, ParamsResponse, PaytableResponse, SpinRequest, SpinResponse,
};

mod db;

use db::{get_params, init_db, log_spin, set_params};

#[derive(Clone)]
struct AppState {
    db: SqlitePool,
    api_key: String,
    // serialises read-params -> spin -> log -> bump nonce
    spin_lock: Arc<Mutex<()>>,
}

fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn internal(e: anyhow::Error) -> StatusCode {
    error!("{e:#}");
    status_for(&ApiError::Internal)
}

async fn route_paytable() -> Json<PaytableResponse> {
    Json(PaytableResponse::current())
}

async fn route_params(State(state): State<Arc<AppState>>) -> Result<Json<ParamsResponse>, StatusCode> {
    let p = get_params(&state.db).await.map_err(internal)?;
    let config = p.engine_config().map_err(internal)?;
    Ok(Json(ParamsResponse {
        rtp: config.rtp,
        volatility: config.volatility,
        pay_mode: config.pay_mode,
    }))
}

async fn route_spin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpinRequest>,
) -> Result<Json<SpinResponse>, StatusCode> {
    if !req.bet.is_finite() || req.bet <= 0.0 {
        let err = ApiError::Invalid(format!("bet {}", req.bet));
        warn!("{err}");
        return Err(status_for(&err));
    }

    let _guard = state.spin_lock.lock().await;
    let mut p = get_params(&state.db).await.map_err(internal)?;
    let config = p.engine_config().map_err(internal)?;
    p.nonce += 1;

    let seed = fresh_seed();
    let outcome = spin_with_seed(&config, req.bet, seed);

    // log spin
    log_spin(&state.db, p.nonce, seed, &config, req.bet, &outcome)
        .await
        .map_err(internal)?;

    // persist incremented nonce
    set_params(&state.db, &p).await.map_err(internal)?;

    info!(
        nonce = p.nonce,
        bet = req.bet,
        total_win = outcome.total_win,
        special_event = ?outcome.special_event,
        "spin"
    );
    Ok(Json(SpinResponse::from_outcome(
        p.nonce as u64,
        seed,
        &outcome,
    )))
}

async fn route_admin_set_params(
    State(state): State<Arc<AppState>>,
    TypedHeader(axum_extra::headers::Authorization(bearer)): TypedHeader<
        axum_extra::headers::Authorization<axum_extra::headers::authorization::Bearer>,
    >,
    Json(req): Json<AdminSetParamsRequest>,
) -> Result<StatusCode, StatusCode> {
    if bearer.token() != state.api_key {
        return Err(status_for(&ApiError::Unauthorized));
    }
    let config = EngineConfig::new(req.rtp, req.volatility).with_pay_mode(req.pay_mode);
    if let Err(e) = config.validate() {
        let err = ApiError::Invalid(e.to_string());
        warn!("{err}");
        return Err(status_for(&err));
    }

    let _guard = state.spin_lock.lock().await;
    let mut p = get_params(&state.db).await.map_err(internal)?;
    p.rtp = config.rtp;
    p.volatility = config.volatility;
    p.pay_mode = config.pay_mode.as_str().to_string();
    set_params(&state.db, &p).await.map_err(internal)?;
    info!(rtp = p.rtp, volatility = p.volatility, pay_mode = %p.pay_mode, "params updated");
    Ok(StatusCode::NO_CONTENT)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(
            &std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://deepsea.db?mode=rwc".to_string()),
        )
        .await?;
    init_db(&db).await?;

    let state = Arc::new(AppState {
        db,
        api_key: std::env::var("API_KEY").unwrap_or_else(|_| "dev-key".into()),
        spin_lock: Arc::new(Mutex::new(())),
    });

    let app = Router::new()
        .route("/paytable", get(route_paytable))
        .route("/params", get(route_params))
        .route("/spin", post(route_spin))
        .route("/admin/set-params", post(route_admin_set_params))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
