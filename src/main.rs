use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use proker_tracker_api::{
    config::AppConfig,
    database,
    handlers::{protected, public},
    middleware::{auth_gate, require_admin},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!("Starting Proker Tracker API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; authenticated routes will report a server error");
    }

    let db = database::connect(&config.database).context("failed to build database pool")?;
    let state = AppState {
        config: config.clone(),
        db,
    };

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 Proker Tracker API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API behind the auth gate
        .merge(api_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/logout", post(auth::logout_post))
}

fn api_routes(state: AppState) -> Router<AppState> {
    // Deletion is the one administrative operation: the privilege layer sits
    // on top of the gate for this method only
    let delete_user = axum::routing::delete(protected::users::record_delete)
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/auth/me", get(protected::auth::me_get))
        .route("/api/auth/password", put(protected::auth::password_put))
        .route("/api/auth/profile", put(protected::auth::profile_put))
        .route("/api/users", get(protected::users::list_get))
        .route(
            "/api/users/:id",
            get(protected::users::record_get)
                .put(protected::users::record_put)
                .merge(delete_user),
        )
        .route(
            "/api/departments",
            get(protected::departments::departments_get),
        )
        .route(
            "/api/organizations",
            get(protected::organizations::organizations_get),
        )
        .route("/api/stats", get(protected::stats::stats_get))
        .layer(middleware::from_fn_with_state(state, auth_gate))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.server.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Proker Tracker API",
        "version": version,
        "description": "Organizational task-tracking API (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/auth/login, /api/auth/register, /api/auth/logout (public - session management)",
            "account": "/api/auth/me, /api/auth/password, /api/auth/profile (protected)",
            "users": "/api/users[/:id] (protected; delete requires admin)",
            "departments": "/api/departments (protected)",
            "organizations": "/api/organizations (protected)",
            "stats": "/api/stats (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
