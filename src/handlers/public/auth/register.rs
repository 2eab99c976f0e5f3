use axum::{extract::State, http::StatusCode, response::Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password, DEFAULT_ROLE};
use crate::database::users;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub organization_name: String,
    pub role: Option<String>,
}

/// POST /api/auth/register - create an account and log it in immediately.
pub async fn register_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<Value>), ApiError> {
    if payload.name.is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
        || payload.organization_name.is_empty()
    {
        return Err(ApiError::bad_request(
            "Nama, email, password, dan nama organisasi diperlukan",
        ));
    }

    if users::email_exists(&state.db, &payload.email).await? {
        return Err(ApiError::conflict("Email sudah terdaftar"));
    }

    let password_hash = password::hash_password(&payload.password)?;
    let role = payload.role.as_deref().unwrap_or(DEFAULT_ROLE);

    let id = users::insert(
        &state.db,
        &payload.name,
        &payload.email,
        &password_hash,
        &payload.organization_name,
        role,
    )
    .await?;

    // Re-read the created row so the response and token reflect storage
    let user = users::fetch_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Gagal mendapatkan data pengguna"))?;

    let claims = auth::Claims::new(&user, state.config.security.jwt_expiry_hours);
    let token = auth::issue_token(&claims, state.config.security.jwt_secret.as_deref())?;
    let jar = jar.add(auth::session_cookie(token, &state.config.security));

    tracing::info!("Registered user {} in organization '{}'", id, payload.organization_name);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "message": "Registrasi berhasil", "user": user })),
    ))
}
