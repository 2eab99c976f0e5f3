use axum::{extract::State, response::Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password};
use crate::database::users;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/login - authenticate with email and password.
///
/// On success issues a credential token and sets the session cookie. The
/// same 401 is returned for an unknown email and a wrong password.
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email dan password diperlukan"));
    }

    let record = users::fetch_auth_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Email atau password salah"))?;

    if !password::verify_password(&payload.password, &record.password) {
        return Err(ApiError::unauthorized("Email atau password salah"));
    }

    let user = record.into_user();
    let claims = auth::Claims::new(&user, state.config.security.jwt_expiry_hours);
    let token = auth::issue_token(&claims, state.config.security.jwt_secret.as_deref())?;
    let jar = jar.add(auth::session_cookie(token, &state.config.security));

    tracing::info!("User {} logged in", user.id);

    Ok((
        jar,
        Json(json!({ "message": "Login berhasil", "user": user })),
    ))
}
