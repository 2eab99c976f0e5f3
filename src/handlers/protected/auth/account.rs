use axum::{extract::State, response::Json, Extension};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password, Identity};
use crate::database::users;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// PUT /api/auth/password - change the caller's password.
pub async fn password_put(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::bad_request(
            "Password saat ini dan password baru diperlukan",
        ));
    }
    if payload.new_password.len() < 8 {
        return Err(ApiError::bad_request("Password baru minimal 8 karakter"));
    }

    let stored = users::fetch_password_hash(&state.db, identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pengguna tidak ditemukan"))?;

    if !password::verify_password(&payload.current_password, &stored) {
        return Err(ApiError::bad_request("Password saat ini tidak valid"));
    }

    let new_hash = password::hash_password(&payload.new_password)?;
    users::update_password(&state.db, identity.id, &new_hash).await?;

    tracing::info!("User {} changed their password", identity.id);

    Ok(Json(json!({ "message": "Password berhasil diubah" })))
}

/// PUT /api/auth/profile - update the caller's name and email.
///
/// Re-issues the session cookie so the token's informational claims track
/// the edit; authorization still comes from the storage re-fetch either way.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if payload.name.is_empty() || payload.email.is_empty() {
        return Err(ApiError::bad_request("Nama dan email diperlukan"));
    }

    if payload.email != identity.email
        && users::email_taken_by_other(&state.db, &payload.email, identity.id).await?
    {
        return Err(ApiError::bad_request("Email sudah digunakan"));
    }

    users::update_profile(&state.db, identity.id, &payload.name, &payload.email).await?;

    let user = users::fetch_by_id(&state.db, identity.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pengguna tidak ditemukan"))?;

    let claims = auth::Claims::new(&user, state.config.security.jwt_expiry_hours);
    let token = auth::issue_token(&claims, state.config.security.jwt_secret.as_deref())?;
    let jar = jar.add(auth::session_cookie(token, &state.config.security));

    Ok((
        jar,
        Json(json!({ "message": "Profil berhasil diperbarui", "user": user })),
    ))
}
