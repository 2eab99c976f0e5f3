use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::database::{models::User, users};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// GET /api/users/:id - single user record.
pub async fn record_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = users::fetch_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pengguna tidak ditemukan"))?;

    Ok(Json(user))
}

/// PUT /api/users/:id - self-service update; editing anyone else is refused.
pub async fn record_put(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    if identity.id != id {
        return Err(ApiError::forbidden(
            "Tidak diizinkan mengubah data pengguna lain",
        ));
    }

    if payload.name.is_empty() || payload.email.is_empty() {
        return Err(ApiError::bad_request("Nama dan email diperlukan"));
    }

    let affected = users::update_profile(&state.db, id, &payload.name, &payload.email).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Pengguna tidak ditemukan"));
    }

    Ok(Json(json!({ "message": "Berhasil memperbarui data pengguna" })))
}

/// DELETE /api/users/:id - admin only; the router layers `require_admin`
/// over this route.
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let affected = users::delete(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::not_found("Pengguna tidak ditemukan"));
    }

    tracing::info!("Admin {} deleted user {}", identity.id, id);

    Ok(Json(json!({ "message": "Pengguna berhasil dihapus" })))
}
