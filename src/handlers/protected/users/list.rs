use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::database::users;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/users - users visible to the caller, name-ordered.
pub async fn list_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let users =
        users::list_for_organization(&state.db, identity.organization_name.as_deref()).await?;

    tracing::debug!(
        "User {} listed {} users for organization {:?}",
        identity.id,
        users.len(),
        identity.organization_name
    );

    Ok(Json(json!({ "users": users })))
}
