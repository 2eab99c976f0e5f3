use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::auth::{Identity, ADMIN_ROLE};
use crate::database::models::Department;
use crate::error::ApiError;
use crate::AppState;

const SELECT_DEPARTMENTS: &str =
    "SELECT id, name, description, head_id FROM departments ORDER BY name ASC";

/// GET /api/departments - department listing, filtered by role.
///
/// Admins and ketua_himpunan see everything; kepala_departemen sees the
/// departments matching their organization; everyone else gets the full
/// list.
pub async fn departments_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let departments: Vec<Department> = if identity.role == ADMIN_ROLE
        || identity.role == "ketua_himpunan"
    {
        sqlx::query_as(SELECT_DEPARTMENTS).fetch_all(&state.db).await?
    } else if identity.role == "kepala_departemen" {
        match &identity.organization_name {
            Some(org) => {
                sqlx::query_as(
                    "SELECT id, name, description, head_id FROM departments \
                     WHERE name LIKE $1 ORDER BY name ASC",
                )
                .bind(format!("%{}%", org))
                .fetch_all(&state.db)
                .await?
            }
            None => sqlx::query_as(SELECT_DEPARTMENTS).fetch_all(&state.db).await?,
        }
    } else {
        sqlx::query_as(SELECT_DEPARTMENTS).fetch_all(&state.db).await?
    };

    if departments.is_empty() {
        tracing::debug!(
            "No departments visible to user {} (role '{}')",
            identity.id,
            identity.role
        );
    }

    Ok(Json(json!({ "departments": departments })))
}
