use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::database::models::Organization;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/organizations - organizations with member and program counts.
pub async fn organizations_get(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let organizations: Vec<Organization> = sqlx::query_as(
        "SELECT o.id, o.name, o.description, o.university, o.faculty, o.department, o.logo, \
                o.created_at, o.updated_at, \
                (SELECT COUNT(*) FROM organization_members m WHERE m.organization_id = o.id) AS members, \
                (SELECT COUNT(*) FROM programs p WHERE p.organization_id = o.id) AS programs \
         FROM organizations o ORDER BY o.name ASC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "message": "Berhasil mendapatkan data organisasi",
        "organizations": organizations,
    })))
}
