use axum::{extract::State, response::Json, Extension};
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/stats - dashboard counters for the landing view.
pub async fn stats_get(
    State(state): State<AppState>,
    Extension(_identity): Extension<Identity>,
) -> Result<Json<Value>, ApiError> {
    let active_programs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM programs WHERE status = 'dalam_progres'")
            .fetch_one(&state.db)
            .await?;

    let pending_tasks: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tasks WHERE status = 'belum_dimulai' OR status = 'dalam_progres'",
    )
    .fetch_one(&state.db)
    .await?;

    let completed_milestones: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM milestones WHERE status = 'selesai'")
            .fetch_one(&state.db)
            .await?;

    let active_members: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT user_id) FROM organization_members")
            .fetch_one(&state.db)
            .await?;

    Ok(Json(json!({
        "stats": {
            "activePrograms": active_programs,
            "pendingTasks": pending_tasks,
            "completedMilestones": completed_milestones,
            "activeMembers": active_members,
        }
    })))
}
