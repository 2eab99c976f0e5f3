use axum::{response::Json, Extension};

use crate::auth::Identity;

/// GET /api/auth/me - the resolved identity for the current session.
///
/// This is the gate's own output echoed back: current storage state, not
/// the token's claims.
pub async fn me_get(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
