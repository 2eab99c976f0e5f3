use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth;

/// POST /api/auth/logout - drop the session cookie.
///
/// Deliberately unauthenticated: a client with an expired or already-cleared
/// session must still be able to finish logging out.
pub async fn logout_post(jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.add(auth::removal_cookie()),
        Json(json!({ "message": "Logout berhasil" })),
    )
}
