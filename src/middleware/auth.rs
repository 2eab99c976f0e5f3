use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{self, AuthError, Identity, AUTH_COOKIE};
use crate::database::users;
use crate::AppState;

/// Authentication gate for protected routes.
///
/// Extracts the credential cookie, verifies the token, re-fetches the user
/// from storage, and injects the [`Identity`] into the request. Handlers
/// behind this layer read the identity from their extensions and can assume
/// it reflects current storage state.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = verify(&jar, &state).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Resolve the request's credential cookie to an authorized identity.
///
/// One storage round trip per call; all failure paths are terminal for the
/// request and no retries happen here.
pub async fn verify(jar: &CookieJar, state: &AppState) -> Result<Identity, AuthError> {
    let token = jar.get(AUTH_COOKIE).ok_or(AuthError::Unauthenticated)?;

    let claims = auth::decode_token(token.value(), state.config.security.jwt_secret.as_deref())?;

    // Token claims are never authoritative: the account may have been edited
    // or deleted since the token was issued.
    let user = users::fetch_by_id(&state.db, claims.id).await.map_err(|e| {
        tracing::error!("Failed to load user {} during authentication: {}", claims.id, e);
        AuthError::ServerError
    })?;

    let user = user.ok_or_else(|| {
        tracing::warn!("Authenticated subject {} no longer exists", claims.id);
        AuthError::UserNotFound
    })?;

    Ok(Identity::from(user))
}

/// Privilege layer for administrative routes. Must run behind [`auth_gate`];
/// performs no I/O of its own.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AuthError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("require_admin reached without the auth gate in front of it");
            AuthError::Unauthenticated
        })?;

    if let Err(err) = identity.require_admin() {
        tracing::warn!(
            "User {} denied admin operation (role '{}')",
            identity.id,
            identity.role
        );
        return Err(err);
    }

    Ok(next.run(request).await)
}
