use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::SecurityConfig;
use crate::database::models::User;

pub mod password;

/// Cookie carrying the signed credential token.
pub const AUTH_COOKIE: &str = "auth_token";

/// The one privileged role recognized by the gate.
pub const ADMIN_ROLE: &str = "admin";

/// Baseline non-privileged role, assigned at registration and substituted
/// when a stored role is NULL.
pub const DEFAULT_ROLE: &str = "anggota";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub organization_name: Option<String>,
    pub role: String,
    pub profile_image: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            organization_name: user.organization_name.clone(),
            role: user
                .role
                .clone()
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            profile_image: user.profile_image.clone(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Authoritative, storage-sourced user attributes for the current request.
///
/// Built from a fresh `users` lookup after token verification, never from
/// token claims, so revoked or edited accounts take effect on the very next
/// request. Constructed per request and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub organization_name: Option<String>,
    pub role: String,
    pub profile_image: Option<String>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Privilege post-condition for administrative operations. No I/O.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            organization_name: user.organization_name,
            role: user.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            profile_image: user.profile_image,
        }
    }
}

/// Terminal outcomes of the auth gate. Each maps to exactly one HTTP status;
/// the display string is the verbatim client-facing message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No credential cookie presented.
    #[error("Tidak terautentikasi")]
    Unauthenticated,

    /// Credential present but failed verification: expired, tampered, or
    /// malformed.
    #[error("Sesi tidak valid")]
    InvalidSession,

    /// Credential verified but its subject no longer exists in storage.
    #[error("Pengguna tidak ditemukan")]
    UserNotFound,

    /// Identity resolved but lacks the required privilege.
    #[error("Tidak diizinkan melakukan operasi ini")]
    Forbidden,

    /// Signing secret missing from configuration. An operational error,
    /// kept distinct from any client credential problem.
    #[error("Terjadi kesalahan pada server")]
    ServerMisconfigured,

    /// Storage or infrastructure failure.
    #[error("Terjadi kesalahan pada server")]
    ServerError,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::ServerMisconfigured | AuthError::ServerError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the response must instruct the client to drop the stale
    /// cookie, so subsequent requests do not repeat the failed verification.
    pub fn clears_cookie(&self) -> bool {
        matches!(self, AuthError::InvalidSession)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "message": self.to_string() }));
        if self.clears_cookie() {
            (status, CookieJar::new().add(removal_cookie()), body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<AuthError> for crate::error::ApiError {
    fn from(err: AuthError) -> Self {
        use crate::error::ApiError;
        let message = err.to_string();
        match err {
            AuthError::Unauthenticated | AuthError::InvalidSession => {
                ApiError::unauthorized(message)
            }
            AuthError::Forbidden => ApiError::forbidden(message),
            AuthError::UserNotFound => ApiError::not_found(message),
            AuthError::ServerMisconfigured | AuthError::ServerError => {
                ApiError::internal_server_error(message)
            }
        }
    }
}

/// Sign a credential token.
pub fn issue_token(claims: &Claims, secret: Option<&str>) -> Result<String, AuthError> {
    let secret = secret.ok_or_else(|| {
        tracing::error!("JWT secret is not configured; cannot issue tokens");
        AuthError::ServerMisconfigured
    })?;

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign credential token: {}", e);
        AuthError::ServerError
    })
}

/// Verify a credential token's signature and expiry, and decode its claims.
///
/// The missing-secret check runs before any signature work: a misconfigured
/// server must never be reported to the client as an invalid credential.
pub fn decode_token(token: &str, secret: Option<&str>) -> Result<Claims, AuthError> {
    let secret = secret.ok_or_else(|| {
        tracing::error!("JWT secret is not configured; cannot verify tokens");
        AuthError::ServerMisconfigured
    })?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("Credential token rejected: {}", e);
        AuthError::InvalidSession
    })
}

/// Session cookie carrying the signed token. HttpOnly; its lifetime matches
/// the token expiry so the browser drops both together.
pub fn session_cookie(token: String, security: &SecurityConfig) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(security.cookie_secure);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::hours(security.jwt_expiry_hours as i64));
    cookie
}

/// Cookie-removal instruction for the credential cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::SET_COOKIE;

    const SECRET: &str = "unit-test-secret";

    fn sample_user() -> User {
        User {
            id: 42,
            name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            organization_name: Some("Himpunan Mahasiswa".to_string()),
            role: Some("ketua_himpunan".to_string()),
            profile_image: None,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let claims = Claims::new(&sample_user(), 24);
        let token = issue_token(&claims, Some(SECRET)).unwrap();
        let decoded = decode_token(&token, Some(SECRET)).unwrap();

        assert_eq!(decoded.id, 42);
        assert_eq!(decoded.email, "budi@example.com");
        assert_eq!(decoded.role, "ketua_himpunan");
    }

    #[test]
    fn decode_is_deterministic_for_same_token() {
        let claims = Claims::new(&sample_user(), 24);
        let token = issue_token(&claims, Some(SECRET)).unwrap();

        let first = decode_token(&token, Some(SECRET)).unwrap();
        let second = decode_token(&token, Some(SECRET)).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.exp, second.exp);
        assert_eq!(first.role, second.role);
    }

    #[test]
    fn wrong_secret_is_invalid_session() {
        let claims = Claims::new(&sample_user(), 24);
        let token = issue_token(&claims, Some("other-secret")).unwrap();

        assert_eq!(
            decode_token(&token, Some(SECRET)).unwrap_err(),
            AuthError::InvalidSession
        );
    }

    #[test]
    fn tampered_token_is_invalid_session() {
        let claims = Claims::new(&sample_user(), 24);
        let mut token = issue_token(&claims, Some(SECRET)).unwrap();
        token.push('x');

        assert_eq!(
            decode_token(&token, Some(SECRET)).unwrap_err(),
            AuthError::InvalidSession
        );
    }

    #[test]
    fn garbage_token_is_invalid_session() {
        assert_eq!(
            decode_token("not-a-jwt", Some(SECRET)).unwrap_err(),
            AuthError::InvalidSession
        );
    }

    #[test]
    fn expired_token_is_invalid_session() {
        let mut claims = Claims::new(&sample_user(), 24);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = issue_token(&claims, Some(SECRET)).unwrap();

        assert_eq!(
            decode_token(&token, Some(SECRET)).unwrap_err(),
            AuthError::InvalidSession
        );
    }

    #[test]
    fn missing_secret_is_misconfiguration_not_invalid_session() {
        let claims = Claims::new(&sample_user(), 24);
        let token = issue_token(&claims, Some(SECRET)).unwrap();

        assert_eq!(
            decode_token(&token, None).unwrap_err(),
            AuthError::ServerMisconfigured
        );
        assert_eq!(
            issue_token(&claims, None).unwrap_err(),
            AuthError::ServerMisconfigured
        );
    }

    #[test]
    fn claims_default_null_role_at_issue() {
        let mut user = sample_user();
        user.role = None;
        let claims = Claims::new(&user, 24);
        assert_eq!(claims.role, DEFAULT_ROLE);
    }

    #[test]
    fn identity_defaults_null_role() {
        let mut user = sample_user();
        user.role = None;
        let identity = Identity::from(user);
        assert_eq!(identity.role, DEFAULT_ROLE);
        assert!(!identity.is_admin());
    }

    #[test]
    fn identity_reflects_storage_not_claims() {
        // Token claims say admin, but the re-fetched row has been demoted:
        // the identity the gate hands out must follow the row.
        let mut issued_for = sample_user();
        issued_for.role = Some(ADMIN_ROLE.to_string());
        let claims = Claims::new(&issued_for, 24);
        assert_eq!(claims.role, ADMIN_ROLE);

        let mut current_row = sample_user();
        current_row.role = Some("anggota".to_string());
        let identity = Identity::from(current_row);

        assert_eq!(identity.role, "anggota");
        assert!(identity.require_admin().is_err());
    }

    #[test]
    fn require_admin_rejects_every_non_admin_role() {
        for role in ["anggota", "ketua_himpunan", "kepala_departemen"] {
            let mut user = sample_user();
            user.role = Some(role.to_string());
            let identity = Identity::from(user);
            assert_eq!(identity.require_admin().unwrap_err(), AuthError::Forbidden);
        }

        let mut user = sample_user();
        user.role = Some(ADMIN_ROLE.to_string());
        assert!(Identity::from(user).require_admin().is_ok());
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(AuthError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidSession.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::ServerMisconfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AuthError::ServerError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_session_response_clears_cookie() {
        let response = AuthError::InvalidSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("invalid session must instruct cookie removal")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(&format!("{}=", AUTH_COOKIE)));
        assert!(set_cookie.contains("Expires="));
    }

    #[test]
    fn other_failures_do_not_touch_cookies() {
        for err in [
            AuthError::Unauthenticated,
            AuthError::UserNotFound,
            AuthError::Forbidden,
            AuthError::ServerMisconfigured,
            AuthError::ServerError,
        ] {
            let response = err.into_response();
            assert!(response.headers().get(SET_COOKIE).is_none());
        }
    }

    #[test]
    fn session_cookie_is_http_only_and_scoped() {
        let security = SecurityConfig {
            jwt_secret: Some(SECRET.to_string()),
            jwt_expiry_hours: 24 * 7,
            cookie_secure: true,
        };
        let cookie = session_cookie("token-value".to_string(), &security);

        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24 * 7)));
    }
}
