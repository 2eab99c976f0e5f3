use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public projection of a `users` row. The password column never leaves the
/// database module; see `users::AuthRecord` for the login-time lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub organization_name: Option<String>,
    /// NULL for legacy rows; defaulted at identity resolution, nowhere else.
    pub role: Option<String>,
    pub profile_image: Option<String>,
}
