//! Queries against the `users` table, shared by the auth gate and the user
//! management handlers. Every lookup is a single parameterized round trip.

use sqlx::{FromRow, PgPool};

use super::models::User;

/// Login-time row: the only projection that carries the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct AuthRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub organization_name: Option<String>,
    pub role: Option<String>,
    pub profile_image: Option<String>,
    pub password: String,
}

impl AuthRecord {
    /// Drop the password hash before the record crosses the API boundary.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            organization_name: self.organization_name,
            role: self.role,
            profile_image: self.profile_image,
        }
    }
}

/// Authoritative lookup by subject id, used by the gate after token
/// verification. Returns current storage state, never token claims.
pub async fn fetch_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, organization_name, role, profile_image FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_auth_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AuthRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuthRecord>(
        "SELECT id, name, email, organization_name, role, profile_image, password \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_password_hash(pool: &PgPool, id: i64) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT password FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(password,)| password))
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Whether `email` already belongs to a user other than `id`.
pub async fn email_taken_by_other(
    pool: &PgPool,
    email: &str,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 AND id != $2")
            .bind(email)
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn insert(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    organization_name: &str,
    role: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO users (name, email, password, organization_name, role, created_at) \
         VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(organization_name)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Users visible to the caller: their organization when they have one,
/// otherwise the full directory, name-ordered either way.
pub async fn list_for_organization(
    pool: &PgPool,
    organization_name: Option<&str>,
) -> Result<Vec<User>, sqlx::Error> {
    match organization_name {
        Some(org) => {
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, organization_name, role, profile_image \
                 FROM users WHERE organization_name = $1 ORDER BY name ASC",
            )
            .bind(org)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, organization_name, role, profile_image \
                 FROM users ORDER BY name ASC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    name: &str,
    email: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
        .bind(name)
        .bind(email)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn update_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
