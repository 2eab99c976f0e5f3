use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Organization row joined with its member and program counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub department: Option<String>,
    pub logo: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub members: i64,
    pub programs: i64,
}
