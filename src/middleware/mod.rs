pub mod auth;

pub use auth::{auth_gate, require_admin, verify};
