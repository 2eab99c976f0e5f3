// Handlers behind the auth gate. Every handler here can rely on an
// `Identity` extension injected by the gate middleware; the admin layer is
// applied per-route where noted.
pub mod auth;
pub mod departments;
pub mod organizations;
pub mod stats;
pub mod users;
