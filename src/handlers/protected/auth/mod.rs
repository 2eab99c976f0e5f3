pub mod account;
pub mod session;

pub use account::{password_put, profile_put};
pub use session::me_get;
