pub mod list;
pub mod record;

pub use list::list_get;
pub use record::{record_delete, record_get, record_put};
