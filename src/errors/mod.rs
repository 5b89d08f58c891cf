//! Error handling for drift-watch.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod spec_error;
pub mod store_error;
pub mod watch_error;

pub use spec_error::SpecError;
pub use store_error::StoreError;
pub use watch_error::WatchError;
