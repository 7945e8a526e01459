/// Shared building blocks for the Daybook crates.
pub mod config;
pub mod errors;
pub mod models;
pub mod store;

pub use config::Settings;
pub use errors::{FetchError, StoreError};
