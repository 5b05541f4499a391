pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::Error;
