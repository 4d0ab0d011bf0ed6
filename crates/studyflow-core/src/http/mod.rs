//! Outbound API access through the session gateway

mod client;
mod request;
mod transport;

pub use client::ApiClient;
pub use request::{ApiRequest, ApiResponse};
pub(crate) use transport::build_http_client;
