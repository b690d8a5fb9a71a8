//! Clients - HTTP client for the back-office REST API

pub mod api_client;

pub use api_client::{item_path, list_body, ApiClient, RestTransport};
