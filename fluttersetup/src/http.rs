//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{SetupError, SetupResult};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("flutter-setup/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client. `None` disables the request timeout.
pub fn build_client(timeout: Option<Duration>) -> SetupResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SetupError::HttpClient(e.to_string()))
}
