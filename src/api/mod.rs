// API module for the open-data portal client
// Author: Gabriel Demetrios Lafis

mod client;
mod models;

pub use client::*;
pub use models::*;

use thiserror::Error;

/// Represents an error in the API module
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("unknown or unconfigured resource: {0}")]
    UnknownResource(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
