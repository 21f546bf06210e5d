// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure, including timeouts and undecodable bodies.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope or a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success envelope arrived without the `data` it should carry.
    #[error("response from {0} carried no data")]
    MissingData(&'static str),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTP status reported by the server, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            GatewayError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
