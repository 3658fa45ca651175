//! Error types for talking to a FHIR scheduling server.
//!
//! A scan that finds nothing is not an error: finders return `Ok(None)` and the
//! workflow reports it as an explicit outcome. Everything here is fatal for the
//! current run.

use thiserror::Error;

/// Errors raised while searching, paging or creating resources.
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Failed to connect to server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A bundle entry claimed a resource type but did not decode as one.
    #[error("Invalid {resource_type} resource: {source}")]
    Decode {
        resource_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The create call succeeded but neither the body nor the headers named the new id.
    #[error("Server did not report an id for the created {resource_type}")]
    MissingAssignedId { resource_type: String },
}

impl SchedulingError {
    /// Create a new Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new Decode error
    pub fn decode(resource_type: &'static str, source: serde_json::Error) -> Self {
        Self::Decode {
            resource_type,
            source,
        }
    }

    /// Create a new MissingAssignedId error
    pub fn missing_assigned_id(resource_type: impl Into<String>) -> Self {
        Self::MissingAssignedId {
            resource_type: resource_type.into(),
        }
    }

    /// Check if the server rejected the request (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if (400..500).contains(status))
    }

    /// Check if the server failed while handling the request (5xx)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status >= 500)
    }
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
