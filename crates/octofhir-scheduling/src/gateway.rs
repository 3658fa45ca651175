//! The seam between the booking workflow and a FHIR REST server.

use async_trait::async_trait;
use serde_json::Value;

use crate::bundle::Bundle;
use crate::error::SchedulingError;

/// A type-level search (`GET [base]/[type]?params`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub resource_type: String,
    pub params: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Adds `_count` when a page size is given.
    pub fn with_count(self, count: Option<u32>) -> Self {
        match count {
            Some(c) => self.with_param("_count", c.to_string()),
            None => self,
        }
    }
}

/// What the server reported back for a create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedResource {
    pub resource_type: String,
    pub id: String,
    pub version_id: Option<String>,
}

impl CreatedResource {
    pub fn reference(&self) -> String {
        format!("{}/{}", self.resource_type, self.id)
    }
}

/// Operations the booking workflow needs from a FHIR server.
///
/// Calls are awaited one at a time; implementations do not need to support
/// concurrent use beyond `Send + Sync`.
#[async_trait]
pub trait FhirGateway: Send + Sync {
    /// Runs a search and returns the first page of results.
    async fn search(&self, query: &SearchQuery) -> Result<Bundle, SchedulingError>;

    /// Follows a continuation link from a previous page.
    async fn fetch_page(&self, url: &str) -> Result<Bundle, SchedulingError>;

    /// Creates a resource and returns the id the server assigned.
    ///
    /// The body is sent as pretty-printed FHIR JSON.
    async fn create(
        &self,
        resource_type: &str,
        body: &Value,
    ) -> Result<CreatedResource, SchedulingError>;
}
