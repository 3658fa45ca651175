//! In-memory gateway for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::bundle::Bundle;
use crate::error::SchedulingError;
use crate::gateway::{CreatedResource, FhirGateway, SearchQuery};

/// Searchset bundle holding `resources`, with an optional `next` link.
pub fn bundle_of(resources: Vec<Value>, next: Option<&str>) -> Bundle {
    let mut value = json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "entry": resources.into_iter().map(|r| json!({ "resource": r })).collect::<Vec<_>>(),
    });
    if let Some(url) = next {
        value["link"] = json!([{ "relation": "next", "url": url }]);
    }
    serde_json::from_value(value).expect("valid bundle")
}

/// Stub keyed by `Type` or `Type?name=value` (ignoring `_count`) and by page URL.
#[derive(Default)]
pub struct StubGateway {
    searches: HashMap<String, Bundle>,
    pages: HashMap<String, Bundle>,
    assigned_id: Option<String>,
    requests: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, Value)>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, key: &str, bundle: Bundle) -> Self {
        self.searches.insert(key.to_string(), bundle);
        self
    }

    pub fn with_page(mut self, url: &str, bundle: Bundle) -> Self {
        self.pages.insert(url.to_string(), bundle);
        self
    }

    pub fn with_assigned_id(mut self, id: &str) -> Self {
        self.assigned_id = Some(id.to_string());
        self
    }

    /// Searches and page fetches issued so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().unwrap().clone()
    }

    fn search_key(query: &SearchQuery) -> String {
        let params: Vec<String> = query
            .params
            .iter()
            .filter(|(name, _)| name != "_count")
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        if params.is_empty() {
            query.resource_type.clone()
        } else {
            format!("{}?{}", query.resource_type, params.join("&"))
        }
    }
}

#[async_trait]
impl FhirGateway for StubGateway {
    async fn search(&self, query: &SearchQuery) -> Result<Bundle, SchedulingError> {
        let key = Self::search_key(query);
        self.requests.lock().unwrap().push(key.clone());
        self.searches
            .get(&key)
            .cloned()
            .ok_or_else(|| SchedulingError::http(404, format!("no stub for {key}")))
    }

    async fn fetch_page(&self, url: &str) -> Result<Bundle, SchedulingError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| SchedulingError::http(404, format!("no stub for {url}")))
    }

    async fn create(
        &self,
        resource_type: &str,
        body: &Value,
    ) -> Result<CreatedResource, SchedulingError> {
        self.created
            .lock()
            .unwrap()
            .push((resource_type.to_string(), body.clone()));
        let id = self
            .assigned_id
            .clone()
            .ok_or_else(|| SchedulingError::http(500, "create not stubbed"))?;
        Ok(CreatedResource {
            resource_type: resource_type.to_string(),
            id,
            version_id: Some("1".to_string()),
        })
    }
}
