use async_trait::async_trait;
use reqwest::header::{CONTENT_LOCATION, HeaderMap, LOCATION};
use serde_json::Value;
use url::Url;

use crate::bundle::Bundle;
use crate::error::{Result, SchedulingError};
use crate::gateway::{CreatedResource, FhirGateway, SearchQuery};

const FHIR_JSON: &str = "application/fhir+json";

/// FHIR REST client over `reqwest`.
pub struct FhirClient {
    http: reqwest::Client,
    base_url: String,
}

impl FhirClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fhir_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Resolves a continuation link; servers normally return absolute URLs.
    fn resolve_link(&self, link: &str) -> Result<Url> {
        match Url::parse(link) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&format!("{}/", self.base_url))?;
                Ok(base.join(link.trim_start_matches('/'))?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        tracing::debug!(method = method.as_str(), url, "FHIR request");
        self.http.request(method, url).header("Accept", FHIR_JSON)
    }
}

#[async_trait]
impl FhirGateway for FhirClient {
    async fn search(&self, query: &SearchQuery) -> Result<Bundle> {
        let url = self.fhir_url(&query.resource_type);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .query(&query.params)
            .send()
            .await?;
        let (_, body) = handle_response(resp).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_page(&self, url: &str) -> Result<Bundle> {
        let url = self.resolve_link(url)?;
        let resp = self
            .request(reqwest::Method::GET, url.as_str())
            .send()
            .await?;
        let (_, body) = handle_response(resp).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn create(&self, resource_type: &str, body: &Value) -> Result<CreatedResource> {
        let url = self.fhir_url(resource_type);
        let payload = serde_json::to_vec_pretty(body)?;
        let resp = self
            .request(reqwest::Method::POST, &url)
            .query(&[("_pretty", "true")])
            .header("Content-Type", FHIR_JSON)
            .body(payload)
            .send()
            .await?;
        let (headers, created) = handle_response(resp).await?;
        assigned_id(resource_type, &headers, &created)
            .ok_or_else(|| SchedulingError::missing_assigned_id(resource_type))
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<(HeaderMap, Value)> {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.text().await?;

    if !status.is_success() {
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && json.get("resourceType").and_then(|v| v.as_str()) == Some("OperationOutcome")
            && let Some(issues) = json.get("issue").and_then(|v| v.as_array())
        {
            let msgs: Vec<&str> = issues
                .iter()
                .filter_map(|i| i.get("diagnostics").and_then(|d| d.as_str()))
                .collect();
            if !msgs.is_empty() {
                return Err(SchedulingError::http(status.as_u16(), msgs.join("; ")));
            }
        }
        return Err(SchedulingError::http(status.as_u16(), body));
    }

    if body.trim().is_empty() {
        return Ok((headers, Value::Null));
    }

    Ok((headers, serde_json::from_str(&body)?))
}

/// Id from the returned resource, falling back to `Location` / `Content-Location`.
fn assigned_id(resource_type: &str, headers: &HeaderMap, body: &Value) -> Option<CreatedResource> {
    if let Some(id) = body.get("id").and_then(Value::as_str) {
        let version_id = body
            .get("meta")
            .and_then(|m| m.get("versionId"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        return Some(CreatedResource {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
            version_id,
        });
    }

    [LOCATION, CONTENT_LOCATION]
        .iter()
        .filter_map(|name| headers.get(name).and_then(|v| v.to_str().ok()))
        .find_map(|location| parse_location(resource_type, location))
}

/// Parses `[base]/[type]/[id](/_history/[vid])`.
fn parse_location(resource_type: &str, location: &str) -> Option<CreatedResource> {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let type_pos = segments.iter().rposition(|s| *s == resource_type)?;
    let id = segments.get(type_pos + 1)?;
    if id.starts_with('_') {
        return None;
    }
    let version_id = match (segments.get(type_pos + 2), segments.get(type_pos + 3)) {
        (Some(&"_history"), Some(v)) => Some(v.to_string()),
        _ => None,
    };
    Some(CreatedResource {
        resource_type: resource_type.to_string(),
        id: id.to_string(),
        version_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_parse_location_with_history() {
        let created = parse_location(
            "Appointment",
            "https://hapi.fhir.org/baseR4/Appointment/4417/_history/1",
        )
        .unwrap();
        assert_eq!(created.id, "4417");
        assert_eq!(created.version_id.as_deref(), Some("1"));
        assert_eq!(created.reference(), "Appointment/4417");
    }

    #[test]
    fn test_parse_location_relative_without_version() {
        let created = parse_location("Appointment", "Appointment/abc").unwrap();
        assert_eq!(created.id, "abc");
        assert!(created.version_id.is_none());

        assert!(parse_location("Appointment", "Patient/abc").is_none());
        assert!(parse_location("Appointment", "http://x/Appointment/_history").is_none());
    }

    #[test]
    fn test_assigned_id_prefers_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LOCATION,
            HeaderValue::from_static("http://x/Appointment/from-header/_history/3"),
        );
        let body = json!({ "resourceType": "Appointment", "id": "from-body", "meta": { "versionId": "1" } });
        let created = assigned_id("Appointment", &headers, &body).unwrap();
        assert_eq!(created.id, "from-body");
        assert_eq!(created.version_id.as_deref(), Some("1"));

        let created = assigned_id("Appointment", &headers, &Value::Null).unwrap();
        assert_eq!(created.id, "from-header");
        assert_eq!(created.version_id.as_deref(), Some("3"));

        assert!(assigned_id("Appointment", &HeaderMap::new(), &Value::Null).is_none());
    }

    #[test]
    fn test_resolve_relative_link() {
        let client = FhirClient::new("http://fhir.test/baseR4/");
        assert_eq!(client.base_url(), "http://fhir.test/baseR4");
        let url = client.resolve_link("?_getpages=abc&_getpagesoffset=20").unwrap();
        assert_eq!(
            url.as_str(),
            "http://fhir.test/baseR4/?_getpages=abc&_getpagesoffset=20"
        );
        let url = client.resolve_link("http://other.test/page/2").unwrap();
        assert_eq!(url.as_str(), "http://other.test/page/2");
    }
}
