//! Search result bundles and the typed pages decoded from them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::{FhirResource, decode_resource};

pub const LINK_NEXT: &str = "next";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

/// A `searchset` bundle as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == relation)
            .map(|l| l.url.as_str())
    }

    /// Continuation URL, if the server has more results.
    pub fn next_link(&self) -> Option<&str> {
        self.link(LINK_NEXT)
    }
}

/// One page of decoded search results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T: FhirResource> Page<T> {
    /// Decode the entries of `bundle`, keeping bundle order.
    ///
    /// Entries without a resource, holding a different resource type, or
    /// failing to decode as `T` are dropped. A malformed entry never hides the
    /// entries after it.
    pub fn from_bundle(bundle: Bundle) -> Self {
        let next = bundle.next_link().map(str::to_owned);
        let mut items = Vec::with_capacity(bundle.entry.len());
        for entry in bundle.entry {
            let Some(resource) = entry.resource else {
                continue;
            };
            match decode_resource::<T>(resource) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(error) => tracing::warn!(
                    resource_type = T::RESOURCE_TYPE,
                    full_url = entry.full_url.as_deref().unwrap_or("-"),
                    %error,
                    "Skipping entry that does not decode"
                ),
            }
        }
        Self { items, next }
    }
}
