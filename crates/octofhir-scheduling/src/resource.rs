//! The slice of the FHIR R4 scheduling model this crate reads and writes.
//!
//! Only the elements the booking workflow touches are modelled. Unknown elements
//! in server responses are ignored on decode.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchedulingError};

/// A FHIR resource type that can be decoded from a search bundle.
pub trait FhirResource: Serialize + DeserializeOwned + Send {
    /// The `resourceType` discriminator, e.g. `"Slot"`.
    const RESOURCE_TYPE: &'static str;

    /// Logical id assigned by the server.
    fn id(&self) -> Option<&str>;

    /// Relative reference (`Type/id`) to this resource, if it has an id.
    fn reference(&self) -> Reference {
        Reference {
            reference: self.id().map(|id| format!("{}/{}", Self::RESOURCE_TYPE, id)),
            display: None,
        }
    }
}

/// Decode a raw resource, requiring its `resourceType` to match `R`.
///
/// Returns `Ok(None)` for resources of another type so bundles mixing in an
/// `OperationOutcome` still scan.
pub fn decode_resource<R: FhirResource>(value: Value) -> Result<Option<R>> {
    if value.get("resourceType").and_then(Value::as_str) != Some(R::RESOURCE_TYPE) {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| SchedulingError::decode(R::RESOURCE_TYPE, e))
}

/// Encode a resource as FHIR JSON with its `resourceType` member set.
pub fn encode_resource<R: FhirResource>(resource: &R) -> Result<Value> {
    let mut value = serde_json::to_value(resource)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "resourceType".to_string(),
            Value::String(R::RESOURCE_TYPE.to_string()),
        );
    }
    Ok(value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            display: None,
        }
    }

    /// Reference to `resource_type/id`.
    pub fn to(resource_type: &str, id: &str) -> Self {
        Self::new(format!("{resource_type}/{id}"))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reference, &self.display) {
            (Some(r), _) => write!(f, "{r}"),
            (None, Some(d)) => write!(f, "{d}"),
            (None, None) => write!(f, "(empty reference)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            value: value.into(),
        }
    }
}

/// A container of availability for one or more actors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Practitioners, locations and other actors this schedule provides slots for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actor: Vec<Reference>,
}

impl FhirResource for Schedule {
    const RESOURCE_TYPE: &'static str = "Schedule";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotStatus {
    Busy,
    Free,
    BusyUnavailable,
    BusyTentative,
    EnteredInError,
    #[serde(other)]
    Unknown,
}

/// A bookable interval on a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub schedule: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl Slot {
    pub fn is_free(&self) -> bool {
        self.status == Some(SlotStatus::Free)
    }
}

impl FhirResource for Slot {
    const RESOURCE_TYPE: &'static str = "Slot";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Patient {
    /// An absent `active` flag counts as inactive.
    pub fn is_active(&self) -> bool {
        self.active == Some(true)
    }
}

impl FhirResource for Patient {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Proposed,
    Pending,
    Booked,
    Arrived,
    Fulfilled,
    Cancelled,
    Noshow,
    EnteredInError,
    CheckedIn,
    Waitlist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationStatus {
    Accepted,
    Declined,
    Tentative,
    NeedsAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantRequired {
    Required,
    Optional,
    InformationOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentParticipant {
    pub actor: Reference,
    pub required: ParticipantRequired,
    pub status: ParticipationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slot: Vec<Reference>,
    pub participant: Vec<AppointmentParticipant>,
}

impl FhirResource for Appointment {
    const RESOURCE_TYPE: &'static str = "Appointment";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
