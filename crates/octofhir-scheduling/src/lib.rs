//! Free-slot search and appointment booking against a FHIR R4 server.
//!
//! The workflow scans `Schedule` search results for one with a free `Slot`,
//! picks the first active `Patient`, assembles a proposed `Appointment` and
//! creates it on the server. All server access goes through [`FhirGateway`];
//! [`FhirClient`] is the `reqwest` implementation.

pub mod assemble;
pub mod bundle;
pub mod client;
pub mod error;
pub mod finder;
pub mod gateway;
pub mod pager;
pub mod resource;
pub mod scan;
pub mod submit;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use assemble::assemble_appointment;
pub use bundle::{Bundle, Page};
pub use client::FhirClient;
pub use error::{Result, SchedulingError};
pub use finder::{
    FreeSchedule, ScanOptions, first_active_patient, first_free_schedule, first_free_slot,
};
pub use gateway::{CreatedResource, FhirGateway, SearchQuery};
pub use pager::pages;
pub use resource::{
    Appointment, AppointmentParticipant, AppointmentStatus, FhirResource, Identifier,
    ParticipantRequired, ParticipationStatus, Patient, Reference, Schedule, Slot, SlotStatus,
};
pub use scan::{NoopObserver, ScanObserver, TracingObserver, find_map_first, first_match};
pub use submit::submit_appointment;
pub use workflow::{Booking, BookingOutcome, BookingPlan, BookingWorkflow, PreparedBooking};
