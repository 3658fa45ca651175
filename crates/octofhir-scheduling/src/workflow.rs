//! Find a free slot, pick a patient, propose an appointment.
//!
//! Steps run strictly one after another: schedule scan (with a nested slot scan
//! per candidate), patient scan, assembly, then create. A scan that comes back
//! empty stops the run with an explicit outcome instead of an error.

use std::sync::Arc;

use crate::assemble::assemble_appointment;
use crate::error::Result;
use crate::finder::{FreeSchedule, ScanOptions, first_active_patient, first_free_schedule};
use crate::gateway::{CreatedResource, FhirGateway};
use crate::resource::{Appointment, Identifier, Patient, Schedule, Slot};
use crate::scan::{ScanObserver, TracingObserver};
use crate::submit::submit_appointment;

/// Everything selected for a booking, plus the appointment built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBooking {
    pub schedule: Schedule,
    pub slot: Slot,
    pub patient: Patient,
    pub appointment: Appointment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingPlan {
    Ready(Box<PreparedBooking>),
    /// No schedule on the server has a free slot.
    NoFreeSchedule,
    /// A free slot exists but no patient is active.
    NoActivePatient,
}

/// A created appointment and what it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub created: CreatedResource,
    pub prepared: PreparedBooking,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Box<Booking>),
    NoFreeSchedule,
    NoActivePatient,
}

pub struct BookingWorkflow<'a, G: FhirGateway + ?Sized> {
    gateway: &'a G,
    identifier: Identifier,
    options: ScanOptions,
    observer: Arc<dyn ScanObserver>,
}

impl<'a, G: FhirGateway + ?Sized> BookingWorkflow<'a, G> {
    /// Workflow stamping `identifier` on the appointment it creates.
    pub fn new(gateway: &'a G, identifier: Identifier) -> Self {
        Self {
            gateway,
            identifier,
            options: ScanOptions::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Runs the searches and assembles the appointment without submitting it.
    pub async fn plan(&self) -> Result<BookingPlan> {
        let observer = self.observer.as_ref();

        let Some(FreeSchedule { schedule, slot }) =
            first_free_schedule(self.gateway, &self.options, observer).await?
        else {
            return Ok(BookingPlan::NoFreeSchedule);
        };
        tracing::info!(
            schedule = schedule.id.as_deref().unwrap_or("-"),
            slot = slot.id.as_deref().unwrap_or("-"),
            "Selected free slot"
        );

        let Some(patient) = first_active_patient(self.gateway, &self.options, observer).await?
        else {
            return Ok(BookingPlan::NoActivePatient);
        };
        tracing::info!(patient = patient.id.as_deref().unwrap_or("-"), "Selected active patient");

        let appointment = assemble_appointment(&self.identifier, &slot, &schedule.actor, &patient);
        for participant in &appointment.participant {
            tracing::debug!(actor = %participant.actor, "Participant added");
        }

        Ok(BookingPlan::Ready(Box::new(PreparedBooking {
            schedule,
            slot,
            patient,
            appointment,
        })))
    }

    /// Plans and, when something bookable was found, submits the appointment.
    pub async fn book(&self) -> Result<BookingOutcome> {
        let prepared = match self.plan().await? {
            BookingPlan::Ready(prepared) => *prepared,
            BookingPlan::NoFreeSchedule => return Ok(BookingOutcome::NoFreeSchedule),
            BookingPlan::NoActivePatient => return Ok(BookingOutcome::NoActivePatient),
        };
        let created = submit_appointment(self.gateway, &prepared.appointment).await?;
        Ok(BookingOutcome::Booked(Box::new(Booking { created, prepared })))
    }
}
