//! The three searches the booking workflow runs.

use crate::error::{Result, SchedulingError};
use crate::gateway::{FhirGateway, SearchQuery};
use crate::pager::pages;
use crate::resource::{FhirResource, Patient, Schedule, Slot};
use crate::scan::{ScanObserver, find_map_first, first_match};

/// Settings shared by every search in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Sent as `_count`; `None` leaves the page size to the server.
    pub page_size: Option<u32>,
}

/// A schedule together with the free slot that qualified it.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeSchedule {
    pub schedule: Schedule,
    pub slot: Slot,
}

/// First slot with status `free` on the schedule with id `schedule_id`.
///
/// Slots without an id are passed over since the appointment must reference one.
pub async fn first_free_slot<G>(
    gateway: &G,
    schedule_id: &str,
    options: &ScanOptions,
    observer: &dyn ScanObserver,
) -> Result<Option<Slot>>
where
    G: FhirGateway + ?Sized,
{
    let query = SearchQuery::new(Slot::RESOURCE_TYPE)
        .with_param("schedule", format!("{}/{}", Schedule::RESOURCE_TYPE, schedule_id))
        .with_count(options.page_size);
    first_match(pages::<G, Slot>(gateway, query), observer, |slot: &Slot| {
        slot.id.is_some() && slot.is_free()
    })
    .await
}

/// First schedule that has at least one free slot, with that slot.
///
/// Every candidate schedule runs its own slot scan, so the worst case costs
/// one request per schedule page plus one per slot page of each schedule.
pub async fn first_free_schedule<G>(
    gateway: &G,
    options: &ScanOptions,
    observer: &dyn ScanObserver,
) -> Result<Option<FreeSchedule>>
where
    G: FhirGateway + ?Sized,
{
    let query = SearchQuery::new(Schedule::RESOURCE_TYPE).with_count(options.page_size);
    find_map_first(
        pages::<G, Schedule>(gateway, query),
        observer,
        move |schedule: Schedule| async move {
            let Some(id) = schedule.id.clone() else {
                tracing::debug!("Skipping schedule without id");
                return Ok(None);
            };
            let slot = first_free_slot(gateway, &id, options, observer).await?;
            Ok::<_, SchedulingError>(slot.map(|slot| FreeSchedule { schedule, slot }))
        },
    )
    .await
}

/// First patient with an id whose `active` flag is `true`.
pub async fn first_active_patient<G>(
    gateway: &G,
    options: &ScanOptions,
    observer: &dyn ScanObserver,
) -> Result<Option<Patient>>
where
    G: FhirGateway + ?Sized,
{
    let query = SearchQuery::new(Patient::RESOURCE_TYPE).with_count(options.page_size);
    first_match(pages::<G, Patient>(gateway, query), observer, |patient: &Patient| {
        patient.id.is_some() && patient.is_active()
    })
    .await
}
