use crate::error::Result;
use crate::gateway::{CreatedResource, FhirGateway};
use crate::resource::{Appointment, FhirResource, encode_resource};

/// Creates `appointment` on the server. No retry; a failed create is returned as is.
pub async fn submit_appointment<G>(gateway: &G, appointment: &Appointment) -> Result<CreatedResource>
where
    G: FhirGateway + ?Sized,
{
    let body = encode_resource(appointment)?;
    let created = gateway.create(Appointment::RESOURCE_TYPE, &body).await?;
    tracing::info!(
        id = %created.id,
        version = created.version_id.as_deref().unwrap_or("-"),
        "Appointment created"
    );
    Ok(created)
}
