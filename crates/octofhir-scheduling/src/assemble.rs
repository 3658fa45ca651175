use crate::resource::{
    Appointment, AppointmentParticipant, AppointmentStatus, FhirResource, Identifier,
    ParticipantRequired, ParticipationStatus, Patient, Reference, Slot,
};

/// Builds a proposed appointment for `patient` in `slot`.
///
/// `actors` are the actors of the schedule owning the slot. They become
/// participants in the given order and the patient is appended last, so the
/// result always has `actors.len() + 1` participants. Every participant is
/// required and needs action.
pub fn assemble_appointment(
    identifier: &Identifier,
    slot: &Slot,
    actors: &[Reference],
    patient: &Patient,
) -> Appointment {
    let participant = actors
        .iter()
        .cloned()
        .chain(std::iter::once(patient.reference()))
        .map(|actor| AppointmentParticipant {
            actor,
            required: ParticipantRequired::Required,
            status: ParticipationStatus::NeedsAction,
        })
        .collect();

    Appointment {
        id: None,
        identifier: vec![identifier.clone()],
        status: AppointmentStatus::Proposed,
        slot: vec![slot.reference()],
        participant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::SlotStatus;

    fn slot() -> Slot {
        Slot {
            id: Some("slot-1".into()),
            schedule: Reference::to("Schedule", "sch-1"),
            status: Some(SlotStatus::Free),
            start: None,
            end: None,
        }
    }

    fn patient() -> Patient {
        Patient {
            id: Some("pat-1".into()),
            active: Some(true),
        }
    }

    fn identifier() -> Identifier {
        Identifier::new("urn:system", "12345")
    }

    #[test]
    fn test_two_actors_and_a_patient() {
        let actors = vec![
            Reference::to("Practitioner", "doc-1"),
            Reference::to("Location", "room-1"),
        ];

        let appointment = assemble_appointment(&identifier(), &slot(), &actors, &patient());

        assert_eq!(appointment.status, AppointmentStatus::Proposed);
        assert_eq!(appointment.identifier, vec![identifier()]);
        assert_eq!(appointment.slot, vec![Reference::new("Slot/slot-1")]);
        assert_eq!(appointment.participant.len(), 3);
        for p in &appointment.participant {
            assert_eq!(p.status, ParticipationStatus::NeedsAction);
            assert_eq!(p.required, ParticipantRequired::Required);
        }
        let refs: Vec<_> = appointment
            .participant
            .iter()
            .map(|p| p.actor.reference.as_deref().unwrap())
            .collect();
        assert_eq!(refs, ["Practitioner/doc-1", "Location/room-1", "Patient/pat-1"]);
    }

    #[test]
    fn test_participant_count_tracks_actor_count() {
        for n in 0..6 {
            let actors: Vec<_> = (0..n)
                .map(|i| Reference::to("Practitioner", &format!("doc-{i}")))
                .collect();
            let appointment = assemble_appointment(&identifier(), &slot(), &actors, &patient());
            assert_eq!(appointment.participant.len(), n + 1);
            assert_eq!(
                appointment.participant.last().unwrap().actor,
                Reference::new("Patient/pat-1")
            );
        }
    }

    #[test]
    fn test_actor_order_is_preserved() {
        let forward = vec![
            Reference::to("Location", "b"),
            Reference::to("Practitioner", "a"),
            Reference::to("Practitioner", "c"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = assemble_appointment(&identifier(), &slot(), &forward, &patient());
        let b = assemble_appointment(&identifier(), &slot(), &reversed, &patient());

        let actors_of = |appt: &Appointment| -> Vec<Reference> {
            appt.participant[..appt.participant.len() - 1]
                .iter()
                .map(|p| p.actor.clone())
                .collect()
        };
        assert_eq!(actors_of(&a), forward);
        assert_eq!(actors_of(&b), reversed);
    }

    #[test]
    fn test_assembly_is_repeatable() {
        let actors = vec![Reference::to("Practitioner", "doc-1")];
        let first = assemble_appointment(&identifier(), &slot(), &actors, &patient());
        let second = assemble_appointment(&identifier(), &slot(), &actors, &patient());
        assert_eq!(first, second);
    }

    #[test]
    fn test_actor_display_is_kept() {
        let actor = Reference {
            reference: Some("Practitioner/doc-1".into()),
            display: Some("Dr. Adams".into()),
        };
        let appointment =
            assemble_appointment(&identifier(), &slot(), std::slice::from_ref(&actor), &patient());
        assert_eq!(appointment.participant[0].actor, actor);
    }
}
