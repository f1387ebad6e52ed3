use chrono::Utc;

use crate::{
    domain::{
        error::DomainError,
        models::{
            event::{EventCapacity, EventId},
            monitoring_event::MonitoringEvent,
            participant::ParticipantId,
            registration::{NewRegistration, Registration, RegistrationId},
        },
        repositories::{
            event_repository::EventRepository, participant_repository::ParticipantRepository,
            registration_repository::RegistrationRepository,
        },
        services::{identity_service::UserId, monitoring_service::MonitoringPublisher},
    },
    usecase::event_lock::EventLocks,
};

/// Admission, waitlist and check-in of event registrations.
///
/// The waitlist of an event is the set of its `waiting` registrations ordered
/// by `registered_at`; no separate queue is kept.
pub struct RegistrationUsecase<
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
> {
    event_repository: E,
    participant_repository: P,
    registration_repository: R,
    monitoring: M,
    locks: EventLocks,
}

impl<E, P, R, M> RegistrationUsecase<E, P, R, M>
where
    E: EventRepository,
    P: ParticipantRepository,
    R: RegistrationRepository,
    M: MonitoringPublisher,
{
    pub fn new(
        event_repository: E,
        participant_repository: P,
        registration_repository: R,
        monitoring: M,
    ) -> Self {
        Self {
            event_repository,
            participant_repository,
            registration_repository,
            monitoring,
            locks: EventLocks::new(),
        }
    }

    /// Register a participant for an event.
    ///
    /// When the event is full the registration is created in the `waiting`
    /// state instead of being rejected.
    pub async fn register_participant(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
    ) -> Result<Registration, DomainError> {
        let event = self.find_event(event_id).await?;

        if self
            .participant_repository
            .find_by_id(participant_id)
            .await?
            .is_none()
        {
            return Err(DomainError::InvalidRegistration(format!(
                "participant with id {participant_id} does not exist"
            )));
        }

        let _guard = self.locks.lock(event_id).await;

        if self
            .registration_repository
            .find_active(event_id, participant_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ParticipantAlreadyRegistered {
                event_id,
                participant_id,
            });
        }

        let occupying = self
            .registration_repository
            .count_occupying(event_id)
            .await?;
        let now = Utc::now();

        let new_registration = if event.is_full(occupying) {
            let queue_length = self.registration_repository.find_waiting(event_id).await?.len();
            let position = i32::try_from(queue_length + 1).unwrap_or(i32::MAX);
            NewRegistration::waiting(event_id, participant_id, position, now)
        } else {
            NewRegistration::registered(event_id, participant_id, now)
        };

        let registration = self.registration_repository.insert(new_registration).await?;

        tracing::info!(
            event_id,
            participant_id,
            registration_id = registration.id(),
            status = %registration.status(),
            waiting_position = registration.waiting_position(),
            max_participants = event.max_participants(),
            "participant registered"
        );

        self.monitoring.publish(MonitoringEvent::Registration {
            registration_id: registration.id(),
            event_id,
            participant_id,
            status: registration.status(),
            timestamp: now,
        });

        Ok(registration)
    }

    /// Cancel a registration and promote the head of the event's waitlist.
    ///
    /// Returns `false` when the registration does not exist. Promotion happens
    /// on every call while the waitlist is non-empty, whatever the prior status
    /// was, and an already cancelled registration gets a fresh `cancelled_at`.
    /// Remaining waiting positions are not renumbered.
    pub async fn cancel_registration(
        &self,
        registration_id: RegistrationId,
    ) -> Result<bool, DomainError> {
        let Some(found) = self
            .registration_repository
            .find_by_id(registration_id)
            .await?
        else {
            return Ok(false);
        };
        let event_id = found.event_id();

        let _guard = self.locks.lock(event_id).await;

        // re-read, the row may have changed while waiting for the lock
        let Some(mut registration) = self
            .registration_repository
            .find_by_id(registration_id)
            .await?
        else {
            return Ok(false);
        };

        let prior = registration.cancel(Utc::now());

        let next_in_line = self
            .registration_repository
            .find_waiting(event_id)
            .await?
            .into_iter()
            .find(|r| r.id() != registration_id);

        let mut changed = vec![registration];
        if let Some(mut next) = next_in_line {
            next.promote()?;
            changed.push(next);
        }

        self.registration_repository.update_all(&changed).await?;

        tracing::info!(
            event_id,
            registration_id,
            prior_status = %prior,
            freed_seat = prior.is_occupying(),
            "registration cancelled"
        );
        if let Some(promoted) = changed.get(1) {
            tracing::info!(
                event_id,
                registration_id = promoted.id(),
                participant_id = promoted.participant_id(),
                "promoted from waitlist"
            );
        }

        Ok(true)
    }

    /// Check in a `registered` participant.
    ///
    /// Returns `false` when the registration does not exist.
    pub async fn check_in_participant(
        &self,
        registration_id: RegistrationId,
    ) -> Result<bool, DomainError> {
        let Some(found) = self
            .registration_repository
            .find_by_id(registration_id)
            .await?
        else {
            return Ok(false);
        };

        let _guard = self.locks.lock(found.event_id()).await;

        let Some(mut registration) = self
            .registration_repository
            .find_by_id(registration_id)
            .await?
        else {
            return Ok(false);
        };

        let now = Utc::now();
        registration.check_in(now)?;
        self.registration_repository
            .update_all(std::slice::from_ref(&registration))
            .await?;

        let participant_name = self
            .participant_repository
            .find_by_id(registration.participant_id())
            .await?
            .map(|p| p.full_name())
            .unwrap_or_else(|| "Unknown".to_string());

        tracing::info!(
            event_id = registration.event_id(),
            registration_id,
            "participant checked in"
        );

        self.monitoring.publish(MonitoringEvent::CheckIn {
            registration_id,
            event_id: registration.event_id(),
            participant_id: registration.participant_id(),
            participant_name,
            timestamp: now,
        });

        Ok(true)
    }

    /// Reject a self-registration before anything is written on the caller's
    /// behalf: the event has to exist and must not be organized by the caller.
    pub async fn authorize_self_registration(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<(), DomainError> {
        let event = self.find_event(event_id).await?;
        if event.is_created_by(user_id) {
            return Err(DomainError::InvalidRegistration(
                "organizers cannot register for their own event".to_string(),
            ));
        }
        Ok(())
    }

    /// Registrations of an event, visible to its organizer only.
    pub async fn get_organizer_event_registrations(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Vec<Registration>, DomainError> {
        let event = self.find_event(event_id).await?;
        if !event.is_created_by(user_id) {
            return Err(DomainError::Forbidden(
                "only the organizer can list registrations of an event".to_string(),
            ));
        }
        self.get_event_registrations(event_id).await
    }

    async fn find_event(&self, event_id: EventId) -> Result<EventCapacity, DomainError> {
        self.event_repository
            .find_capacity(event_id)
            .await?
            .ok_or(DomainError::EventNotFound(event_id))
    }

    pub async fn get_registration(
        &self,
        registration_id: RegistrationId,
    ) -> Result<Option<Registration>, DomainError> {
        Ok(self
            .registration_repository
            .find_by_id(registration_id)
            .await?)
    }

    pub async fn get_event_registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Registration>, DomainError> {
        Ok(self.registration_repository.find_by_event(event_id).await?)
    }

    pub async fn get_waiting_list(&self, event_id: EventId) -> Result<Vec<Registration>, DomainError> {
        Ok(self.registration_repository.find_waiting(event_id).await?)
    }

    /// Non-cancelled registrations of one participant across all events.
    pub async fn get_participant_registrations(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<Registration>, DomainError> {
        Ok(self
            .registration_repository
            .find_active_by_participant(participant_id)
            .await?)
    }

    pub async fn check_registration(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
    ) -> Result<Option<Registration>, DomainError> {
        Ok(self
            .registration_repository
            .find_active(event_id, participant_id)
            .await?)
    }
}
