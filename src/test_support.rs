//! In-memory repository doubles shared by use case and router tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::{
        event::{EventCapacity, EventId},
        monitoring_event::MonitoringEvent,
        participant::{NewParticipant, Participant, ParticipantId},
        registration::{NewRegistration, Registration, RegistrationId, RegistrationStatus},
    },
    repositories::{
        event_repository::EventRepository, participant_repository::ParticipantRepository,
        registration_repository::RegistrationRepository,
    },
    services::{
        identity_service::{Identity, IdentityVerifier, UserId},
        monitoring_service::MonitoringPublisher,
    },
};

#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<Mutex<HashMap<EventId, EventCapacity>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event organized by [`ORGANIZER_USER_ID`].
    pub fn with_event(self, id: EventId, max_participants: u32) -> Self {
        self.with_owned_event(id, max_participants, ORGANIZER_USER_ID)
    }

    pub fn with_owned_event(self, id: EventId, max_participants: u32, owner: UserId) -> Self {
        self.events
            .lock()
            .unwrap()
            .insert(id, EventCapacity::new(max_participants, owner));
        self
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn find_capacity(&self, id: EventId) -> Result<Option<EventCapacity>, RepositoryError> {
        Ok(self.events.lock().unwrap().get(&id).copied())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryParticipantRepository {
    participants: Arc<Mutex<Vec<Participant>>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, first_name: &str, last_name: &str, email: &str) -> Participant {
        let participant = NewParticipant::new(
            first_name.to_string(),
            last_name.to_string(),
            email.to_string(),
            None,
        )
        .unwrap();
        self.create(participant).await.unwrap()
    }

    pub fn len(&self) -> usize {
        self.participants.lock().unwrap().len()
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn find_by_id(&self, id: ParticipantId) -> Result<Option<Participant>, RepositoryError> {
        Ok(self
            .participants
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id() == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, RepositoryError> {
        Ok(self
            .participants
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email() == email)
            .cloned())
    }

    async fn create(&self, participant: NewParticipant) -> Result<Participant, RepositoryError> {
        let mut participants = self.participants.lock().unwrap();
        if participants.iter().any(|p| p.email() == participant.email()) {
            return Err(RepositoryError::DatabaseError(
                "duplicate key value violates unique constraint \"participants_email_key\""
                    .to_string(),
            ));
        }
        let created = Participant::reconstruct(
            participants.len() as ParticipantId + 1,
            participant.first_name().to_string(),
            participant.last_name().to_string(),
            participant.email().to_string(),
            participant.phone().map(str::to_string),
            Utc::now(),
        );
        participants.push(created.clone());
        Ok(created)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRegistrationRepository {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RegistrationId) -> Option<Registration> {
        self.registrations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Registration> {
        self.registrations.lock().unwrap().clone()
    }

    fn filtered(&self, predicate: impl Fn(&Registration) -> bool) -> Vec<Registration> {
        self.registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn find_by_id(&self, id: RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn find_active(
        &self,
        event_id: EventId,
        participant_id: ParticipantId,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self
            .filtered(|r| {
                r.event_id() == event_id
                    && r.participant_id() == participant_id
                    && r.status().is_active()
            })
            .into_iter()
            .next())
    }

    async fn count_occupying(&self, event_id: EventId) -> Result<u64, RepositoryError> {
        Ok(self
            .filtered(|r| r.event_id() == event_id && r.status().is_occupying())
            .len() as u64)
    }

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError> {
        Ok(self.filtered(|r| r.event_id() == event_id))
    }

    async fn find_waiting(&self, event_id: EventId) -> Result<Vec<Registration>, RepositoryError> {
        let mut waiting = self.filtered(|r| {
            r.event_id() == event_id && r.status() == RegistrationStatus::Waiting
        });
        waiting.sort_by_key(|r| (r.registered_at(), r.id()));
        Ok(waiting)
    }

    async fn find_active_by_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Vec<Registration>, RepositoryError> {
        Ok(self.filtered(|r| r.participant_id() == participant_id && r.status().is_active()))
    }

    async fn insert(&self, registration: NewRegistration) -> Result<Registration, RepositoryError> {
        let mut registrations = self.registrations.lock().unwrap();
        let created = Registration::from_new(registrations.len() as RegistrationId + 1, registration);
        registrations.push(created.clone());
        Ok(created)
    }

    async fn update_all(&self, changed: &[Registration]) -> Result<(), RepositoryError> {
        let mut registrations = self.registrations.lock().unwrap();
        if changed
            .iter()
            .any(|c| !registrations.iter().any(|r| r.id() == c.id()))
        {
            return Err(RepositoryError::NotFound);
        }
        for registration in changed {
            if let Some(slot) = registrations.iter_mut().find(|r| r.id() == registration.id()) {
                *slot = registration.clone();
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingMonitoringPublisher {
    events: Arc<Mutex<Vec<MonitoringEvent>>>,
}

impl RecordingMonitoringPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MonitoringEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl MonitoringPublisher for RecordingMonitoringPublisher {
    fn publish(&self, event: MonitoringEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub const VALID_TOKEN: &str = "valid_token";
pub const ORGANIZER_TOKEN: &str = "organizer_token";

pub const CALLER_USER_ID: UserId = 1;
pub const ORGANIZER_USER_ID: UserId = 99;

/// Accepts [`VALID_TOKEN`] (Jan Kowalski) and [`ORGANIZER_TOKEN`] (the
/// organizer of events added with `with_event`).
#[derive(Clone)]
pub struct StaticIdentityVerifier;

impl StaticIdentityVerifier {
    pub fn identity() -> Identity {
        Identity {
            user_id: CALLER_USER_ID,
            email: "jan@example.com".to_string(),
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            phone: None,
        }
    }

    pub fn organizer() -> Identity {
        Identity {
            user_id: ORGANIZER_USER_ID,
            email: "organizer@example.com".to_string(),
            first_name: "Barbara".to_string(),
            last_name: "Wiśniewska".to_string(),
            phone: None,
        }
    }
}

impl IdentityVerifier for StaticIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, DomainError> {
        match token {
            VALID_TOKEN => Ok(Self::identity()),
            ORGANIZER_TOKEN => Ok(Self::organizer()),
            _ => Err(DomainError::Unauthorized),
        }
    }
}
