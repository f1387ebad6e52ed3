use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    models::{event::EventId, participant::ParticipantId},
};

pub type RegistrationId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Waiting,
    CheckedIn,
    Cancelled,
}

impl RegistrationStatus {
    /// Statuses that hold a seat of the event.
    pub const OCCUPYING: [RegistrationStatus; 2] =
        [RegistrationStatus::Registered, RegistrationStatus::CheckedIn];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Waiting => "waiting",
            RegistrationStatus::CheckedIn => "checked_in",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_occupying(&self) -> bool {
        Self::OCCUPYING.contains(self)
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        *self != RegistrationStatus::Cancelled
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegistrationStatus::Registered),
            "waiting" => Ok(RegistrationStatus::Waiting),
            "checked_in" => Ok(RegistrationStatus::CheckedIn),
            "cancelled" => Ok(RegistrationStatus::Cancelled),
            other => Err(DomainError::InvalidRegistration(format!(
                "unknown registration status: {other}"
            ))),
        }
    }
}

/// A registration row that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    event_id: EventId,
    participant_id: ParticipantId,
    status: RegistrationStatus,
    registered_at: DateTime<Utc>,
    waiting_position: Option<i32>,
}

impl NewRegistration {
    pub fn registered(
        event_id: EventId,
        participant_id: ParticipantId,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            participant_id,
            status: RegistrationStatus::Registered,
            registered_at,
            waiting_position: None,
        }
    }

    /// `position` is the 1-based rank in the event's waitlist after appending.
    pub fn waiting(
        event_id: EventId,
        participant_id: ParticipantId,
        position: i32,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            participant_id,
            status: RegistrationStatus::Waiting,
            registered_at,
            waiting_position: Some(position),
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }
    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }
    pub fn status(&self) -> RegistrationStatus {
        self.status
    }
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
    pub fn waiting_position(&self) -> Option<i32> {
        self.waiting_position
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    id: RegistrationId,
    event_id: EventId,
    participant_id: ParticipantId,
    status: RegistrationStatus,
    registered_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
    checked_in_at: Option<DateTime<Utc>>,
    waiting_position: Option<i32>,
}

impl Registration {
    /// Assign an id to a freshly inserted registration.
    pub fn from_new(id: RegistrationId, new: NewRegistration) -> Self {
        Self {
            id,
            event_id: new.event_id,
            participant_id: new.participant_id,
            status: new.status,
            registered_at: new.registered_at,
            cancelled_at: None,
            checked_in_at: None,
            waiting_position: new.waiting_position,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: RegistrationId,
        event_id: EventId,
        participant_id: ParticipantId,
        status: RegistrationStatus,
        registered_at: DateTime<Utc>,
        cancelled_at: Option<DateTime<Utc>>,
        checked_in_at: Option<DateTime<Utc>>,
        waiting_position: Option<i32>,
    ) -> Self {
        Self {
            id,
            event_id,
            participant_id,
            status,
            registered_at,
            cancelled_at,
            checked_in_at,
            waiting_position,
        }
    }

    /// Move to `cancelled` and return the status held before.
    ///
    /// The waiting position is kept as a historical value.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> RegistrationStatus {
        let prior = self.status;
        self.status = RegistrationStatus::Cancelled;
        self.cancelled_at = Some(now);
        prior
    }

    pub fn check_in(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status != RegistrationStatus::Registered {
            return Err(DomainError::InvalidRegistration(
                "only registered participants may check in".to_string(),
            ));
        }
        self.status = RegistrationStatus::CheckedIn;
        self.checked_in_at = Some(now);
        Ok(())
    }

    /// Take this registration off the waitlist and give it a seat.
    pub fn promote(&mut self) -> Result<(), DomainError> {
        if self.status != RegistrationStatus::Waiting {
            return Err(DomainError::InvalidRegistration(format!(
                "registration {} is not waiting",
                self.id
            )));
        }
        self.status = RegistrationStatus::Registered;
        self.waiting_position = None;
        Ok(())
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }
    pub fn event_id(&self) -> EventId {
        self.event_id
    }
    pub fn participant_id(&self) -> ParticipantId {
        self.participant_id
    }
    pub fn status(&self) -> RegistrationStatus {
        self.status
    }
    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }
    pub fn checked_in_at(&self) -> Option<DateTime<Utc>> {
        self.checked_in_at
    }
    pub fn waiting_position(&self) -> Option<i32> {
        self.waiting_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn waiting_registration() -> Registration {
        Registration::from_new(7, NewRegistration::waiting(1, 2, 3, Utc::now()))
    }

    #[rstest]
    #[case(RegistrationStatus::Registered)]
    #[case(RegistrationStatus::Waiting)]
    #[case(RegistrationStatus::CheckedIn)]
    #[case(RegistrationStatus::Cancelled)]
    fn test_status_string_form(#[case] status: RegistrationStatus) {
        let parsed: RegistrationStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            format!("\"{}\"", status.as_str())
        );
    }

    #[test]
    fn test_unknown_status_negative() {
        assert!("pending".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_occupying_statuses() {
        assert!(RegistrationStatus::Registered.is_occupying());
        assert!(RegistrationStatus::CheckedIn.is_occupying());
        assert!(!RegistrationStatus::Waiting.is_occupying());
        assert!(!RegistrationStatus::Cancelled.is_occupying());
    }

    #[test]
    fn test_cancel_returns_prior_status() {
        let mut registration = waiting_registration();
        let now = Utc::now();

        let prior = registration.cancel(now);

        assert_eq!(prior, RegistrationStatus::Waiting);
        assert_eq!(registration.status(), RegistrationStatus::Cancelled);
        assert_eq!(registration.cancelled_at(), Some(now));
    }

    #[test]
    fn test_promote_clears_waiting_position() {
        let mut registration = waiting_registration();

        registration.promote().unwrap();

        assert_eq!(registration.status(), RegistrationStatus::Registered);
        assert_eq!(registration.waiting_position(), None);
    }

    #[test]
    fn test_check_in_waiting_negative() {
        let mut registration = waiting_registration();

        let result = registration.check_in(Utc::now());

        assert!(matches!(result, Err(DomainError::InvalidRegistration(_))));
        assert_eq!(registration.checked_in_at(), None);
    }

    #[test]
    fn test_check_in_registered_positive() {
        let mut registration =
            Registration::from_new(1, NewRegistration::registered(1, 2, Utc::now()));
        let now = Utc::now();

        registration.check_in(now).unwrap();

        assert_eq!(registration.status(), RegistrationStatus::CheckedIn);
        assert_eq!(registration.checked_in_at(), Some(now));
    }
}
