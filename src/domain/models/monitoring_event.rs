use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{
    event::EventId,
    participant::ParticipantId,
    registration::{RegistrationId, RegistrationStatus},
};

/// Notifications handed to the monitoring collaborator after a state change
/// has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data")]
pub enum MonitoringEvent {
    Registration {
        registration_id: RegistrationId,
        event_id: EventId,
        participant_id: ParticipantId,
        status: RegistrationStatus,
        timestamp: DateTime<Utc>,
    },
    CheckIn {
        registration_id: RegistrationId,
        event_id: EventId,
        participant_id: ParticipantId,
        participant_name: String,
        timestamp: DateTime<Utc>,
    },
}

impl MonitoringEvent {
    pub fn event_id(&self) -> EventId {
        match self {
            MonitoringEvent::Registration { event_id, .. } => *event_id,
            MonitoringEvent::CheckIn { event_id, .. } => *event_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            MonitoringEvent::Registration { timestamp, .. } => *timestamp,
            MonitoringEvent::CheckIn { timestamp, .. } => *timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MonitoringEvent::Registration { .. } => "Registration",
            MonitoringEvent::CheckIn { .. } => "CheckIn",
        }
    }
}
