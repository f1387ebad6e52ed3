use serde::{Deserialize, Serialize};

use crate::domain::services::identity_service::UserId;

pub type EventId = i32;

/// Read-only view of an event as far as admission is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCapacity {
    max_participants: u32,
    created_by_user_id: UserId,
}

impl EventCapacity {
    pub fn new(max_participants: u32, created_by_user_id: UserId) -> Self {
        Self {
            max_participants,
            created_by_user_id,
        }
    }

    /// The organizer may manage the event but not register for it.
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.created_by_user_id == user_id
    }

    /// `0` means the event has no capacity limit.
    pub fn max_participants(&self) -> u32 {
        self.max_participants
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_participants == 0
    }

    /// Whether a new registration has to go to the waitlist given the number of
    /// registrations currently occupying a seat.
    pub fn is_full(&self, occupying: u64) -> bool {
        !self.is_unlimited() && occupying >= u64::from(self.max_participants)
    }
}
