use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

pub type ParticipantId = i32;

/// Participant data that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
}

impl NewParticipant {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        phone: Option<String>,
    ) -> Result<Self, DomainError> {
        let first_name = first_name.trim().to_string();
        let last_name = last_name.trim().to_string();
        let email = email.trim().to_string();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::InvalidRegistration(
                "participant name must not be empty".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::InvalidRegistration(format!(
                "invalid email address: {email}"
            )));
        }

        let phone = phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl Participant {
    pub fn reconstruct(
        id: ParticipantId,
        first_name: String,
        last_name: String,
        email: String,
        phone: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
            created_at,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
