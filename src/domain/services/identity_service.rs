use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Id of an account in the external auth service.
pub type UserId = i32;

/// Caller identity as resolved by the external auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Verifies a bearer token and returns who it belongs to
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, DomainError>;
}
