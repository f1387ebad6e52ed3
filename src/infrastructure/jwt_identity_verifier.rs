use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    services::identity_service::{Identity, IdentityVerifier},
};

/// Claims of the access tokens issued by the auth service.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // Subject (user ID)
    email: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    phone: Option<String>,
    exp: i64, // Expiration time
    iat: i64, // Issued at
}

#[derive(Clone)]
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, DomainError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            DomainError::Unauthorized
        })?;

        let claims = data.claims;
        let user_id = claims.sub.parse().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "bearer token subject is not a user id");
            DomainError::Unauthorized
        })?;

        Ok(Identity {
            user_id,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            phone: claims.phone,
        })
    }
}
