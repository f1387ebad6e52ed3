pub mod event_repository;
pub mod jwt_identity_verifier;
pub mod monitoring;
pub mod participant_repository;
pub mod registration_repository;
pub mod schema;
