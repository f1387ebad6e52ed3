pub mod event_repository;
pub mod participant_repository;
pub mod registration_repository;
