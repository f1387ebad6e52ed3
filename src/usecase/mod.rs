pub mod event_lock;
pub mod participant_usecase;
pub mod registration_usecase;
