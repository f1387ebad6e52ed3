pub mod event;
pub mod monitoring_event;
pub mod participant;
pub mod registration;
