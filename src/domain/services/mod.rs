pub mod identity_service;
pub mod monitoring_service;
