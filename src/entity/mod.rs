//! sea-orm table definitions.

pub mod events;
pub mod participants;
pub mod registrations;
