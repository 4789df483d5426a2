//! Domain models for the clinic client.

mod appointment;
mod doctor;
mod medical_record;
mod patient;
mod prescription;
mod profile;
mod wire;

pub use appointment::*;
pub use doctor::*;
pub use medical_record::*;
pub use patient::*;
pub use prescription::*;
pub use profile::*;
pub use wire::*;

/// Server-assigned record id.
pub type EntityId = i64;

/// Placeholder for a join that resolves to nothing.
pub const NOT_AVAILABLE: &str = "N/A";
