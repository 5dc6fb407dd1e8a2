//! Domain layer types and invariants.

pub mod country;
pub mod error;
pub mod outline;
