//! Application services layer.

pub mod error;
pub mod extract;
pub mod outline;
