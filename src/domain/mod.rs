//! Domain layer
//!
//! Ports the scrubbing core depends on but does not implement.

pub mod repositories;
