//! Infrastructure layer
//!
//! Adapters implementing the domain ports against the local machine.

pub mod persistence;
