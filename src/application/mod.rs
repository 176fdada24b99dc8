//! Application layer
//!
//! Use cases that orchestrate the codecs and the persistence port.

pub mod dto;
mod validate_image;

pub use validate_image::{ValidateImageUseCase, ValidationError};
