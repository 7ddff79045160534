//! Shared data model for Astral world content.

pub mod defs;
pub mod loose;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_world};
