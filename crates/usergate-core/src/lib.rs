//! # Usergate Core
//!
//! Core types, traits, and error definitions shared by every layer of the
//! Usergate service: the error taxonomy, the user entity, pagination and
//! filter types, validation rules, and logging bootstrap.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod timeout;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use pagination::*;
pub use result::*;
pub use timeout::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
