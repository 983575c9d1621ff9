//! Service-level inputs and outputs.

mod user_dto;

pub use user_dto::*;
