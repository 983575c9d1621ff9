//! HTTP request and response bodies.

mod user_dto;

pub use user_dto::*;
