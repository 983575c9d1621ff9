//! # Usergate REST
//!
//! HTTP surface of the user service: `/v1/users` CRUD, `/healthz`, and
//! Swagger UI at `/swagger`.

pub mod controllers;
pub mod dto;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
