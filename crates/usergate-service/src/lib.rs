//! # Usergate Service
//!
//! The user lifecycle service. It orchestrates the storage port, the
//! password codec and the read-through cache, and owns cache population
//! and invalidation.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use user_service::*;
