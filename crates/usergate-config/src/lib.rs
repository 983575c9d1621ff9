//! # Usergate Config
//!
//! Configuration management for the Usergate service.
//! Supports layered configuration from files and environment variables,
//! and publishes reloaded snapshots to subscribers.

mod app_config;
mod loader;
mod watcher;

pub use app_config::*;
pub use loader::*;
pub use watcher::*;
