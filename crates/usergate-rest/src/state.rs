//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use std::sync::Arc;
use usergate_repository::DatabasePoolInterface;
use usergate_service::UserService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub database: Arc<dyn DatabasePoolInterface>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        database: Arc<dyn DatabasePoolInterface>,
    ) -> Self {
        Self {
            user_service,
            database,
        }
    }

    /// Resolves the state's components from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module + HasComponent<dyn UserService> + HasComponent<dyn DatabasePoolInterface>,
    {
        Self {
            user_service: module.resolve(),
            database: module.resolve(),
        }
    }
}
