//! Server startup utilities.

use tracing::{debug, info};
use usergate_config::{AppMetadata, ServerConfig};
use usergate_core::{UserStatus, UsergateResult};
use usergate_service::{NewUser, UserService};

/// Description given to the bootstrap account.
pub const SUPER_USER_DESCRIPTION: &str = "Default created super user";

/// Creates the configured super user unless it can already be read.
///
/// Any failure to create it is returned; the caller treats it as fatal.
pub async fn ensure_super_user(
    user_service: &dyn UserService,
    app: &AppMetadata,
) -> UsergateResult<()> {
    match user_service.get(&app.super_user).await {
        Ok(_) => {
            debug!(username = %app.super_user, "Super user already exists");
            return Ok(());
        }
        Err(e) => debug!(username = %app.super_user, error = %e, "Super user not readable, creating"),
    }

    user_service
        .create(NewUser {
            username: app.super_user.clone(),
            password: app.super_password.clone(),
            email: format!("{}@example.com", app.super_user),
            description: SUPER_USER_DESCRIPTION.to_string(),
            status: UserStatus::Active,
        })
        .await?;

    info!(username = %app.super_user, "Default super user created");
    Ok(())
}

/// Logs where the service can be reached.
pub fn print_startup_info(server: &ServerConfig) {
    let separator = "=".repeat(60);
    let addr = server.addr();
    info!("{}", separator);
    info!("REST API:  http://{}/v1/users", addr);
    info!("Health:    http://{}/healthz", addr);
    info!("API Docs:  http://{}/swagger", addr);
    info!("{}", separator);
}
