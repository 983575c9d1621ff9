//! # Usergate Server
//!
//! Entry point. Configuration is read from `./config` and `USERGATE_*`
//! environment variables.

use usergate_config::ConfigLoader;

#[tokio::main]
async fn main() {
    if let Err(e) = usergate_server::app::run(ConfigLoader::from_default_location()).await {
        tracing::error!("Application error: {}", e);
        eprintln!("usergate-server: {e}");
        std::process::exit(1);
    }
}
