//! HTTP middleware.

mod audit;
mod logging;
mod request_id;
mod timeout;

pub use audit::*;
pub use logging::*;
pub use request_id::*;
pub use timeout::*;
