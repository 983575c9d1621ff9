//! Domain entities and value objects.

mod status;
mod user;

pub use status::UserStatus;
pub use user::User;
