//! # Usergate Repository
//!
//! The user storage port and its MySQL implementation.
//!
//! ```text
//! UserService
//!   ↓  Arc<dyn UserRepository>   (storage port)
//! MySqlUserRepository            (SQLx, parameterized queries)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
