//! # Usergate Security
//!
//! One-way password hashing and the raw-password format policy.

pub mod password;

pub use password::*;
