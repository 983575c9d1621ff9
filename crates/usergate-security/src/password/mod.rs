//! Password hashing and validation.

mod hasher;
mod policy;

pub use hasher::{PasswordHasher, PasswordHasherInterface, PasswordHasherParameters};
pub use policy::{
    validate_password, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN, MSG_CHARACTER_CLASSES, MSG_LENGTH,
    MSG_MISMATCH,
};
