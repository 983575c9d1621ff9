//! # Usergate Server
//!
//! Wiring and lifecycle of the Usergate binary: the Shaku module, the
//! default super user, and the serve/shutdown sequence.

pub mod app;
pub mod di;
pub mod startup;
