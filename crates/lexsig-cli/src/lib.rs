//! lexsig CLI library components.
//!
//! The command handlers live here so integration tests and other drivers can
//! call them directly.

pub mod commands;
