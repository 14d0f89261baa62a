//! Command implementations.
//!
//! Output goes through `tracing` at `info`, like every other message the
//! CLI prints.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;
