//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.

pub mod audit;
pub mod detect;
pub mod dispatcher;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
