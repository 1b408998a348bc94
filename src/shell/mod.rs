//! External process collaborators.
//!
//! - [`command`] - run a program and capture its combined output
//! - [`host`] - the toolchain and source-control queries the auditor needs

pub mod command;
pub mod host;

pub use command::{run_captured, CommandOutput};
pub use host::{Host, SystemHost, DEFAULT_IDF_PY};
