//! Command Line Interface (CLI) layer for burnmap.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for a single pre/post run. It wires
//! user-provided options to the library's `burnmap::api`.
//!
//! If you are embedding burnmap into another application, prefer using
//! the high-level `burnmap::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
