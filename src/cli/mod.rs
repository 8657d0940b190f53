//! Command Line Interface (CLI) layer for geobridge.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `polygonize`, `clip` and
//! `which` subcommands. It wires user-provided options to the library
//! functionality exposed via `geobridge::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
