//! # solid-cli
//!
//! Command-line tool for creating and working on Solid projects.
//!
//! This crate provides the `solid` binary with the following commands:
//!
//! | Command | Description |
//! |---------|-------------|
//! | `solid create [name]` | Create a project from a SolidStart or vanilla template |
//! | `solid debug` | Print platform and toolchain versions |
//! | `solid start route <name>` | Add a SolidStart route file |
//! | `solid start dev` | Run the project's dev server |
//! | `solid docs` | Open the Solid documentation |
//!
//! Project materialization itself lives in `solid-create`; this crate is
//! the terminal surface around it: argument parsing, prompts, spinners,
//! settings and logging.

pub mod commands;
pub mod config;
pub mod logging;
pub mod prompts;

/// The startup banner, ` Solid CLI v<version>`.
pub fn banner() -> String {
    format!(" Solid CLI v{} ", env!("CARGO_PKG_VERSION"))
}
