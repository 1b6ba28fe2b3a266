//! Command implementations for the `solid` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

/// Project scaffolding, `solid create [name]`.
///
/// Fetches an embedded template and, for JavaScript projects, converts it
/// out of TypeScript before writing `.gitignore` and the package name.
pub mod create;

/// Environment report, `solid debug`.
///
/// Prints the CLI version, the platform, and the versions of the
/// JavaScript toolchain found on `PATH`.
pub mod debug;

/// Documentation, `solid docs`.
pub mod docs;

/// SolidStart helpers, `solid start route <name>` and `solid start dev`.
pub mod start;
