//! # solid-create
//!
//! Project materialization for the `solid` CLI.
//!
//! A new project is produced in two phases: an embedded template is
//! fetched into a directory, and, for JavaScript projects, that temporary
//! tree is converted into the final project directory with every
//! TypeScript source downgraded to plain JavaScript.
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | worklist directory traversal yielding [`materialize::Operation`]s |
//! | [`materialize`] | classify and apply per-entry operations (copy, downgrade, mkdir) |
//! | [`downgrade`] | TypeScript/TSX to JavaScript/JSX, markup preserved |
//! | [`convert`] | the full conversion pass (`tsconfig.json` → `jsconfig.json`, tree, cleanup) |
//! | [`tasks`] | sequential task runner with start/stop progress |
//! | [`prompt`] | prompt answers and the cancellation guard |
//! | [`templates`] | the static template registry |
//! | [`fetch`] | embedded template extraction |
//! | [`project`] | `.gitignore`, `package.json` name, temp-dir naming |

pub mod convert;
pub mod downgrade;
pub mod error;
pub mod fetch;
pub mod materialize;
pub mod project;
pub mod prompt;
pub mod tasks;
pub mod templates;
pub mod walk;

pub use convert::{convert_to_js, remove_tree, JsConfig};
pub use downgrade::{downgrade, Dialect, DowngradeOptions, JsxMode, Transform};
pub use error::{Error, Result};
pub use materialize::{materialize, Operation, Summary};
pub use prompt::{cancelable, Answer, Prompter};
pub use tasks::{run_many, run_one, Progress, Task};
pub use templates::{templates_for, templates_list, ProjectKind, Template};
pub use walk::{RootMapping, Walker};
