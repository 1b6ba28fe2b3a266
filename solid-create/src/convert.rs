use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::downgrade::DowngradeOptions;
use crate::error::{Error, Result};
use crate::materialize::{self, Summary};
use crate::walk::RootMapping;

/// Typed-project configuration removed from the temporary tree.
pub const TSCONFIG: &str = "tsconfig.json";

/// Plain-script project configuration written into the project.
pub const JSCONFIG: &str = "jsconfig.json";

/// Contents of `jsconfig.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsConfig {
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub jsx: String,
    pub jsx_import_source: String,
    pub paths: BTreeMap<String, Vec<String>>,
}

impl JsConfig {
    /// Preserved JSX compiled against `solid-js`, with `~/*` aliased to `./src/*`.
    pub fn solid() -> Self {
        let mut paths = BTreeMap::new();
        paths.insert("~/*".to_string(), vec!["./src/*".to_string()]);
        JsConfig {
            compiler_options: CompilerOptions {
                jsx: "preserve".into(),
                jsx_import_source: "solid-js".into(),
                paths,
            },
        }
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Convert a fetched TypeScript template into a JavaScript project.
///
/// In order:
/// 1. delete `tsconfig.json` from `temp_dir` ([`Error::MissingPath`] if absent),
/// 2. write `jsconfig.json` into `project_dir` ([`Error::Collision`] if present),
/// 3. materialize the whole temporary tree into `project_dir`,
/// 4. remove `temp_dir`, tolerating it being gone already.
///
/// Nothing is rolled back on failure.
pub async fn convert_to_js(
    temp_dir: impl AsRef<Path>,
    project_dir: impl AsRef<Path>,
    options: &DowngradeOptions,
) -> Result<Summary> {
    let temp_dir = temp_dir.as_ref();
    let project_dir = project_dir.as_ref();
    let mapping = RootMapping::new(temp_dir, project_dir)?;

    let tsconfig = mapping.source().join(TSCONFIG);
    fs::remove_file(&tsconfig)
        .await
        .map_err(|e| Error::io(&tsconfig, e))?;
    tracing::debug!(path = %tsconfig.display(), "removed typed project config");

    fs::create_dir_all(mapping.dest())
        .await
        .map_err(|e| Error::io(mapping.dest(), e))?;
    let jsconfig = mapping.dest().join(JSCONFIG);
    let contents = JsConfig::solid().to_json().map_err(|source| Error::Json {
        path: jsconfig.clone(),
        source,
    })?;
    materialize::write_new(&jsconfig, contents.as_bytes()).await?;

    let summary = materialize::materialize(mapping.clone(), options).await?;
    tracing::info!(
        directories = summary.directories,
        copied = summary.copied,
        downgraded = summary.downgraded,
        "converted template to JavaScript"
    );

    remove_tree(mapping.source()).await?;
    Ok(summary)
}

/// Recursively delete a directory; a missing directory is not an error.
pub async fn remove_tree(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}
