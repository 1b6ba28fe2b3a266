//! Finishing touches on a freshly materialized project.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};
use crate::materialize::write_new;

/// Name of the temporary tree a JavaScript project is fetched into before
/// conversion. It lives inside the project directory.
pub const TEMP_DIR_NAME: &str = ".solid-start";

pub const GITIGNORE: &str = "
dist
.solid
.output
.vercel
.netlify
.vinxi
app.config.timestamp_*.js

# Environment
.env
.env*.local

# dependencies
/node_modules

# IDEs and editors
/.idea
.project
.classpath
*.launch
.settings/

# Temp
gitignore

# System Files
.DS_Store
Thumbs.db
";

pub fn temp_dir_for(project_dir: &Path) -> PathBuf {
    project_dir.join(TEMP_DIR_NAME)
}

/// Check a project name is usable as a single directory under the cwd.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name must not contain path separators"));
    }
    match Path::new(name).components().next() {
        Some(Component::Normal(_)) => Ok(()),
        _ => Err(invalid("name must be a plain directory name")),
    }
}

/// Write `.gitignore` unless the template already brought one.
///
/// Returns `true` if the file was written.
pub async fn write_gitignore(project_dir: &Path) -> Result<bool> {
    let path = project_dir.join(".gitignore");
    match write_new(&path, GITIGNORE.trim_start().as_bytes()).await {
        Ok(()) => Ok(true),
        Err(Error::Collision { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Point `index.html` script tags at the downgraded entry modules.
///
/// Returns `true` if the file changed. A project without `index.html`
/// is left alone.
pub async fn retarget_html_entry(project_dir: &Path) -> Result<bool> {
    let path = project_dir.join("index.html");
    let html = match fs::read_to_string(&path).await {
        Ok(html) => html,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(Error::io(&path, e)),
    };

    let rewritten = html.replace(".tsx\"", ".jsx\"").replace(".ts\"", ".js\"");
    if rewritten == html {
        return Ok(false);
    }
    fs::write(&path, rewritten)
        .await
        .map_err(|e| Error::io(&path, e))?;
    Ok(true)
}

/// Set the `name` field of the project's `package.json`.
pub async fn set_package_name(project_dir: &Path, name: &str) -> Result<()> {
    let path = project_dir.join("package.json");
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| Error::io(&path, e))?;
    let json_err = |source| Error::Json {
        path: path.clone(),
        source,
    };

    let mut manifest: serde_json::Value = serde_json::from_str(&content).map_err(json_err)?;
    if let Some(object) = manifest.as_object_mut() {
        object.insert("name".into(), serde_json::Value::String(name.to_string()));
    }

    let mut out = serde_json::to_string_pretty(&manifest).map_err(json_err)?;
    out.push('\n');
    fs::write(&path, out)
        .await
        .map_err(|e| Error::io(&path, e))?;
    Ok(())
}
