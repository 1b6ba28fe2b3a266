//! Template extraction from the files compiled into the binary.

use std::path::Path;

use rust_embed::RustEmbed;
use tokio::fs;

use crate::error::{Error, Result};
use crate::materialize::write_new;
use crate::templates::Template;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Embedded;

/// Embedded paths belonging to `template`, relative to the template root,
/// in sorted order.
pub fn template_files(template: Template) -> Vec<String> {
    let prefix = template.embed_prefix();
    let mut files: Vec<String> = Embedded::iter()
        .filter_map(|path| path.strip_prefix(prefix.as_str()).map(str::to_string))
        .collect();
    files.sort();
    files
}

/// Write every file of `template` under `dest`, creating directories as
/// needed. Existing files are never overwritten.
///
/// Returns the number of files written.
pub async fn fetch_template(template: Template, dest: impl AsRef<Path>) -> Result<usize> {
    let dest = dest.as_ref();
    let prefix = template.embed_prefix();
    let files = template_files(template);
    if files.is_empty() {
        return Err(Error::MissingPath {
            path: Path::new("templates").join(&prefix),
        });
    }

    for relative in &files {
        let embedded_path = format!("{prefix}{relative}");
        let file = Embedded::get(&embedded_path).ok_or_else(|| Error::MissingPath {
            path: embedded_path.clone().into(),
        })?;

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }
        write_new(&target, &file.data).await?;
        tracing::debug!(path = %target.display(), "fetched");
    }

    tracing::info!(%template, files = files.len(), dest = %dest.display(), "template fetched");
    Ok(files.len())
}
