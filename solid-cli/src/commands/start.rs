use anyhow::{bail, Context};
use colored::Colorize;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

use solid_create::convert::JSCONFIG;
use solid_create::materialize::write_new;

/// Directory SolidStart reads file routes from.
pub const ROUTES_DIR: &str = "src/routes";

/// Component name for a route path: the last segment, PascalCased, with
/// route syntax (`[...]`, `(...)`) stripped.
pub fn component_name(route: &str) -> String {
    let last = route.rsplit('/').next().unwrap_or(route);
    let name: String = last
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        format!("Route{name}")
    } else {
        name
    }
}

/// Source of a new route module.
pub fn route_source(component: &str) -> String {
    format!(
        r#"import {{ Title }} from "@solidjs/meta";

export default function {component}() {{
  return (
    <main>
      <Title>{component}</Title>
      <h1>{component}</h1>
    </main>
  );
}}
"#
    )
}

fn route_path(project_dir: &Path, route: &str) -> anyhow::Result<PathBuf> {
    let relative = Path::new(route);
    let plain = !route.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !plain {
        bail!("Invalid route name '{route}'");
    }

    let extension = if project_dir.join(JSCONFIG).exists() {
        "jsx"
    } else {
        "tsx"
    };
    let mut path = project_dir.join(ROUTES_DIR).join(relative);
    let file_name = format!(
        "{}.{extension}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    path.set_file_name(file_name);
    Ok(path)
}

fn require_project(project_dir: &Path) -> anyhow::Result<()> {
    if !project_dir.join("package.json").exists() {
        bail!("No package.json found. Run this command from a Solid project");
    }
    Ok(())
}

/// Add a route module under `src/routes/`.
///
/// `route` may contain `/` for nested routes. The file is `.jsx` when the
/// project has a `jsconfig.json`, `.tsx` otherwise. An existing route file
/// is never overwritten.
pub async fn route(project_dir: &Path, route: &str) -> anyhow::Result<PathBuf> {
    require_project(project_dir)?;
    let path = route_path(project_dir, route)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    write_new(&path, route_source(&component_name(route)).as_bytes()).await?;

    println!("{} Created {}", "✓".green(), path.display());
    tracing::info!(path = %path.display(), "route created");
    Ok(path)
}

/// Run the project's dev server through `package_manager`.
pub fn dev(project_dir: &Path, package_manager: &str) -> anyhow::Result<()> {
    require_project(project_dir)?;

    println!("{}", "Starting Solid dev server...".blue().bold());
    println!("{} Press {} to stop", "->".blue(), "Ctrl+C".yellow());
    println!();

    let status = Command::new(package_manager)
        .args(["run", "dev"])
        .current_dir(project_dir)
        .status()
        .with_context(|| format!("failed to run `{package_manager}`"))?;

    if !status.success() {
        bail!("`{package_manager} run dev` exited with {status}");
    }
    Ok(())
}
