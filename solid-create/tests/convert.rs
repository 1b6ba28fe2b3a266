use solid_create::convert::{convert_to_js, remove_tree, JsConfig, JSCONFIG, TSCONFIG};
use solid_create::fetch::fetch_template;
use solid_create::project::temp_dir_for;
use solid_create::{DowngradeOptions, Error, Template};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INDEX_TSX: &str = "import { render } from \"solid-js/web\";\nimport App from \"./App\";\n\nrender(() => <App />, document.getElementById(\"root\")!);\n";

/// project/
///   .solid-start/
///     tsconfig.json
///     README.md
///     src/index.tsx
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("my-app");
    let temp = temp_dir_for(&project);
    fs::create_dir_all(temp.join("src")).unwrap();
    fs::write(temp.join(TSCONFIG), "{ \"compilerOptions\": {} }\n").unwrap();
    fs::write(temp.join("README.md"), "# my-app\n").unwrap();
    fs::write(temp.join("src/index.tsx"), INDEX_TSX).unwrap();
    (tmp, project, temp)
}

fn all_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    out
}

#[test]
fn jsconfig_shape() {
    let json: serde_json::Value = serde_json::from_str(&JsConfig::solid().to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "compilerOptions": {
                "jsx": "preserve",
                "jsxImportSource": "solid-js",
                "paths": { "~/*": ["./src/*"] }
            }
        })
    );
}

#[tokio::test]
async fn converts_temp_tree_into_project() {
    let (_tmp, project, temp) = setup();

    let summary = convert_to_js(&temp, &project, &DowngradeOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.downgraded, 1);
    assert_eq!(summary.copied, 1);

    let index = fs::read_to_string(project.join("src/index.jsx")).unwrap();
    assert_eq!(
        index,
        "import { render } from \"solid-js/web\";\nimport App from \"./App\";\n\nrender(() => <App />, document.getElementById(\"root\"));\n"
    );
    assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), "# my-app\n");
    assert!(!project.join(TSCONFIG).exists());
    assert!(!project.join("src/index.tsx").exists());
    assert!(!temp.exists());
}

#[tokio::test]
async fn writes_jsconfig_into_project() {
    let (_tmp, project, temp) = setup();
    convert_to_js(&temp, &project, &DowngradeOptions::default())
        .await
        .unwrap();

    let written: JsConfig =
        serde_json::from_str(&fs::read_to_string(project.join(JSCONFIG)).unwrap()).unwrap();
    assert_eq!(written, JsConfig::solid());
}

#[tokio::test]
async fn missing_tsconfig_fails_before_writing() {
    let (_tmp, project, temp) = setup();
    fs::remove_file(temp.join(TSCONFIG)).unwrap();

    let result = convert_to_js(&temp, &project, &DowngradeOptions::default()).await;
    match result {
        Err(Error::MissingPath { path }) => assert!(path.ends_with(TSCONFIG)),
        other => panic!("expected missing tsconfig, got {other:?}"),
    }
    assert!(!project.join(JSCONFIG).exists());
    assert!(temp.exists());
}

#[tokio::test]
async fn existing_jsconfig_is_a_collision() {
    let (_tmp, project, temp) = setup();
    fs::write(project.join(JSCONFIG), "{}").unwrap();

    let result = convert_to_js(&temp, &project, &DowngradeOptions::default()).await;
    assert!(matches!(result, Err(Error::Collision { .. })));
    assert_eq!(fs::read_to_string(project.join(JSCONFIG)).unwrap(), "{}");
    assert!(!project.join("src/index.jsx").exists());
}

#[tokio::test]
async fn same_root_is_rejected() {
    let (_tmp, _project, temp) = setup();
    let result = convert_to_js(&temp, &temp, &DowngradeOptions::default()).await;
    assert!(matches!(result, Err(Error::SameRoot { .. })));
    assert!(temp.join(TSCONFIG).exists());
}

#[tokio::test]
async fn remove_tree_tolerates_missing_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("gone");
    fs::create_dir_all(dir.join("a/b")).unwrap();
    fs::write(dir.join("a/b/c.txt"), "x").unwrap();

    remove_tree(&dir).await.unwrap();
    assert!(!dir.exists());
    remove_tree(&dir).await.unwrap();
}

#[tokio::test]
async fn fetched_templates_convert_without_typed_leftovers() {
    for template in [Template::Basic, Template::Ts] {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join(template.as_str());
        let temp = temp_dir_for(&project);

        let fetched = fetch_template(template, &temp).await.unwrap();
        assert!(fetched > 0);

        convert_to_js(&temp, &project, &DowngradeOptions::default())
            .await
            .unwrap_or_else(|e| panic!("{template}: {e}"));

        let files = all_files(&project);
        assert!(project.join(JSCONFIG).exists(), "{template}");
        assert!(!temp.exists(), "{template}");
        for file in &files {
            let ext = file.extension().and_then(|e| e.to_str()).unwrap_or("");
            assert!(ext != "ts" && ext != "tsx", "{template}: {}", file.display());
        }
    }
}

#[tokio::test]
async fn converted_components_keep_their_markup() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("app");
    let temp = temp_dir_for(&project);
    fetch_template(Template::Basic, &temp).await.unwrap();
    convert_to_js(&temp, &project, &DowngradeOptions::default())
        .await
        .unwrap();

    let counter = fs::read_to_string(project.join("src/components/Counter.jsx")).unwrap();
    assert!(counter.contains("createSignal(0)"), "{counter}");
    assert!(counter.contains("<button class=\"increment\""));
    assert!(counter.contains("import \"./Counter.css\";"));

    let client = fs::read_to_string(project.join("src/entry-client.jsx")).unwrap();
    assert!(client.contains("document.getElementById(\"app\"));"), "{client}");

    assert!(project.join("app.config.js").exists());
    assert!(project.join("src/routes/[...404].jsx").exists());
}
