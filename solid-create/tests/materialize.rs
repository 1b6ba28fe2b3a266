use solid_create::downgrade::DowngradeOptions;
use solid_create::materialize::{self, apply, Operation, Summary};
use solid_create::walk::{self, EntryKind, RootMapping};
use solid_create::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const INDEX_TSX: &str = "import { render } from \"solid-js/web\";\n\nconst App = (props: { name: string }) => <h1>Hello {props.name}</h1>;\n\nrender(() => <App name=\"world\" />, document.getElementById(\"root\")!);\n";

/// source/
///   README.md
///   src/index.tsx
///   src/util.ts
///   assets/logo.svg
///   public/            (empty)
fn write_source_tree(root: &Path) {
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("README.md"), "# Hello\n").unwrap();
    fs::write(root.join("src/index.tsx"), INDEX_TSX).unwrap();
    fs::write(root.join("src/util.ts"), "export const twice = (n: number): number => n * 2;\n").unwrap();
    fs::write(root.join("assets/logo.svg"), [0x3c, 0x73, 0x76, 0x67, 0x00, 0xff]).unwrap();
}

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    let dest = tmp.path().join("dest");
    write_source_tree(&source);
    fs::create_dir_all(&dest).unwrap();
    (tmp, source, dest)
}

/// Relative paths of every file and directory under `root`, sorted.
fn tree(root: &Path) -> Vec<String> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            if path.is_dir() {
                out.push(format!("{rel}/"));
                visit(root, &path, out);
            } else {
                out.push(rel);
            }
        }
    }
    let mut out = Vec::new();
    visit(root, root, &mut out);
    out.sort();
    out
}

// ── RootMapping ─────────────────────────────────────────────────────

#[test]
fn mapping_rejects_same_root() {
    let tmp = TempDir::new().unwrap();
    let result = RootMapping::new(tmp.path(), tmp.path().join("."));
    assert!(matches!(result, Err(Error::SameRoot { .. })));
}

#[test]
fn mapping_rejects_destination_inside_source() {
    let tmp = TempDir::new().unwrap();
    let result = RootMapping::new(tmp.path(), tmp.path().join("out"));
    assert!(matches!(result, Err(Error::NestedRoot { .. })));
}

#[test]
fn mapping_allows_source_inside_destination() {
    let tmp = TempDir::new().unwrap();
    let mapping = RootMapping::new(tmp.path().join("app/.solid-start"), tmp.path().join("app")).unwrap();
    let dest = mapping
        .destination_for(&mapping.source().join("src/index.tsx"))
        .unwrap();
    assert_eq!(dest, mapping.dest().join("src/index.tsx"));
}

#[test]
fn mapping_normalizes_parent_components() {
    let tmp = TempDir::new().unwrap();
    let mapping = RootMapping::new(tmp.path().join("a/../src"), tmp.path().join("dest")).unwrap();
    assert_eq!(mapping.source(), walk::absolutize(&tmp.path().join("src")).unwrap());
}

#[test]
fn mapping_rejects_paths_outside_source() {
    let tmp = TempDir::new().unwrap();
    let mapping = RootMapping::new(tmp.path().join("src"), tmp.path().join("dest")).unwrap();
    let result = mapping.destination_for(Path::new("/elsewhere/file.txt"));
    assert!(matches!(result, Err(Error::OutsideRoot { .. })));
}

// ── Walking ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_one_level() {
    let (_tmp, source, _dest) = setup();
    let mut names: Vec<(String, EntryKind)> = walk::list(&source)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.name(), e.kind))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));

    assert_eq!(
        names,
        vec![
            ("README.md".to_string(), EntryKind::File),
            ("assets".to_string(), EntryKind::Directory),
            ("public".to_string(), EntryKind::Directory),
            ("src".to_string(), EntryKind::Directory),
        ]
    );
}

#[tokio::test]
async fn list_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let result = walk::list(tmp.path().join("nope")).await;
    assert!(matches!(result, Err(Error::MissingPath { .. })));
}

#[tokio::test]
async fn plan_classifies_every_entry() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    let dest = mapping.dest().to_path_buf();
    let ops = walk::plan(mapping).await.unwrap();

    assert_eq!(ops.len(), 7);
    assert!(ops.contains(&Operation::CreateDir { dest: dest.join("public") }));
    assert!(ops.iter().any(|op| matches!(
        op,
        Operation::Downgrade { dest: d, .. } if d == &dest.join("src/index.jsx")
    )));
    assert!(ops.iter().any(|op| matches!(
        op,
        Operation::Downgrade { dest: d, .. } if d == &dest.join("src/util.js")
    )));
    assert!(ops.iter().any(|op| matches!(
        op,
        Operation::Copy { dest: d, .. } if d == &dest.join("README.md")
    )));
}

#[tokio::test]
async fn directories_come_before_their_contents() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    let dest = mapping.dest().to_path_buf();
    let ops = walk::plan(mapping).await.unwrap();

    let position = |path: PathBuf| ops.iter().position(|op| op.dest() == path).unwrap();
    assert!(position(dest.join("src")) < position(dest.join("src/index.jsx")));
    assert!(position(dest.join("src")) < position(dest.join("src/util.js")));
    assert!(position(dest.join("assets")) < position(dest.join("assets/logo.svg")));
}

#[tokio::test]
async fn walker_on_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    let mapping = RootMapping::new(tmp.path().join("missing"), tmp.path().join("dest")).unwrap();
    let result = walk::plan(mapping).await;
    assert!(matches!(result, Err(Error::MissingPath { .. })));
}

// ── Materializing ───────────────────────────────────────────────────

#[tokio::test]
async fn materialize_mirrors_tree_with_rewritten_extensions() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    let summary = materialize::materialize(mapping, &DowngradeOptions::default())
        .await
        .unwrap();

    assert_eq!(
        summary,
        Summary {
            directories: 3,
            copied: 2,
            downgraded: 2,
        }
    );

    let expected: Vec<String> = tree(&source)
        .into_iter()
        .map(|p| p.replace(".tsx", ".jsx").replace("util.ts", "util.js"))
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    assert_eq!(tree(&dest), expected);
}

#[tokio::test]
async fn materialize_creates_missing_destination_root() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("README.md"), "# Hello\n").unwrap();
    let dest = tmp.path().join("fresh");

    let mapping = RootMapping::new(&source, &dest).unwrap();
    let summary = materialize::materialize(mapping, &DowngradeOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.copied, 1);
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "# Hello\n");
}

#[tokio::test]
async fn materialize_missing_source_leaves_no_destination() {
    let tmp = TempDir::new().unwrap();
    let dest = tmp.path().join("fresh");
    let mapping = RootMapping::new(tmp.path().join("missing"), &dest).unwrap();

    let result = materialize::materialize(mapping, &DowngradeOptions::default()).await;
    assert!(matches!(result, Err(Error::MissingPath { .. })));
    assert!(!dest.exists());
}

#[tokio::test]
async fn materialize_copies_other_files_byte_for_byte() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    materialize::materialize(mapping, &DowngradeOptions::default())
        .await
        .unwrap();

    assert_eq!(
        fs::read(dest.join("assets/logo.svg")).unwrap(),
        fs::read(source.join("assets/logo.svg")).unwrap()
    );
    assert_eq!(
        fs::read(dest.join("README.md")).unwrap(),
        fs::read(source.join("README.md")).unwrap()
    );
}

#[tokio::test]
async fn materialize_downgrades_typed_sources() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    materialize::materialize(mapping, &DowngradeOptions::default())
        .await
        .unwrap();

    let index = fs::read_to_string(dest.join("src/index.jsx")).unwrap();
    assert!(index.contains("const App = (props) => <h1>Hello {props.name}</h1>;"));
    assert!(index.contains("document.getElementById(\"root\"));"));
    assert!(!index.contains("string"));

    let util = fs::read_to_string(dest.join("src/util.js")).unwrap();
    assert_eq!(util, "export const twice = (n) => n * 2;\n");

    assert!(!dest.join("src/index.tsx").exists());
    assert!(!dest.join("src/util.ts").exists());
}

#[tokio::test]
async fn materialize_refuses_to_overwrite() {
    let (_tmp, source, dest) = setup();
    fs::write(dest.join("README.md"), "keep me").unwrap();

    let mapping = RootMapping::new(&source, &dest).unwrap();
    let result = materialize::materialize(mapping, &DowngradeOptions::default()).await;

    match result {
        Err(Error::Collision { path }) => assert!(path.ends_with("README.md")),
        other => panic!("expected collision, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(dest.join("README.md")).unwrap(), "keep me");
}

#[tokio::test]
async fn rerun_over_partial_destination_fails() {
    let (_tmp, source, dest) = setup();
    let mapping = RootMapping::new(&source, &dest).unwrap();
    materialize::materialize(mapping.clone(), &DowngradeOptions::default())
        .await
        .unwrap();

    let again = materialize::materialize(mapping, &DowngradeOptions::default()).await;
    assert!(matches!(again, Err(Error::Collision { .. })));
}

#[tokio::test]
async fn downgrade_collision_keeps_existing_output() {
    let (_tmp, source, dest) = setup();
    fs::create_dir_all(dest.join("src")).unwrap();
    fs::write(dest.join("src/util.js"), "original").unwrap();

    let op = Operation::Downgrade {
        source: source.join("src/util.ts"),
        dest: dest.join("src/util.js"),
        dialect: solid_create::Dialect::TypeScript,
    };
    let result = apply(&op, &DowngradeOptions::default()).await;
    assert!(matches!(result, Err(Error::Collision { .. })));
    assert_eq!(fs::read_to_string(dest.join("src/util.js")).unwrap(), "original");
}

#[tokio::test]
async fn create_dir_is_idempotent() {
    let (_tmp, _source, dest) = setup();
    let dir = dest.join("nested/deeper");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("keep.txt"), "still here").unwrap();

    let op = Operation::CreateDir { dest: dir.clone() };
    apply(&op, &DowngradeOptions::default()).await.unwrap();
    apply(&op, &DowngradeOptions::default()).await.unwrap();

    assert_eq!(fs::read_to_string(dir.join("keep.txt")).unwrap(), "still here");
}

#[tokio::test]
async fn syntax_error_names_the_source_file() {
    let (_tmp, source, dest) = setup();
    fs::write(source.join("src/broken.ts"), "const = ;\n").unwrap();

    let mapping = RootMapping::new(&source, &dest).unwrap();
    let result = materialize::materialize(mapping, &DowngradeOptions::default()).await;
    match result {
        Err(Error::Syntax { path, .. }) => assert!(path.ends_with("src/broken.ts")),
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert!(!dest.join("src/broken.js").exists());
}
