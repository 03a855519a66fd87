//! Integration tests for the pass-through script pipeline: mirror and concat
//! output shapes, artifact naming, and mtime-based pruning.

mod helpers;

use std::time::Duration;

use tempfile::TempDir;

use helpers::{bump_mtime, mtime, pattern, read, write_file};
use millwork::{build_scripts, OutputMode};

const OUTER: &str = "function outer(value) {\n    return value + 1;\n}\nwindow.outer = outer;\n";
const INNER: &str = "function inner(value) {\n    return value - 1;\n}\nwindow.inner = inner;\n";

#[tokio::test]
async fn test_mirror_preserves_structure_under_destination() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/outer.js", OUTER);
    write_file(tmp.path(), "src/deep/inner.js", INNER);
    let dest = tmp.path().join("dist");

    let report = build_scripts(
        pattern(tmp.path(), "src/**/*.js"),
        OutputMode::mirror_into(&dest),
    )
    .await
    .unwrap();

    assert_eq!(report.artifacts.len(), 2);
    assert_eq!(report.skipped, 0);
    assert!(dest.join("outer.min.js").is_file());
    assert!(dest.join("outer.min.js.map").is_file());
    assert!(dest.join("deep/inner.min.js").is_file());
    assert!(dest.join("deep/inner.min.js.map").is_file());

    let minified = read(&dest.join("outer.min.js"));
    assert!(minified.len() < OUTER.len());
    assert!(minified.contains("window.outer"));
    assert!(minified.contains("//# sourceMappingURL=outer.min.js.map"));
}

#[tokio::test]
async fn test_mirror_without_destination_writes_alongside_sources() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/app.js", OUTER);

    build_scripts(pattern(tmp.path(), "src/*.js"), OutputMode::mirror())
        .await
        .unwrap();

    assert!(tmp.path().join("src/app.min.js").is_file());
    assert!(tmp.path().join("src/app.min.js.map").is_file());
}

#[tokio::test]
async fn test_fresh_artifacts_are_skipped_without_writes() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/outer.js", OUTER);
    write_file(tmp.path(), "src/deep/inner.js", INNER);
    let dest = tmp.path().join("dist");
    let spec = pattern(tmp.path(), "src/**/*.js");

    build_scripts(spec.clone(), OutputMode::mirror_into(&dest))
        .await
        .unwrap();
    let outer_before = mtime(&dest.join("outer.min.js"));
    let inner_before = mtime(&dest.join("deep/inner.min.js"));

    let report = build_scripts(spec, OutputMode::mirror_into(&dest))
        .await
        .unwrap();

    assert!(report.artifacts.is_empty());
    assert_eq!(report.skipped, 2);
    assert_eq!(mtime(&dest.join("outer.min.js")), outer_before);
    assert_eq!(mtime(&dest.join("deep/inner.min.js")), inner_before);
}

#[tokio::test]
async fn test_touching_one_source_rebuilds_only_its_artifact() {
    let tmp = TempDir::new().unwrap();
    let outer = write_file(tmp.path(), "src/outer.js", OUTER);
    write_file(tmp.path(), "src/deep/inner.js", INNER);
    let dest = tmp.path().join("dist");
    let spec = pattern(tmp.path(), "src/**/*.js");

    build_scripts(spec.clone(), OutputMode::mirror_into(&dest))
        .await
        .unwrap();
    let inner_before = mtime(&dest.join("deep/inner.min.js"));
    bump_mtime(&outer, Duration::from_secs(5));

    let report = build_scripts(spec, OutputMode::mirror_into(&dest))
        .await
        .unwrap();

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.skipped, 1);
    assert!(report.artifacts[0].ends_with("outer.min.js"));
    assert_eq!(mtime(&dest.join("deep/inner.min.js")), inner_before);
}

#[tokio::test]
async fn test_concat_combines_all_inputs_into_one_artifact() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/a.js", OUTER);
    write_file(tmp.path(), "src/b.js", INNER);
    let dest = tmp.path().join("out");

    let report = build_scripts(
        pattern(tmp.path(), "src/*.js"),
        OutputMode::concat(&dest, "bundle.min.js"),
    )
    .await
    .unwrap();

    assert_eq!(report.artifacts.len(), 1);
    let combined = read(&dest.join("bundle.min.js"));
    assert!(combined.contains("window.outer"));
    assert!(combined.contains("window.inner"));
    assert!(dest.join("bundle.min.js.map").is_file());
    // One artifact, one map, nothing else.
    assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 2);
}

#[tokio::test]
async fn test_explicit_path_list_matches_equivalent_glob() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "src/a.js", OUTER);
    let b = write_file(tmp.path(), "src/b.js", INNER);

    let glob_dest = tmp.path().join("from_glob");
    build_scripts(
        pattern(tmp.path(), "src/*.js"),
        OutputMode::concat(&glob_dest, "bundle.min.js"),
    )
    .await
    .unwrap();

    let list_dest = tmp.path().join("from_list");
    build_scripts(
        vec![a.display().to_string(), b.display().to_string()],
        OutputMode::concat(&list_dest, "bundle.min.js"),
    )
    .await
    .unwrap();

    assert_eq!(
        read(&glob_dest.join("bundle.min.js")),
        read(&list_dest.join("bundle.min.js"))
    );
}

#[tokio::test]
async fn test_concat_rebuilds_when_any_input_changes() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/a.js", OUTER);
    let b = write_file(tmp.path(), "src/b.js", INNER);
    let dest = tmp.path().join("out");
    let spec = pattern(tmp.path(), "src/*.js");

    build_scripts(spec.clone(), OutputMode::concat(&dest, "bundle.min.js"))
        .await
        .unwrap();

    // Fresh: the whole invocation is a no-op.
    let fresh = build_scripts(spec.clone(), OutputMode::concat(&dest, "bundle.min.js"))
        .await
        .unwrap();
    assert!(fresh.artifacts.is_empty());
    assert_eq!(fresh.skipped, 2);

    // One touched input regenerates the combined artifact from all inputs.
    write_file(tmp.path(), "src/b.js", "window.replacement = 42;\n");
    bump_mtime(&b, Duration::from_secs(5));
    let rebuilt = build_scripts(spec, OutputMode::concat(&dest, "bundle.min.js"))
        .await
        .unwrap();

    assert_eq!(rebuilt.artifacts.len(), 1);
    let combined = read(&dest.join("bundle.min.js"));
    assert!(combined.contains("window.replacement"));
    assert!(combined.contains("window.outer"));
}

#[tokio::test]
async fn test_broken_source_fails_the_invocation() {
    let tmp = TempDir::new().unwrap();
    write_file(tmp.path(), "src/bad.js", "function ( {");

    let result = build_scripts(pattern(tmp.path(), "src/*.js"), OutputMode::mirror()).await;

    assert!(matches!(result, Err(millwork::Error::Minify { .. })));
}
