mod common;

use std::fs;

use jaif::common::{ClassBuilder, MethodBuilder, SymbolEnvironment};
use jaif::wash::Injector;
use jaif::{Config, Error, IndexSource};
use tempfile::TempDir;

fn write(dir: &TempDir, relative: &str, contents: &str) {
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create directories");
    }
    fs::write(path, contents).expect("write index file");
}

#[test]
fn directory_scan_reads_index_files_in_path_order() {
    common::init_logging();
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "b.jaif", "package b:");
    write(&dir, "a.jaif", "package a:");
    write(&dir, "nested/c.jaif", "package c:");
    write(&dir, "notes.txt", "package ignored:");

    let loaded = Config::new().with_index_path(dir.path()).load_sources().expect("sources load");
    let texts: Vec<&str> = loaded.iter().map(|(_, text)| text.as_str()).collect();
    assert_eq!(texts, ["package a:", "package b:", "package c:"]);
    assert!(loaded.iter().all(|(origin, _)| origin.ends_with(".jaif")));
}

#[test]
fn single_file_and_inline_sources_keep_configured_order() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "one.jaif", "package one:");
    let config = Config::new()
        .with_index_text("inline", "package inline:")
        .with_index_path(dir.path().join("one.jaif"));
    let loaded = config.load_sources().expect("sources load");
    assert_eq!(loaded[0], ("inline".to_string(), "package inline:".to_string()));
    assert_eq!(loaded[1].1, "package one:");
}

#[test]
fn injector_loads_a_directory_of_fragments() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "01-types.jaif", "package p: annotation @Marker:");
    write(&dir, "02-uses.jaif", "package p: class Test: method run()V: @Marker");
    write(&dir, "03-broken.jaif", "package p: class Test: method run(V: @Marker");

    let mut env = SymbolEnvironment::new();
    env.add_unit("p", vec![ClassBuilder::class("Test").method(MethodBuilder::new("run"))]);
    let mut injector = Injector::new(&Config::new().with_index_path(dir.path())).expect("index loads");
    assert_eq!(injector.diagnostics().len(), 1);
    assert!(injector.diagnostics()[0].is_malformed_entry());

    injector.inject_all(&mut env).expect("injection runs");
    let run = env.find("p.Test").and_then(|c| c.method("run").cloned()).expect("method");
    assert_eq!(run.annotations[0].type_name, "p.Marker");
}

#[test]
fn unreadable_source_fails_injector_construction() {
    let dir = TempDir::new().expect("temp dir");
    let config = Config::new().with_index_path(dir.path().join("missing.jaif"));
    match Injector::new(&config) {
        Err(Error::IndexSource { path, .. }) => assert!(path.ends_with("missing.jaif")),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("missing index file was accepted"),
    }
}

// The only test in this binary that touches the process environment.
#[test]
fn environment_overrides_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let other = TempDir::new().expect("temp dir");
    let paths = format!("{}:{}", dir.path().display(), other.path().display());

    std::env::set_var("JAIF_NULLABILITY", "true");
    std::env::set_var("JAIF_STRIP_REFLECTION", "0");
    std::env::set_var("JAIF_ANNOTATIONS", &paths);
    let config = Config::from_env().expect("valid environment");
    assert!(config.nullability);
    assert!(!config.strip_reflection);
    assert_eq!(
        config.annotation_sources,
        vec![IndexSource::Path(dir.path().to_path_buf()), IndexSource::Path(other.path().to_path_buf())]
    );

    // environment wins over builder flags; paths go after configured sources
    let layered = Config::new().with_strip_reflection(true).with_index_text("inline", "").apply_env().expect("valid");
    assert!(!layered.strip_reflection);
    assert_eq!(layered.annotation_sources.len(), 3);

    std::env::set_var("JAIF_NULLABILITY", "maybe");
    assert!(matches!(Config::from_env(), Err(Error::Config { .. })));

    std::env::remove_var("JAIF_NULLABILITY");
    std::env::remove_var("JAIF_STRIP_REFLECTION");
    std::env::remove_var("JAIF_ANNOTATIONS");
    assert_eq!(Config::from_env().expect("empty environment"), Config::default());
}
