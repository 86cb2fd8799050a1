// Common test utilities
#![allow(dead_code)]

use jaif::codegen::{ClassReport, Translator};
use jaif::common::symbols::UnitId;
use jaif::common::{AnnotationMirror, AnnotationValue, ClassBuilder, SymbolEnvironment};
use jaif::common::types::RetentionPolicy;
use jaif::Config;

/// Route `log` output through the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Index header declaring the nullability annotations used by the scenarios.
/// `NonNull` is a type-use annotation, `Nullable` a plain declaration annotation.
pub const NULLABILITY_DECLARATIONS: &str = "package p: \
    annotation @NonNull: @java.lang.annotation.Target(value={TYPE_USE}) \
    annotation @Nullable: ";

/// Return-type `@NonNull` on `foo`, declaration `@Nullable` on `bar`, and an
/// entry for `qux`, which no scenario declares
pub const SIMPLE_NULLABILITY_ANNOTATIONS: &str = "class Test: \
      method foo()Ljava/lang/String;: \
        return: @p.NonNull \
      method bar()Ljava/lang/String;: @p.Nullable \
      method qux()Ljava/lang/String;: \
        return: @p.Nullable";

/// Source declarations of `p.NonNull` and `p.Nullable`, entered as their own unit
pub fn add_nullability_sources(env: &mut SymbolEnvironment) {
    let type_use = AnnotationMirror::new("java.lang.annotation.Target")
        .with_retention(RetentionPolicy::Runtime)
        .with_value(
            "value",
            AnnotationValue::Array(vec![AnnotationValue::Enum {
                type_name: "java.lang.annotation.ElementType".to_string(),
                constant: "TYPE_USE".to_string(),
            }]),
        );
    env.add_unit_at("p", Some("p/NonNull.java"), vec![ClassBuilder::annotation_type("NonNull").annotate(type_use)]);
    env.add_unit_at("p", Some("p/Nullable.java"), vec![ClassBuilder::annotation_type("Nullable")]);
}

pub fn nullability_config(entries: &str) -> Config {
    Config::new()
        .with_nullability(true)
        .with_index_text("nullability", format!("{}{}", NULLABILITY_DECLARATIONS, entries))
}

/// Translate `unit` with a fresh injector for `config`; the index text must parse cleanly
pub fn translate(config: &Config, env: &mut SymbolEnvironment, unit: UnitId) -> Vec<ClassReport> {
    let mut translator = Translator::new(config).expect("index sources load");
    let malformed: Vec<_> = translator.injector().diagnostics().iter().filter(|d| d.is_malformed_entry()).collect();
    assert!(malformed.is_empty(), "malformed index entries: {:#?}", malformed);
    translator.translate_unit(env, unit).expect("translation succeeds")
}

pub fn report<'r>(reports: &'r [ClassReport], binary_name: &str) -> &'r ClassReport {
    reports
        .iter()
        .find(|r| r.binary_name == binary_name)
        .unwrap_or_else(|| panic!("no report for {binary_name}"))
}

pub fn assert_declares(report: &ClassReport, declaration: &str) {
    let declarations = report.declarations();
    assert!(
        declarations.iter().any(|d| d == declaration),
        "expected `{}` in {:#?}",
        declaration,
        declarations
    );
}
