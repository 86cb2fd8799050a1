mod common;

use common::*;
use jaif::codegen::Nullability;
use jaif::common::types::{RetentionPolicy, TargetKind};
use jaif::common::{ClassBuilder, MethodBuilder, PrimitiveType, SymbolEnvironment, TypeRef};
use jaif::parser::parse_index;
use jaif::wash::{AnnotationTypeCache, Synthesizer};
use jaif::Config;

fn string_method(name: &str) -> MethodBuilder {
    MethodBuilder::new(name).returns(TypeRef::string())
}

#[test]
fn return_type_instance_method() {
    init_logging();
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test")
            .method(string_method("foo"))
            .method(string_method("bar"))
            .method(string_method("baz"))],
    );
    let reports = translate(&nullability_config(SIMPLE_NULLABILITY_ANNOTATIONS), &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "- (NSString * __nonnull)foo;");
    assert_declares(test, "- (NSString * __nullable)bar;");
    assert_declares(test, "- (NSString *)baz;");
    assert!(test.method("qux").is_none());

    let class = env.find("p.Test").expect("class");
    assert!(class.method("qux").is_none());
    // type annotation on the return type, declaration annotation on the method
    let foo = class.method("foo").expect("foo");
    assert_eq!(foo.return_type.annotations[0].type_name, "p.NonNull");
    assert!(foo.annotations.is_empty());
    let bar = class.method("bar").expect("bar");
    assert_eq!(bar.annotations[0].type_name, "p.Nullable");
    assert!(bar.return_type.annotations.is_empty());
    let baz = class.method("baz").expect("baz");
    assert!(baz.annotations.is_empty() && baz.return_type.annotations.is_empty());
}

#[test]
fn return_type_class_method() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test")
            .method(string_method("foo").with_static())
            .method(string_method("bar").with_static())],
    );
    let reports = translate(&nullability_config(SIMPLE_NULLABILITY_ANNOTATIONS), &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "+ (NSString * __nonnull)foo;");
    assert_declares(test, "+ (NSString * __nullable)bar;");
}

#[test]
fn return_type_enum_method() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::enumeration("Test").method(string_method("foo")).method(string_method("bar"))],
    );
    let reports = translate(&nullability_config(SIMPLE_NULLABILITY_ANNOTATIONS), &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "- (NSString * __nonnull)foo;");
    assert_declares(test, "- (NSString * __nullable)bar;");
}

#[test]
fn return_type_interface_method() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::interface("Test")
            .method(string_method("foo").modifiers(&[jaif::common::Modifier::Public, jaif::common::Modifier::Abstract]))
            .method(
                string_method("bar").modifiers(&[jaif::common::Modifier::Public, jaif::common::Modifier::Default]),
            )],
    );
    let reports = translate(&nullability_config(SIMPLE_NULLABILITY_ANNOTATIONS), &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "- (NSString * __nonnull)foo;");
    assert_declares(test, "- (NSString * __nullable)bar;");
}

#[test]
fn return_type_nested_class_method() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let both = |c: ClassBuilder| c.method(string_method("foo")).method(string_method("bar"));
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test")
            .nested(both(ClassBuilder::class("StaticNestedClass").with_static()))
            .nested(both(ClassBuilder::class("InnerClass")))],
    );
    let entries = "class Test$StaticNestedClass: \
          method foo()Ljava/lang/String;: \
            return: @p.NonNull \
        class Test$InnerClass: \
          method bar()Ljava/lang/String;: \
            return: @p.Nullable";
    let reports = translate(&nullability_config(entries), &mut env, unit);

    let nested = report(&reports, "p.Test$StaticNestedClass");
    assert_declares(nested, "- (NSString * __nonnull)foo;");
    assert_declares(nested, "- (NSString *)bar;");
    let inner = report(&reports, "p.Test$InnerClass");
    assert_declares(inner, "- (NSString *)foo;");
    assert_declares(inner, "- (NSString * __nullable)bar;");
    assert!(report(&reports, "p.Test").methods.is_empty());
}

#[test]
fn return_type_primitive_is_never_annotated() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test")
            .method(MethodBuilder::new("foo").returns(TypeRef::Primitive(PrimitiveType::Boolean)))],
    );
    let entries = "class Test: method foo()Z: @Deprecated return: @p.NonNull";
    let reports = translate(&nullability_config(entries), &mut env, unit);
    assert_declares(report(&reports, "p.Test"), "- (jboolean)foo;");

    let foo = env.find("p.Test").and_then(|c| c.method("foo").cloned()).expect("foo");
    assert!(foo.return_type.annotations.is_empty());
    // the declaration entry on the same method still applies
    assert_eq!(foo.annotations[0].type_name, "java.lang.Deprecated");
}

#[test]
fn visiting_constructor() {
    let mut env = SymbolEnvironment::new();
    env.add_unit("p", vec![ClassBuilder::annotation_type("AnAnnotation")]);
    let unit = env.add_unit("p", vec![ClassBuilder::class("Test").method(MethodBuilder::constructor())]);
    let config = Config::new().with_nullability(true).with_index_text(
        "ctor",
        "package p: annotation @AnAnnotation: class Test: method <init>()V: @p.AnAnnotation",
    );
    let reports = translate(&config, &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "- (instancetype __nonnull)init;");
    assert_eq!(test.methods[0].return_nullability, Some(Nullability::NonNull));
    let ctor = env.find("p.Test").and_then(|c| c.constructors().next().cloned()).expect("constructor");
    assert_eq!(ctor.annotations[0].type_name, "p.AnAnnotation");
}

#[test]
fn parameter_declarations_keep_their_types() {
    let mut env = SymbolEnvironment::new();
    env.add_unit("p", vec![ClassBuilder::annotation_type("AnAnnotation")]);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test")
            .method(MethodBuilder::new("foo").param("t", TypeRef::class("java.lang.Thread")))
            .method(MethodBuilder::new("bar").param("t", TypeRef::class("java.lang.ThreadGroup")))],
    );
    let config = Config::new().with_nullability(true).with_index_text(
        "forward",
        "package p: annotation @AnAnnotation: class Test: method foo(Ljava/lang/Thread;)V: @p.AnAnnotation",
    );
    let reports = translate(&config, &mut env, unit);
    let test = report(&reports, "p.Test");
    assert_declares(test, "- (void)fooWithJavaLangThread:(JavaLangThread *)t;");
    assert_declares(test, "- (void)barWithJavaLangThreadGroup:(JavaLangThreadGroup *)t;");
}

#[test]
fn parameter_nullability_from_index() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit(
        "p",
        vec![ClassBuilder::class("Test").method(
            MethodBuilder::new("put")
                .param("key", TypeRef::string())
                .param("count", TypeRef::Primitive(PrimitiveType::Int))
                .param("value", TypeRef::object()),
        )],
    );
    let entries = "class Test: method put(Ljava/lang/String;ILjava/lang/Object;)V: \
        parameter #0: type: @p.NonNull \
        parameter #1: type: @p.NonNull \
        parameter #2: @p.Nullable";
    let reports = translate(&nullability_config(entries), &mut env, unit);
    assert_declares(
        report(&reports, "p.Test"),
        "- (void)putWithNSString:(NSString * __nonnull)key withInt:(jint)count withId:(id __nullable)value;",
    );
}

#[test]
fn nullability_disabled_emits_plain_declarations() {
    let mut env = SymbolEnvironment::new();
    add_nullability_sources(&mut env);
    let unit = env.add_unit("p", vec![ClassBuilder::class("Test").method(string_method("foo"))]);
    let config = nullability_config(SIMPLE_NULLABILITY_ANNOTATIONS).with_nullability(false);
    let reports = translate(&config, &mut env, unit);
    assert_declares(report(&reports, "p.Test"), "- (NSString *)foo;");
    // the annotation is still injected; only the output ignores it
    let foo = env.find("p.Test").and_then(|c| c.method("foo").cloned()).expect("foo");
    assert_eq!(foo.return_type.annotations.len(), 1);
}

const INDEX_ONLY_DECLARATIONS: &str = "package p: \
    annotation @NonNull: \
      @java.lang.annotation.Retention(value=RUNTIME) \
      @java.lang.annotation.Target(value={TYPE_USE}) ";

#[test]
fn type_use_annotation_declared_only_in_the_index() {
    let mut env = SymbolEnvironment::new();
    let unit = env.add_unit("p", vec![ClassBuilder::class("Test").method(string_method("foo"))]);
    let text = format!("{}class Test: method foo()Ljava/lang/String;: return: @NonNull", INDEX_ONLY_DECLARATIONS);
    let config = Config::new().with_nullability(true).with_index_text("index-only", text.clone());
    let reports = translate(&config, &mut env, unit);
    assert_declares(report(&reports, "p.Test"), "- (NSString * __nonnull)foo;");

    let foo = env.find("p.Test").and_then(|c| c.method("foo").cloned()).expect("foo");
    assert_eq!(foo.return_type.annotations[0].type_name, "p.NonNull");
    assert_eq!(foo.return_type.annotations[0].retention, RetentionPolicy::Runtime);

    let parsed = parse_index(&text);
    let mut cache = AnnotationTypeCache::new();
    let mut diagnostics = Vec::new();
    let descriptor = Synthesizer::new(&env, &parsed.index, &mut cache, &mut diagnostics)
        .descriptor("p.NonNull")
        .expect("declared in the index");
    assert_eq!(descriptor.retention, RetentionPolicy::Runtime);
    assert_eq!(descriptor.targets, vec![TargetKind::TypeUse]);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}
