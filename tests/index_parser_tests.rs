mod common;

use jaif::ast::{ElementPath, MemberSignature, ParsedValue};
use jaif::common::types::{ElementType, PrimitiveType};
use jaif::common::TypeRef;
use jaif::parser::{parse_fragments, parse_index};
use jaif::wash::Diagnostic;

#[test]
fn recovery_keeps_entries_around_malformed_block() {
    common::init_logging();
    let source = r#"
package p:
  class Test:
    method good()V: @p.A
    method broken(Lp/Missing)V: @p.A
      return: @p.B
    method after()Ljava/lang/String;:
      return: @p.B
  class Other:
    field f: @p.A
"#;
    let out = parse_index(source);
    assert_eq!(out.diagnostics.len(), 1);
    match &out.diagnostics[0] {
        Diagnostic::MalformedIndexEntry { location, line, .. } => {
            assert_eq!(location.line, 5);
            assert_eq!(line, "method broken(Lp/Missing)V: @p.A");
        }
        other => panic!("unexpected diagnostic {other:?}"),
    }
    let members: Vec<_> = out
        .index
        .entries()
        .iter()
        .map(|e| (e.owner.as_str(), e.member.as_ref().map(|m| m.name().to_string())))
        .collect();
    assert_eq!(
        members,
        vec![
            ("p.Test", Some("good".to_string())),
            ("p.Test", Some("after".to_string())),
            ("p.Other", Some("f".to_string())),
        ]
    );
}

#[test]
fn malformed_class_header_skips_its_members_quietly() {
    let source = "package p: class : method a()V: @p.A method b()V: @p.A class Ok: @p.A";
    let out = parse_index(source);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.index.len(), 1);
    assert_eq!(out.index.entries()[0].owner, "p.Ok");
}

#[test]
fn members_before_any_class_are_malformed() {
    let out = parse_index("package p: method a()V: @p.A class T: method b()V: @p.A");
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.index.len(), 1);
    assert_eq!(out.index.entries()[0].owner, "p.T");
}

#[test]
fn unknown_characters_are_malformed_entries() {
    // `%` ends the entry for `a` while it is still being built
    let out = parse_index("package p: class T: method a()V: @p.A % method b()V: @p.B");
    assert_eq!(out.diagnostics.len(), 1);
    assert!(out.diagnostics[0].is_malformed_entry());
    assert_eq!(out.index.len(), 1);
    assert_eq!(out.index.entries()[0].member.as_ref().map(|m| m.name()), Some("b"));
}

#[test]
fn malformed_sub_entry_is_excluded_but_earlier_ones_stay() {
    let source = "package p: class T: \
        method a()Ljava/lang/String;: @p.A \
          return: @p.B(1) % \
        method b()V: @p.C";
    let out = parse_index(source);
    assert_eq!(out.diagnostics.len(), 1);
    let kept: Vec<(String, ElementPath)> = out
        .index
        .entries()
        .iter()
        .map(|e| (e.annotations[0].type_name.clone(), e.path))
        .collect();
    assert_eq!(
        kept,
        vec![("p.A".to_string(), ElementPath::Declaration), ("p.C".to_string(), ElementPath::Declaration)]
    );
}

#[test]
fn index_keywords_are_names_outside_block_headers() {
    let source = r#"
package javax.annotation:
  annotation @Nullable:
    @java.lang.annotation.Retention(value=RUNTIME)
    @java.lang.annotation.Target(value={METHOD, FIELD, PARAMETER})
package p:
  class Test:
    method type(Ljavax/annotation/Nullable;)Ljava/lang/String;:
      @javax.annotation.Nullable
      return: @javax.annotation.Nonnull
    method field()V: @p.method.Marker
    field type: @p.A
    field annotation:
      type: @javax.annotation.Nullable
"#;
    let out = parse_index(source);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);

    let decl = out.index.declaration("javax.annotation.Nullable").expect("declared");
    let meta: Vec<&str> = decl.annotations.iter().map(|a| a.type_name.as_str()).collect();
    assert_eq!(meta, ["java.lang.annotation.Retention", "java.lang.annotation.Target"]);

    let entries: Vec<(&str, &str, ElementPath)> = out
        .index
        .entries()
        .iter()
        .map(|e| {
            let member = e.member.as_ref().map(|m| m.name()).unwrap_or("");
            (member, e.annotations[0].type_name.as_str(), e.path)
        })
        .collect();
    assert_eq!(
        entries,
        vec![
            ("type", "javax.annotation.Nullable", ElementPath::Declaration),
            ("type", "javax.annotation.Nonnull", ElementPath::ReturnType),
            ("field", "p.method.Marker", ElementPath::Declaration),
            ("type", "p.A", ElementPath::Declaration),
            ("annotation", "javax.annotation.Nullable", ElementPath::FieldType),
        ]
    );
    match &out.index.entries()[0].member {
        Some(MemberSignature::Method { descriptor, .. }) => {
            assert_eq!(descriptor.parameters, vec![TypeRef::class("javax.annotation.Nullable")]);
        }
        other => panic!("unexpected member {other:?}"),
    }
}

#[test]
fn recovery_does_not_stop_inside_qualified_names() {
    let source = "package p: class T: method a(I: @javax.annotation.Nonnull method b()V: @p.B";
    let out = parse_index(source);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.index.len(), 1);
    assert_eq!(out.index.entries()[0].member.as_ref().map(|m| m.name()), Some("b"));
}

#[test]
fn comments_and_unnamed_package() {
    let source = r#"
// leading comment
package:
  /* block
     comment */
  class Top:
    @Deprecated // trailing comment
"#;
    let out = parse_index(source);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let entry = &out.index.entries()[0];
    assert_eq!(entry.owner, "Top");
    assert_eq!(entry.package, "");
    assert!(entry.is_type_level());
}

#[test]
fn element_paths_and_descriptors() {
    let source = r#"
package p:
  class Test$Inner:
    method <init>(I[[Ljava/lang/String;)V:
      parameter #1: @p.A
        type: @p.B
    method get()[J:
      @p.C
      return: @p.D
    field name:
      type: @p.E
"#;
    let out = parse_index(source);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let paths: Vec<ElementPath> = out.index.entries().iter().map(|e| e.path).collect();
    assert_eq!(
        paths,
        vec![
            ElementPath::Parameter(1),
            ElementPath::ParameterType(1),
            ElementPath::Declaration,
            ElementPath::ReturnType,
            ElementPath::FieldType,
        ]
    );
    assert!(out.index.entries().iter().all(|e| e.owner == "p.Test$Inner"));
    match &out.index.entries()[0].member {
        Some(MemberSignature::Method { name, descriptor }) => {
            assert_eq!(name, "<init>");
            assert_eq!(
                descriptor.parameters,
                vec![
                    TypeRef::Primitive(PrimitiveType::Int),
                    TypeRef::array_of(TypeRef::array_of(TypeRef::string())),
                ]
            );
            assert_eq!(descriptor.return_type, TypeRef::Void);
        }
        other => panic!("unexpected member {other:?}"),
    }
}

#[test]
fn annotation_values() {
    let source = r#"
package p:
  class T:
    @p.V(b = true, i = -3, l = 0x10L, f = 2.5, c = 'x', s = "a\tb", e = p.Level.FULL,
         k = java.lang.String.class, arr = {1, 2}, empty = {}, nested = @p.N(1))
"#;
    let out = parse_index(source);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let a = &out.index.entries()[0].annotations[0];
    assert_eq!(a.value("b"), Some(&ParsedValue::Bool(true)));
    assert_eq!(a.value("i"), Some(&ParsedValue::Int(-3)));
    assert_eq!(a.value("l"), Some(&ParsedValue::Int(16)));
    assert_eq!(a.value("f"), Some(&ParsedValue::Float(2.5)));
    assert_eq!(a.value("c"), Some(&ParsedValue::Char('x')));
    assert_eq!(a.value("s"), Some(&ParsedValue::Str("a\tb".to_string())));
    assert_eq!(a.value("e"), Some(&ParsedValue::Name("p.Level.FULL".to_string())));
    assert_eq!(a.value("k"), Some(&ParsedValue::ClassLiteral("java.lang.String".to_string())));
    assert_eq!(a.value("arr"), Some(&ParsedValue::Array(vec![ParsedValue::Int(1), ParsedValue::Int(2)])));
    assert_eq!(a.value("empty"), Some(&ParsedValue::Array(Vec::new())));
    match a.value("nested") {
        Some(ParsedValue::Annotation(n)) => assert_eq!(n.value("value"), Some(&ParsedValue::Int(1))),
        other => panic!("unexpected nested value {other:?}"),
    }
}

#[test]
fn annotation_declarations() {
    let source = r#"
package com.google.j2objc.annotations:
  annotation @ReflectionSupport:
    enum com.google.j2objc.annotations.ReflectionSupport.Level value
  annotation @Holder:
    annotation-field Inner[] items
    Class type = java.lang.Object.class
    double ratio = 1
"#;
    let out = parse_index(source);
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let rs = out.index.declaration("com.google.j2objc.annotations.ReflectionSupport").expect("declared");
    let level = "com.google.j2objc.annotations.ReflectionSupport.Level".to_string();
    assert_eq!(rs.elements[0].ty, ElementType::Enum(level));
    let holder = out.index.declaration_by_simple_name("Holder").expect("declared");
    assert_eq!(holder.elements[0].ty, ElementType::Array(Box::new(ElementType::Annotation("Inner".to_string()))));
    assert_eq!(holder.elements[1].default, Some(ParsedValue::ClassLiteral("java.lang.Object".to_string())));
    assert_eq!(holder.elements[2].ty, ElementType::Primitive(PrimitiveType::Double));
}

#[test]
fn idempotent_load_duplicates_entries_for_the_same_members() {
    let text = "package p: class T: method foo()V: @p.A";
    let once = parse_index(text);
    let twice = parse_fragments([text, text]);
    assert_eq!(twice.index.len(), 2 * once.index.len());
    let entries = twice.index.entries();
    assert_eq!(entries[0].member, entries[1].member);
    assert_eq!(entries[0].path, entries[1].path);
}
