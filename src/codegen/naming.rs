//! Objective-C names for Java symbols
//!
//! Selectors are derived from the Java method name and parameter types
//! (`fooWithInt:withNSString:`) unless the method carries
//! `@ObjectiveCName`, which replaces the selector outright.

use crate::common::symbols::{find_annotation, AnnotationValue, ClassId, MethodSymbol};
use crate::common::types::{PrimitiveType, TypeRef};
use crate::common::SymbolEnvironment;
use crate::consts::{JUNIT3_TEST_CASE, NESTED_CLASS_DELIMITER, OBJECTIVE_C_NAME_ANNOTATION};

/// `java.lang.Thread` → `JavaLangThread`, `p.Outer$Inner` → `POuter_Inner`
pub fn objc_class_name(binary_name: &str) -> String {
    match binary_name {
        "java.lang.String" => return "NSString".to_string(),
        "java.lang.Object" => return "NSObject".to_string(),
        _ => {}
    }
    let mut out = String::with_capacity(binary_name.len());
    for segment in binary_name.split('.') {
        out.push_str(&capitalize(segment));
    }
    out.replace(NESTED_CLASS_DELIMITER, "_")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn primitive_selector_name(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Boolean => "Boolean",
        PrimitiveType::Byte => "Byte",
        PrimitiveType::Char => "Char",
        PrimitiveType::Short => "Short",
        PrimitiveType::Int => "Int",
        PrimitiveType::Long => "Long",
        PrimitiveType::Float => "Float",
        PrimitiveType::Double => "Double",
    }
}

/// Name of a parameter type as it appears inside a selector
pub fn selector_type_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Void => "Void".to_string(),
        TypeRef::Primitive(p) => primitive_selector_name(*p).to_string(),
        TypeRef::Class(name) if name == "java.lang.Object" => "Id".to_string(),
        TypeRef::Class(name) => objc_class_name(name),
        TypeRef::Array(_) => {
            let mut dims = 0;
            let mut element = ty;
            while let TypeRef::Array(inner) = element {
                dims += 1;
                element = inner;
            }
            let base = selector_type_name(element);
            if dims == 1 {
                format!("{}Array", base)
            } else {
                format!("{}Array{}", base, dims)
            }
        }
    }
}

/// Explicit `@ObjectiveCName` selector, if any
pub fn renamed_selector(method: &MethodSymbol) -> Option<&str> {
    find_annotation(&method.annotations, OBJECTIVE_C_NAME_ANNOTATION)
        .and_then(|a| a.value("value"))
        .and_then(AnnotationValue::as_str)
}

/// Selector for a method or constructor
pub fn selector(method: &MethodSymbol) -> String {
    if let Some(name) = renamed_selector(method) {
        return name.to_string();
    }
    let base = if method.is_constructor() { "init" } else { method.name.as_str() };
    let mut out = base.to_string();
    for (i, ty) in method.parameter_types().enumerate() {
        out.push_str(if i == 0 { "With" } else { "with" });
        out.push_str(&selector_type_name(ty));
        out.push(':');
    }
    out
}

/// Whether the class inherits from the JUnit 3 `TestCase` base
pub fn is_junit3_test(env: &SymbolEnvironment, class: ClassId) -> bool {
    env.superclass_chain(class).iter().any(|name| name == JUNIT3_TEST_CASE)
}

/// Java name recorded for a method in reflection metadata.
///
/// A method renamed with `@ObjectiveCName` keeps its Java name in metadata,
/// except in JUnit 3 test classes where the name is dropped so the test
/// runner does not discover the renamed method.
pub fn metadata_original_name<'m>(
    env: &SymbolEnvironment,
    class: ClassId,
    method: &'m MethodSymbol,
) -> Option<&'m str> {
    if renamed_selector(method).is_some() && is_junit3_test(env, class) {
        return None;
    }
    Some(&method.name)
}
