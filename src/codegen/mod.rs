//! Downstream passes over the enriched program model
//!
//! These passes stand in for the output generator: they read annotations
//! exactly the way generated headers and metadata would, without knowing
//! whether an annotation came from source or from the index.
//!
//! - nullability: `__nonnull`/`__nullable` on pointer types
//! - reflection: whether a class keeps reflection metadata
//! - naming: selectors and names recorded in metadata
//! - runtime: headers and constructors for runtime-retained annotations

pub mod naming;
pub mod nullability;
pub mod reflection;
pub mod runtime;

pub use naming::{metadata_original_name, objc_class_name, selector};
pub use nullability::{field_nullability, param_nullability, return_nullability, Nullability};
pub use reflection::{emits_metadata, reflection_support, ReflectionLevel};
pub use runtime::{runtime_annotation_refs, RuntimeAnnotationRef};

use crate::common::symbols::{ClassId, MethodSymbol, UnitId};
use crate::common::types::{PrimitiveType, TypeRef};
use crate::common::SymbolEnvironment;
use crate::config::Config;
use crate::error::Result;
use crate::wash::Injector;

/// What the generator would emit for one method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub java_name: String,
    pub selector: String,
    pub is_static: bool,
    pub is_constructor: bool,
    pub return_type: String,
    pub return_nullability: Option<Nullability>,
    pub params: Vec<(String, String, Option<Nullability>)>,
    /// Name recorded in reflection metadata; `None` when hidden
    pub metadata_name: Option<String>,
}

impl MethodReport {
    /// Header declaration, e.g. `- (NSString * __nonnull)foo;`
    pub fn declaration(&self) -> String {
        let prefix = if self.is_static { '+' } else { '-' };
        let mut out = format!("{} ({})", prefix, with_nullability(&self.return_type, self.return_nullability));
        let pieces: Vec<&str> = self.selector.split(':').filter(|p| !p.is_empty()).collect();
        if self.params.is_empty() {
            out.push_str(&self.selector);
        } else if pieces.len() == self.params.len() {
            for (i, (piece, (name, ty, nullability))) in pieces.iter().zip(&self.params).enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&format!("{}:({}){}", piece, with_nullability(ty, *nullability), name));
            }
        } else {
            out.push_str(self.selector.trim_end_matches(':'));
            for (name, ty, nullability) in &self.params {
                out.push_str(&format!(" :({}){}", with_nullability(ty, *nullability), name));
            }
        }
        out.push(';');
        out
    }
}

fn with_nullability(ty: &str, nullability: Option<Nullability>) -> String {
    match nullability {
        Some(n) => format!("{} {}", ty, n.specifier()),
        None => ty.to_string(),
    }
}

/// Objective-C spelling of a Java type in a declaration
pub fn objc_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Void => "void".to_string(),
        TypeRef::Primitive(p) => format!("j{}", p.keyword()),
        TypeRef::Class(name) if name == "java.lang.Object" => "id".to_string(),
        TypeRef::Class(name) => format!("{} *", objc_class_name(name)),
        TypeRef::Array(element) => match element.as_ref() {
            TypeRef::Primitive(p) => format!("IOS{}Array *", primitive_array_name(*p)),
            _ => "IOSObjectArray *".to_string(),
        },
    }
}

fn primitive_array_name(p: PrimitiveType) -> &'static str {
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

/// Everything the downstream passes decide about one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub binary_name: String,
    pub objc_name: String,
    pub emits_metadata: bool,
    pub methods: Vec<MethodReport>,
    pub runtime_annotations: Vec<RuntimeAnnotationRef>,
}

impl ClassReport {
    pub fn method(&self, java_name: &str) -> Option<&MethodReport> {
        self.methods.iter().find(|m| m.java_name == java_name)
    }

    /// Header declarations of all methods, in declaration order
    pub fn declarations(&self) -> Vec<String> {
        self.methods.iter().map(MethodReport::declaration).collect()
    }

    /// Names that end up in the class's reflection metadata
    pub fn metadata_names(&self) -> Vec<&str> {
        if !self.emits_metadata {
            return Vec::new();
        }
        self.methods.iter().filter_map(|m| m.metadata_name.as_deref()).collect()
    }
}

/// Runs injection on a unit, then the downstream passes on its classes
pub struct Translator<'c> {
    config: &'c Config,
    injector: Injector,
}

impl<'c> Translator<'c> {
    /// Load the configured index sources
    pub fn new(config: &'c Config) -> Result<Self> {
        Ok(Self { config, injector: Injector::new(config)? })
    }

    pub fn with_injector(config: &'c Config, injector: Injector) -> Self {
        Self { config, injector }
    }

    pub fn injector(&self) -> &Injector {
        &self.injector
    }

    /// Reports for every class of `unit`, top-level first
    pub fn translate_unit(&mut self, env: &mut SymbolEnvironment, unit: UnitId) -> Result<Vec<ClassReport>> {
        self.injector.inject_unit(env, unit)?;
        let reports: Vec<ClassReport> = env.unit_classes(unit).into_iter().map(|id| self.report(env, id)).collect();
        log::debug!("TRANSLATE: unit #{} produced {} class reports", unit.index(), reports.len());
        Ok(reports)
    }

    fn report(&self, env: &SymbolEnvironment, id: ClassId) -> ClassReport {
        let class = env.class(id);
        ClassReport {
            binary_name: class.binary_name.clone(),
            objc_name: objc_class_name(&class.binary_name),
            emits_metadata: emits_metadata(class, self.config.strip_reflection),
            methods: class.methods.iter().map(|m| self.method_report(env, id, m)).collect(),
            runtime_annotations: runtime_annotation_refs(class),
        }
    }

    fn method_report(&self, env: &SymbolEnvironment, class: ClassId, method: &MethodSymbol) -> MethodReport {
        let return_type = if method.is_constructor() {
            "instancetype".to_string()
        } else {
            objc_type(&method.return_type.ty)
        };
        MethodReport {
            java_name: method.name.clone(),
            selector: selector(method),
            is_static: method.is_static(),
            is_constructor: method.is_constructor(),
            return_type,
            return_nullability: return_nullability(method, self.config),
            params: method
                .params
                .iter()
                .map(|p| (p.name.clone(), objc_type(&p.ty.ty), param_nullability(p, self.config)))
                .collect(),
            metadata_name: metadata_original_name(env, class, method).map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(selector: &str, params: Vec<(String, String, Option<Nullability>)>) -> MethodReport {
        MethodReport {
            java_name: "foo".to_string(),
            selector: selector.to_string(),
            is_static: false,
            is_constructor: false,
            return_type: "NSString *".to_string(),
            return_nullability: Some(Nullability::NonNull),
            params,
            metadata_name: Some("foo".to_string()),
        }
    }

    #[test]
    fn test_declaration_rendering() {
        assert_eq!(report("foo", Vec::new()).declaration(), "- (NSString * __nonnull)foo;");
        let params = vec![
            ("t".to_string(), "JavaLangThread *".to_string(), None),
            ("n".to_string(), "jint".to_string(), None),
        ];
        assert_eq!(
            report("fooWithJavaLangThread:withInt:", params).declaration(),
            "- (NSString * __nonnull)fooWithJavaLangThread:(JavaLangThread *)t withInt:(jint)n;"
        );
    }

    #[test]
    fn test_objc_types() {
        assert_eq!(objc_type(&TypeRef::Primitive(PrimitiveType::Boolean)), "jboolean");
        assert_eq!(objc_type(&TypeRef::string()), "NSString *");
        assert_eq!(objc_type(&TypeRef::object()), "id");
        assert_eq!(objc_type(&TypeRef::array_of(TypeRef::Primitive(PrimitiveType::Int))), "IOSIntArray *");
    }
}
