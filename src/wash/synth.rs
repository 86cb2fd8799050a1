//! Annotation synthesis - turn parsed annotation applications into mirrors
//!
//! An [`AnnotationTypeDescriptor`] describes one annotation type: retention,
//! targets and typed elements. Descriptors come from an annotation type in the
//! program model, from an `annotation @Name:` declaration in the index, or from
//! the built-in table, in that order, and are cached per qualified name for
//! the whole run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::Diagnostic;
use crate::ast::{AnnotationIndex, AnnotationTypeDecl, ParsedAnnotation, ParsedValue};
use crate::common::symbols::{find_annotation, AnnotationMirror, AnnotationValue, ClassKind, ClassSymbol};
use crate::common::types::{simple_name, ElementType, PrimitiveType, RetentionPolicy, TargetKind, TypeRef};
use crate::common::SymbolEnvironment;
use crate::consts::{NESTED_CLASS_DELIMITER, RETENTION_ANNOTATION, TARGET_ANNOTATION};

/// One element of an annotation type
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSignature {
    pub name: String,
    pub ty: ElementType,
    pub default: Option<AnnotationValue>,
}

/// Resolved metadata for an annotation type
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTypeDescriptor {
    pub name: String,
    pub retention: RetentionPolicy,
    /// Empty when the type does not restrict its targets
    pub targets: Vec<TargetKind>,
    pub elements: Vec<ElementSignature>,
}

impl AnnotationTypeDescriptor {
    fn builtin(name: &str, retention: RetentionPolicy, targets: &[TargetKind]) -> Self {
        Self { name: name.to_string(), retention, targets: targets.to_vec(), elements: Vec::new() }
    }

    fn element(mut self, name: &str, ty: ElementType) -> Self {
        self.elements.push(ElementSignature { name: name.to_string(), ty, default: None });
        self
    }

    pub fn element_signature(&self, name: &str) -> Option<&ElementSignature> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Derive a descriptor from an annotation type entered in the program model
    pub fn from_source(class: &ClassSymbol, env: &SymbolEnvironment) -> Self {
        let retention = find_annotation(&class.annotations, RETENTION_ANNOTATION)
            .and_then(|a| a.value("value"))
            .and_then(AnnotationValue::as_enum_constant)
            .and_then(RetentionPolicy::from_constant)
            .unwrap_or_default();
        let targets: Vec<TargetKind> = find_annotation(&class.annotations, TARGET_ANNOTATION)
            .and_then(|a| a.value("value"))
            .map(|v| {
                v.elements()
                    .into_iter()
                    .filter_map(|e| e.as_enum_constant())
                    .filter_map(TargetKind::from_constant)
                    .collect()
            })
            .unwrap_or_default();
        let is_annotation = |name: &str| env.is_annotation_type(name);
        let elements = class
            .methods
            .iter()
            .filter(|m| !m.is_constructor() && !m.is_static())
            .filter_map(|m| {
                ElementType::from_type_ref(&m.return_type.ty, &is_annotation).map(|ty| ElementSignature {
                    name: m.name.clone(),
                    ty,
                    default: m.default_value.clone(),
                })
            })
            .collect();
        Self { name: class.binary_name.clone(), retention, targets, elements }
    }
}

static BUILTIN_ANNOTATIONS: Lazy<HashMap<String, Arc<AnnotationTypeDescriptor>>> = Lazy::new(|| {
    use RetentionPolicy::*;
    use TargetKind::*;
    let descriptors = vec![
        AnnotationTypeDescriptor::builtin(RETENTION_ANNOTATION, Runtime, &[AnnotationType])
            .element("value", ElementType::Enum("java.lang.annotation.RetentionPolicy".to_string())),
        AnnotationTypeDescriptor::builtin(TARGET_ANNOTATION, Runtime, &[AnnotationType]).element(
            "value",
            ElementType::Array(Box::new(ElementType::Enum("java.lang.annotation.ElementType".to_string()))),
        ),
        AnnotationTypeDescriptor::builtin("java.lang.annotation.Documented", Runtime, &[AnnotationType]),
        AnnotationTypeDescriptor::builtin("java.lang.annotation.Inherited", Runtime, &[AnnotationType]),
        AnnotationTypeDescriptor::builtin("java.lang.Deprecated", Runtime, &[]),
        AnnotationTypeDescriptor::builtin("java.lang.Override", Source, &[Method]),
        AnnotationTypeDescriptor::builtin("java.lang.SuppressWarnings", Source, &[]).element(
            "value",
            ElementType::Array(Box::new(ElementType::String)),
        ),
        AnnotationTypeDescriptor::builtin("java.lang.FunctionalInterface", Runtime, &[Type]),
        AnnotationTypeDescriptor::builtin("java.lang.SafeVarargs", Runtime, &[Constructor, Method]),
    ];
    descriptors.into_iter().map(|d| (d.name.clone(), Arc::new(d))).collect()
});

/// Built-in descriptor for a qualified name, if there is one
pub fn builtin_descriptor(name: &str) -> Option<Arc<AnnotationTypeDescriptor>> {
    BUILTIN_ANNOTATIONS.get(name).cloned()
}

/// Run-wide cache of resolved annotation type descriptors
#[derive(Debug, Default)]
pub struct AnnotationTypeCache {
    descriptors: HashMap<String, Option<Arc<AnnotationTypeDescriptor>>>,
    resolving: HashSet<String>,
}

impl AnnotationTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Qualify an annotation type name as written in the index.
    ///
    /// Unqualified names resolve against index declarations (last one wins),
    /// then the writing package in the program model, then the `java.lang`
    /// and `java.lang.annotation` built-ins. Anything else is taken to live in
    /// the writing package.
    pub fn resolve_name(name: &str, package: &str, env: &SymbolEnvironment, index: &AnnotationIndex) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        if let Some(decl) = index.declaration_by_simple_name(name) {
            return decl.name.clone();
        }
        let in_package = qualify(package, name);
        if env.find(&in_package).is_some() {
            return in_package;
        }
        for prefix in ["java.lang", "java.lang.annotation"] {
            let builtin = qualify(prefix, name);
            if BUILTIN_ANNOTATIONS.contains_key(builtin.as_str()) {
                return builtin;
            }
        }
        in_package
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// Builds annotation mirrors for one pass over the index.
///
/// Borrows the run's descriptor cache and diagnostic sink; the program model
/// and index are read-only.
pub struct Synthesizer<'a> {
    env: &'a SymbolEnvironment,
    index: &'a AnnotationIndex,
    cache: &'a mut AnnotationTypeCache,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        env: &'a SymbolEnvironment,
        index: &'a AnnotationIndex,
        cache: &'a mut AnnotationTypeCache,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self { env, index, cache, diagnostics }
    }

    /// Resolve the annotation's type and synthesize its mirror
    pub fn mirror(&mut self, parsed: &ParsedAnnotation, package: &str) -> AnnotationMirror {
        let name = AnnotationTypeCache::resolve_name(&parsed.type_name, package, self.env, self.index);
        match self.descriptor(&name) {
            Some(descriptor) => self.synthesize(parsed, &descriptor, package),
            None => AnnotationMirror::new(name),
        }
    }

    /// Descriptor for a qualified name; an unresolvable name is reported once per run
    pub fn descriptor(&mut self, name: &str) -> Option<Arc<AnnotationTypeDescriptor>> {
        if let Some(cached) = self.cache.descriptors.get(name) {
            return cached.clone();
        }
        if !self.cache.resolving.insert(name.to_string()) {
            // self-referential defaults; the outer call finishes the descriptor
            return None;
        }
        let env = self.env;
        let index = self.index;
        let descriptor = if let Some(class) = env.find(name).filter(|c| c.is_annotation_type()) {
            Some(AnnotationTypeDescriptor::from_source(class, env))
        } else if let Some(decl) = index.declaration(name) {
            Some(self.from_declaration(decl))
        } else {
            builtin_descriptor(name).map(|d| (*d).clone())
        };
        self.cache.resolving.remove(name);

        let descriptor = descriptor.map(Arc::new);
        match &descriptor {
            Some(d) => log::trace!("SYNTH: resolved @{} ({:?}, {} elements)", d.name, d.retention, d.elements.len()),
            None => {
                log::debug!("SYNTH: unresolved annotation type '{}'", name);
                self.diagnostics.push(Diagnostic::unresolved(name));
            }
        }
        self.cache.descriptors.insert(name.to_string(), descriptor.clone());
        descriptor
    }

    fn from_declaration(&mut self, decl: &AnnotationTypeDecl) -> AnnotationTypeDescriptor {
        let package = crate::common::types::package_of(&decl.name).to_string();
        let mut retention = RetentionPolicy::default();
        let mut targets = Vec::new();
        for meta in &decl.annotations {
            let meta_name = AnnotationTypeCache::resolve_name(&meta.type_name, &package, self.env, self.index);
            let constants = meta.value("value").map(constant_names).unwrap_or_default();
            if meta_name == RETENTION_ANNOTATION {
                retention = constants.first().and_then(|c| RetentionPolicy::from_constant(c)).unwrap_or_default();
            } else if meta_name == TARGET_ANNOTATION {
                targets = constants.iter().filter_map(|c| TargetKind::from_constant(c)).collect();
            }
        }

        let mut elements = Vec::with_capacity(decl.elements.len());
        for element in &decl.elements {
            let ty = self.qualify_element_type(&element.ty, &package);
            let default = element.default.as_ref().and_then(|value| {
                match self.convert(value, &ty, &package) {
                    Ok(v) => Some(v),
                    Err(message) => {
                        self.diagnostics.push(Diagnostic::invalid_value(&decl.name, &element.name, message));
                        None
                    }
                }
            });
            elements.push(ElementSignature { name: element.name.clone(), ty, default });
        }
        AnnotationTypeDescriptor { name: decl.name.clone(), retention, targets, elements }
    }

    fn qualify_element_type(&self, ty: &ElementType, package: &str) -> ElementType {
        match ty {
            ElementType::Enum(name) if !name.contains('.') => ElementType::Enum(qualify(package, name)),
            ElementType::Annotation(name) => {
                ElementType::Annotation(AnnotationTypeCache::resolve_name(name, package, self.env, self.index))
            }
            ElementType::Array(inner) => ElementType::Array(Box::new(self.qualify_element_type(inner, package))),
            other => other.clone(),
        }
    }

    /// Check each written value against the descriptor and fill in defaults.
    ///
    /// Elements come out in declaration order. Unknown names and values that
    /// do not fit the element type are reported and left out.
    pub fn synthesize(
        &mut self,
        parsed: &ParsedAnnotation,
        descriptor: &AnnotationTypeDescriptor,
        package: &str,
    ) -> AnnotationMirror {
        for (name, _) in &parsed.values {
            if descriptor.element_signature(name).is_none() {
                self.diagnostics.push(Diagnostic::invalid_value(&descriptor.name, name, "no such element"));
            }
        }

        let mut mirror = AnnotationMirror::new(descriptor.name.clone()).with_retention(descriptor.retention);
        for element in &descriptor.elements {
            let written = parsed.values.iter().find(|(n, _)| *n == element.name).map(|(_, v)| v);
            let value = match written {
                Some(value) => match self.convert(value, &element.ty, package) {
                    Ok(v) => Some(v),
                    Err(message) => {
                        self.diagnostics.push(Diagnostic::invalid_value(&descriptor.name, &element.name, message));
                        None
                    }
                },
                None => element.default.clone(),
            };
            if let Some(value) = value {
                mirror.values.push((element.name.clone(), value));
            }
        }
        mirror
    }

    fn convert(&mut self, value: &ParsedValue, ty: &ElementType, package: &str) -> Result<AnnotationValue, String> {
        let mismatch = || format!("expected {}, found {}", ty, value);
        match (ty, value) {
            (ElementType::Array(inner), ParsedValue::Array(values)) => values
                .iter()
                .map(|v| self.convert(v, inner, package))
                .collect::<Result<Vec<_>, _>>()
                .map(AnnotationValue::Array),
            (ElementType::Array(inner), single) => {
                Ok(AnnotationValue::Array(vec![self.convert(single, inner, package)?]))
            }
            (ElementType::Primitive(p), v) => convert_primitive(*p, v).ok_or_else(mismatch),
            (ElementType::String, ParsedValue::Str(s)) => Ok(AnnotationValue::String(s.clone())),
            (ElementType::Class, ParsedValue::ClassLiteral(name)) => Ok(AnnotationValue::Class(class_literal(name))),
            (ElementType::Enum(type_name), ParsedValue::Name(name)) => self.enum_constant(type_name, name),
            (ElementType::Annotation(expected), ParsedValue::Annotation(nested)) => {
                let name = AnnotationTypeCache::resolve_name(&nested.type_name, package, self.env, self.index);
                if &name != expected {
                    return Err(format!("expected @{}, found @{}", expected, name));
                }
                Ok(AnnotationValue::Annotation(Box::new(self.mirror(nested, package))))
            }
            _ => Err(mismatch()),
        }
    }

    /// `FULL`, `Level.FULL` or the fully qualified constant. A qualifier must
    /// name `type_name`; an enum entered in the program model must declare the constant.
    fn enum_constant(&self, type_name: &str, written: &str) -> Result<AnnotationValue, String> {
        let constant = simple_name(written);
        if let Some((qualifier, _)) = written.rsplit_once('.') {
            if !names_type(type_name, qualifier) {
                return Err(format!("{} is not a constant of {}", written, type_name));
            }
        }
        if let Some(class) = find_enum(self.env, type_name) {
            if class.field(constant).is_none() {
                return Err(format!("{} has no constant {}", type_name, constant));
            }
        }
        Ok(AnnotationValue::Enum { type_name: type_name.to_string(), constant: constant.to_string() })
    }
}

/// Whether `qualifier` is `type_name` or a dotted suffix of it; `$` and `.` are equivalent
fn names_type(type_name: &str, qualifier: &str) -> bool {
    let type_name = type_name.replace(NESTED_CLASS_DELIMITER, ".");
    let qualifier = qualifier.replace(NESTED_CLASS_DELIMITER, ".");
    type_name == qualifier || type_name.ends_with(&format!(".{}", qualifier))
}

/// The enum named by a source-level name such as `p.Outer.Level`
fn find_enum<'e>(env: &'e SymbolEnvironment, type_name: &str) -> Option<&'e ClassSymbol> {
    let mut candidate = type_name.to_string();
    loop {
        if let Some(class) = env.find(&candidate).filter(|c| c.kind == ClassKind::Enum) {
            return Some(class);
        }
        let dot = candidate.rfind('.')?;
        candidate.replace_range(dot..dot + 1, &NESTED_CLASS_DELIMITER.to_string());
    }
}

/// Values named by a meta-annotation element: `RUNTIME`, `RetentionPolicy.RUNTIME`, `{FIELD, METHOD}`
fn constant_names(value: &ParsedValue) -> Vec<String> {
    match value {
        ParsedValue::Name(name) => vec![simple_name(name).to_string()],
        ParsedValue::Array(values) => values.iter().flat_map(constant_names).collect(),
        _ => Vec::new(),
    }
}

fn class_literal(name: &str) -> TypeRef {
    if name == "void" {
        return TypeRef::Void;
    }
    PrimitiveType::from_keyword(name).map(TypeRef::Primitive).unwrap_or_else(|| TypeRef::class(name))
}

fn convert_primitive(p: PrimitiveType, value: &ParsedValue) -> Option<AnnotationValue> {
    match (p, value) {
        (PrimitiveType::Boolean, ParsedValue::Bool(b)) => Some(AnnotationValue::Boolean(*b)),
        (PrimitiveType::Char, ParsedValue::Char(c)) => Some(AnnotationValue::Char(*c)),
        (PrimitiveType::Byte, ParsedValue::Int(i)) => i8::try_from(*i).ok().map(AnnotationValue::Byte),
        (PrimitiveType::Short, ParsedValue::Int(i)) => i16::try_from(*i).ok().map(AnnotationValue::Short),
        (PrimitiveType::Int, ParsedValue::Int(i)) => i32::try_from(*i).ok().map(AnnotationValue::Int),
        (PrimitiveType::Long, ParsedValue::Int(i)) => Some(AnnotationValue::Long(*i)),
        (PrimitiveType::Float, ParsedValue::Int(i)) => Some(AnnotationValue::Float(*i as f32)),
        (PrimitiveType::Float, ParsedValue::Float(f)) => Some(AnnotationValue::Float(*f as f32)),
        (PrimitiveType::Double, ParsedValue::Int(i)) => Some(AnnotationValue::Double(*i as f64)),
        (PrimitiveType::Double, ParsedValue::Float(f)) => Some(AnnotationValue::Double(*f)),
        _ => None,
    }
}
