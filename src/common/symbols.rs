//! Program-model symbols
//!
//! These mirror the symbols a Java front end produces after its Enter phase:
//! classes, methods/constructors, fields and parameters, each carrying the
//! annotations written in source. Symbols are immutable once entered into a
//! [`SymbolEnvironment`](super::env::SymbolEnvironment); passes that need a
//! different symbol build a new value and swap it in.

use std::fmt;
use std::sync::Arc;

use super::types::{simple_name, RetentionPolicy, TypeRef};

/// Index of a class slot in the symbol environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a compilation unit in the symbol environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub(crate) u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Method,
    Constructor,
}

/// Value of an annotation element after resolution
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Class literal, by binary name
    Class(TypeRef),
    Enum { type_name: String, constant: String },
    Annotation(Box<AnnotationMirror>),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum_constant(&self) -> Option<&str> {
        match self {
            AnnotationValue::Enum { constant, .. } => Some(constant),
            _ => None,
        }
    }

    /// Elements of an array value; a scalar is treated as a one-element array
    pub fn elements(&self) -> Vec<&AnnotationValue> {
        match self {
            AnnotationValue::Array(values) => values.iter().collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Boolean(v) => write!(f, "{}", v),
            AnnotationValue::Byte(v) => write!(f, "{}", v),
            AnnotationValue::Char(v) => write!(f, "'{}'", v),
            AnnotationValue::Short(v) => write!(f, "{}", v),
            AnnotationValue::Int(v) => write!(f, "{}", v),
            AnnotationValue::Long(v) => write!(f, "{}L", v),
            AnnotationValue::Float(v) => write!(f, "{}f", v),
            AnnotationValue::Double(v) => write!(f, "{}", v),
            AnnotationValue::String(v) => write!(f, "{:?}", v),
            AnnotationValue::Class(ty) => write!(f, "{}.class", ty),
            AnnotationValue::Enum { type_name, constant } => write!(f, "{}.{}", type_name, constant),
            AnnotationValue::Annotation(m) => write!(f, "{}", m),
            AnnotationValue::Array(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// An annotation instance attached to a declaration or type occurrence.
///
/// Source annotations and injected annotations share this shape; nothing
/// records where a mirror came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMirror {
    /// Qualified binary name of the annotation type
    pub type_name: String,
    pub values: Vec<(String, AnnotationValue)>,
    pub retention: RetentionPolicy,
}

impl AnnotationMirror {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), values: Vec::new(), retention: RetentionPolicy::default() }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.push((name.into(), value));
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn simple_name(&self) -> &str {
        simple_name(&self.type_name)
    }
}

impl fmt::Display for AnnotationMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if !self.values.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", name, value)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Find an annotation by qualified type name
pub fn find_annotation<'a>(annotations: &'a [AnnotationMirror], type_name: &str) -> Option<&'a AnnotationMirror> {
    annotations.iter().find(|a| a.type_name == type_name)
}

/// A type occurrence together with its type annotations
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedType {
    pub ty: TypeRef,
    pub annotations: Vec<AnnotationMirror>,
}

impl AnnotatedType {
    pub fn new(ty: TypeRef) -> Self {
        Self { ty, annotations: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSymbol {
    pub name: String,
    pub ty: AnnotatedType,
    pub annotations: Vec<AnnotationMirror>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodSymbol {
    pub name: String,
    pub kind: MethodKind,
    pub modifiers: Vec<Modifier>,
    pub params: Vec<ParamSymbol>,
    pub return_type: AnnotatedType,
    pub annotations: Vec<AnnotationMirror>,
    /// Default value when this method is an element of an annotation type
    pub default_value: Option<AnnotationValue>,
}

impl MethodSymbol {
    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    /// Erased parameter types in declaration order
    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.params.iter().map(|p| &p.ty.ty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSymbol {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub ty: AnnotatedType,
    pub annotations: Vec<AnnotationMirror>,
}

/// Class, interface, enum or annotation type
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSymbol {
    /// Binary name, e.g. `p.Test$InnerClass`
    pub binary_name: String,
    pub kind: ClassKind,
    pub modifiers: Vec<Modifier>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub annotations: Vec<AnnotationMirror>,
    pub methods: Vec<Arc<MethodSymbol>>,
    pub fields: Vec<Arc<FieldSymbol>>,
    pub enclosing: Option<ClassId>,
    pub nested: Vec<ClassId>,
    pub unit: UnitId,
}

impl ClassSymbol {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.binary_name)
    }

    pub fn package(&self) -> &str {
        // binary names keep nesting in the last segment, so the package is everything before it
        super::types::package_of(&self.binary_name)
    }

    pub fn is_annotation_type(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    /// Static nested or top-level; inner classes carry an implicit outer instance
    pub fn is_static(&self) -> bool {
        self.enclosing.is_none() || self.modifiers.contains(&Modifier::Static) || self.kind != ClassKind::Class
    }

    pub fn method(&self, name: &str) -> Option<&Arc<MethodSymbol>> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldSymbol>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Arc<MethodSymbol>> {
        self.methods.iter().filter(|m| m.is_constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_display() {
        let m = AnnotationMirror::new("p.Ann")
            .with_value("value", AnnotationValue::String("x".to_string()))
            .with_value(
                "level",
                AnnotationValue::Enum { type_name: "p.Level".to_string(), constant: "FULL".to_string() },
            );
        assert_eq!(m.to_string(), "@p.Ann(value=\"x\", level=p.Level.FULL)");
        assert_eq!(m.simple_name(), "Ann");
    }

    #[test]
    fn test_scalar_as_elements() {
        let v = AnnotationValue::Int(3);
        assert_eq!(v.elements(), vec![&AnnotationValue::Int(3)]);
    }
}
