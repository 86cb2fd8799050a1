//! Structural type descriptors shared by the index and the program model.
//!
//! Binary names are kept in their dotted form with `$` separating nested
//! classes (`java.util.Map$Entry`), which is what both the program model and
//! the decoded descriptors compare against.

use std::fmt;

/// Java primitive types (JVMS 4.3.2 base types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// Descriptor code for this primitive
    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }

    pub fn from_descriptor_char(c: char) -> Option<Self> {
        match c {
            'Z' => Some(PrimitiveType::Boolean),
            'B' => Some(PrimitiveType::Byte),
            'C' => Some(PrimitiveType::Char),
            'S' => Some(PrimitiveType::Short),
            'I' => Some(PrimitiveType::Int),
            'J' => Some(PrimitiveType::Long),
            'F' => Some(PrimitiveType::Float),
            'D' => Some(PrimitiveType::Double),
            _ => None,
        }
    }

    /// Java keyword for this primitive
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(PrimitiveType::Boolean),
            "byte" => Some(PrimitiveType::Byte),
            "char" => Some(PrimitiveType::Char),
            "short" => Some(PrimitiveType::Short),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            _ => None,
        }
    }
}

/// A type occurrence in a declaration signature, already erased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    /// Reference type by binary name, e.g. `java.lang.String`
    Class(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn class(binary_name: impl Into<String>) -> Self {
        TypeRef::Class(binary_name.into())
    }

    pub fn string() -> Self {
        TypeRef::Class("java.lang.String".to_string())
    }

    pub fn object() -> Self {
        TypeRef::Class("java.lang.Object".to_string())
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// Whether pointer-style type annotations can apply to this type.
    ///
    /// Primitives and `void` are not references, so type-use annotations on
    /// them have no effect.
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Class(_) | TypeRef::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// Encode as a JVM field descriptor (`V` for void)
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    pub(crate) fn write_descriptor(&self, out: &mut String) {
        match self {
            TypeRef::Void => out.push('V'),
            TypeRef::Primitive(p) => out.push(p.descriptor_char()),
            TypeRef::Class(name) => {
                out.push('L');
                out.push_str(&name.replace('.', "/"));
                out.push(';');
            }
            TypeRef::Array(element) => {
                out.push('[');
                element.write_descriptor(out);
            }
        }
    }

    /// Simple name of a class type (`Map$Entry` → `Entry`)
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(name) => Some(simple_name(name)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive(p) => write!(f, "{}", p.keyword()),
            TypeRef::Class(name) => write!(f, "{}", name),
            TypeRef::Array(element) => write!(f, "{}[]", element),
        }
    }
}

/// Last segment of a dotted or `$`-nested binary name
pub fn simple_name(binary_name: &str) -> &str {
    binary_name
        .rsplit(|c| c == '.' || c == crate::consts::NESTED_CLASS_DELIMITER)
        .next()
        .unwrap_or(binary_name)
}

/// Package part of a binary name (empty for the unnamed package)
pub fn package_of(binary_name: &str) -> &str {
    binary_name.rfind('.').map(|i| &binary_name[..i]).unwrap_or("")
}

/// Declared type of an annotation element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Primitive(PrimitiveType),
    String,
    Class,
    Enum(String),
    Annotation(String),
    Array(Box<ElementType>),
}

impl ElementType {
    /// Map a method return type from an annotation type declaration in source
    /// to an element type. `is_annotation` tells whether a class name refers to
    /// an annotation type; any other class that is not `String`/`Class` is
    /// treated as an enum.
    pub fn from_type_ref(ty: &TypeRef, is_annotation: &dyn Fn(&str) -> bool) -> Option<Self> {
        match ty {
            TypeRef::Void => None,
            TypeRef::Primitive(p) => Some(ElementType::Primitive(*p)),
            TypeRef::Class(name) => Some(match name.as_str() {
                "java.lang.String" => ElementType::String,
                "java.lang.Class" => ElementType::Class,
                other if is_annotation(other) => ElementType::Annotation(other.to_string()),
                other => ElementType::Enum(other.to_string()),
            }),
            TypeRef::Array(element) => {
                ElementType::from_type_ref(element, is_annotation).map(|e| ElementType::Array(Box::new(e)))
            }
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Primitive(p) => write!(f, "{}", p.keyword()),
            ElementType::String => write!(f, "String"),
            ElementType::Class => write!(f, "Class"),
            ElementType::Enum(name) => write!(f, "enum {}", name),
            ElementType::Annotation(name) => write!(f, "annotation-field {}", name),
            ElementType::Array(element) => write!(f, "{}[]", element),
        }
    }
}

/// How long an annotation survives (java.lang.annotation.RetentionPolicy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RetentionPolicy {
    /// Discarded after this compiler pass
    Source,
    /// Embedded in generated artifacts
    #[default]
    Class,
    /// Visible to reflection at run time
    Runtime,
}

impl RetentionPolicy {
    pub fn from_constant(name: &str) -> Option<Self> {
        match name {
            "SOURCE" => Some(RetentionPolicy::Source),
            "CLASS" => Some(RetentionPolicy::Class),
            "RUNTIME" => Some(RetentionPolicy::Runtime),
            _ => None,
        }
    }

    /// Whether generated output has to carry this annotation at all
    pub fn reaches_output(self) -> bool {
        self >= RetentionPolicy::Class
    }
}

/// Program elements an annotation type may be applied to (java.lang.annotation.ElementType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Type,
    Field,
    Method,
    Parameter,
    Constructor,
    LocalVariable,
    AnnotationType,
    Package,
    TypeParameter,
    TypeUse,
}

impl TargetKind {
    pub fn from_constant(name: &str) -> Option<Self> {
        match name {
            "TYPE" => Some(TargetKind::Type),
            "FIELD" => Some(TargetKind::Field),
            "METHOD" => Some(TargetKind::Method),
            "PARAMETER" => Some(TargetKind::Parameter),
            "CONSTRUCTOR" => Some(TargetKind::Constructor),
            "LOCAL_VARIABLE" => Some(TargetKind::LocalVariable),
            "ANNOTATION_TYPE" => Some(TargetKind::AnnotationType),
            "PACKAGE" => Some(TargetKind::Package),
            "TYPE_PARAMETER" => Some(TargetKind::TypeParameter),
            "TYPE_USE" => Some(TargetKind::TypeUse),
            _ => None,
        }
    }
}
