use std::collections::HashMap;
use std::fmt;

use super::Location;
use crate::common::descriptor::MethodDescriptor;
use crate::common::types::{simple_name, ElementType};

/// An element value as written in the index, before it is checked against
/// the annotation type
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
    /// Enum constant or other dotted name, e.g. `RUNTIME` or `p.Level.FULL`
    Name(String),
    /// Class literal `java.lang.String.class`
    ClassLiteral(String),
    Array(Vec<ParsedValue>),
    Annotation(ParsedAnnotation),
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Bool(v) => write!(f, "{}", v),
            ParsedValue::Int(v) => write!(f, "{}", v),
            ParsedValue::Float(v) => write!(f, "{}", v),
            ParsedValue::Char(v) => write!(f, "'{}'", v),
            ParsedValue::Str(v) => write!(f, "{:?}", v),
            ParsedValue::Name(v) => write!(f, "{}", v),
            ParsedValue::ClassLiteral(v) => write!(f, "{}.class", v),
            ParsedValue::Array(values) => {
                write!(f, "{{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "}}")
            }
            ParsedValue::Annotation(a) => write!(f, "{}", a),
        }
    }
}

/// `@TypeName(name=value, ...)` as written in the index
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnnotation {
    /// Type name as written; may be unqualified
    pub type_name: String,
    pub values: Vec<(String, ParsedValue)>,
    pub location: Location,
}

impl ParsedAnnotation {
    pub fn new(type_name: impl Into<String>, location: Location) -> Self {
        Self { type_name: type_name.into(), values: Vec::new(), location }
    }

    pub fn value(&self, name: &str) -> Option<&ParsedValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_qualified(&self) -> bool {
        self.type_name.contains('.')
    }
}

impl fmt::Display for ParsedAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if !self.values.is_empty() {
            write!(f, "(")?;
            for (i, (name, value)) in self.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}={}", name, value)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Where an entry's annotations attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementPath {
    /// The class, method, constructor or field declaration itself
    Declaration,
    /// The return type occurrence of a method
    ReturnType,
    /// Declaration annotation on the parameter at this position
    Parameter(usize),
    /// Type annotation on the type of the parameter at this position
    ParameterType(usize),
    /// Type annotation on a field's type
    FieldType,
}

impl ElementPath {
    /// Type paths attach to a type occurrence rather than a declaration
    pub fn is_type_path(self) -> bool {
        matches!(self, ElementPath::ReturnType | ElementPath::ParameterType(_) | ElementPath::FieldType)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementPath::Declaration => write!(f, "declaration"),
            ElementPath::ReturnType => write!(f, "return"),
            ElementPath::Parameter(i) => write!(f, "parameter #{}", i),
            ElementPath::ParameterType(i) => write!(f, "parameter #{} type", i),
            ElementPath::FieldType => write!(f, "field type"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSignature {
    /// Method or constructor (`<init>`) with its decoded descriptor
    Method { name: String, descriptor: MethodDescriptor },
    Field { name: String },
}

impl MemberSignature {
    pub fn name(&self) -> &str {
        match self {
            MemberSignature::Method { name, .. } | MemberSignature::Field { name } => name,
        }
    }
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberSignature::Method { name, descriptor } => write!(f, "method {}{}", name, descriptor),
            MemberSignature::Field { name } => write!(f, "field {}", name),
        }
    }
}

/// One annotation-bearing element of the index
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationIndexEntry {
    /// Binary class name, `$` separating nested classes
    pub owner: String,
    /// Package section the entry was written in; unqualified annotation names resolve against it
    pub package: String,
    pub member: Option<MemberSignature>,
    pub path: ElementPath,
    pub annotations: Vec<ParsedAnnotation>,
    pub location: Location,
}

impl AnnotationIndexEntry {
    pub fn is_type_level(&self) -> bool {
        self.member.is_none()
    }
}

impl fmt::Display for AnnotationIndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.owner)?;
        if let Some(member) = &self.member {
            write!(f, " {}", member)?;
        }
        write!(f, " [{}]", self.path)?;
        for a in &self.annotations {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

/// `String value`, `enum p.Level level = FULL`
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub name: String,
    pub ty: ElementType,
    pub default: Option<ParsedValue>,
}

/// `annotation @Name: <meta-annotations> <element decls>`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationTypeDecl {
    /// Qualified name (package section + simple name)
    pub name: String,
    pub annotations: Vec<ParsedAnnotation>,
    pub elements: Vec<ElementDecl>,
    pub location: Location,
}

impl AnnotationTypeDecl {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }
}

/// Parsed annotation index: entries in file order plus declared annotation types.
///
/// Immutable once loading has finished; fragments are combined with
/// [`merge`](Self::merge) before the index is handed to the injector.
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    entries: Vec<AnnotationIndexEntry>,
    by_owner: HashMap<String, Vec<usize>>,
    declarations: Vec<AnnotationTypeDecl>,
    declared: HashMap<String, usize>,
    declared_simple: HashMap<String, usize>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_entry(&mut self, entry: AnnotationIndexEntry) {
        let idx = self.entries.len();
        self.by_owner.entry(entry.owner.clone()).or_default().push(idx);
        self.entries.push(entry);
    }

    /// Register an annotation type; a later declaration of the same name wins
    pub fn declare(&mut self, decl: AnnotationTypeDecl) {
        let idx = self.declarations.len();
        self.declared.insert(decl.name.clone(), idx);
        self.declared_simple.insert(decl.simple_name().to_string(), idx);
        self.declarations.push(decl);
    }

    /// Append another fragment. Entries are concatenated without conflict
    /// detection; declarations are re-registered in order.
    pub fn merge(&mut self, other: AnnotationIndex) {
        for entry in other.entries {
            self.push_entry(entry);
        }
        for decl in other.declarations {
            self.declare(decl);
        }
    }

    pub fn entries(&self) -> &[AnnotationIndexEntry] {
        &self.entries
    }

    /// Entries for one owner, in load order
    pub fn entries_for_owner<'a>(&'a self, owner: &str) -> impl Iterator<Item = &'a AnnotationIndexEntry> + 'a {
        self.by_owner
            .get(owner)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.entries[i])
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.by_owner.keys().map(String::as_str)
    }

    pub fn declaration(&self, qualified_name: &str) -> Option<&AnnotationTypeDecl> {
        self.declared.get(qualified_name).map(|&i| &self.declarations[i])
    }

    pub fn declaration_by_simple_name(&self, simple: &str) -> Option<&AnnotationTypeDecl> {
        self.declared_simple.get(simple).map(|&i| &self.declarations[i])
    }

    /// Every registered declaration, including ones later superseded
    pub fn declarations(&self) -> &[AnnotationTypeDecl] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
