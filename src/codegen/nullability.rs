//! Nullability specifiers for generated declarations
//!
//! Annotations are recognised by simple name so that any vendor's
//! `NonNull`/`Nullable` works. Type annotations on the occurrence are looked
//! at before declaration annotations on the element.

use crate::common::symbols::{AnnotatedType, AnnotationMirror, FieldSymbol, MethodSymbol, ParamSymbol};
use crate::config::Config;
use crate::consts::{NONNULL_ANNOTATION_NAMES, NULLABLE_ANNOTATION_NAMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NonNull,
    Nullable,
}

impl Nullability {
    /// Clang pointer specifier
    pub fn specifier(self) -> &'static str {
        match self {
            Nullability::NonNull => "__nonnull",
            Nullability::Nullable => "__nullable",
        }
    }

    fn of(annotation: &AnnotationMirror) -> Option<Self> {
        let name = annotation.simple_name();
        if NONNULL_ANNOTATION_NAMES.contains(&name) {
            Some(Nullability::NonNull)
        } else if NULLABLE_ANNOTATION_NAMES.contains(&name) {
            Some(Nullability::Nullable)
        } else {
            None
        }
    }
}

fn lookup(ty: &AnnotatedType, declaration: &[AnnotationMirror]) -> Option<Nullability> {
    if !ty.ty.is_reference() {
        return None;
    }
    ty.annotations.iter().chain(declaration).find_map(Nullability::of)
}

/// Nullability of a method's result; constructors always return non-null
pub fn return_nullability(method: &MethodSymbol, config: &Config) -> Option<Nullability> {
    if !config.nullability {
        return None;
    }
    if method.is_constructor() {
        return Some(Nullability::NonNull);
    }
    lookup(&method.return_type, &method.annotations)
}

pub fn param_nullability(param: &ParamSymbol, config: &Config) -> Option<Nullability> {
    if !config.nullability {
        return None;
    }
    lookup(&param.ty, &param.annotations)
}

pub fn field_nullability(field: &FieldSymbol, config: &Config) -> Option<Nullability> {
    if !config.nullability {
        return None;
    }
    lookup(&field.ty, &field.annotations)
}
