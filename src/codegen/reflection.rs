//! Reflection metadata gating
//!
//! `@ReflectionSupport(Level.FULL)` keeps metadata even when stripping is
//! configured; `Level.NATIVE_ONLY` drops it even when it is not.

use crate::common::symbols::{find_annotation, AnnotationValue, ClassSymbol};
use crate::consts::REFLECTION_SUPPORT_ANNOTATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionLevel {
    Full,
    NativeOnly,
}

impl ReflectionLevel {
    pub fn from_constant(name: &str) -> Option<Self> {
        match name {
            "FULL" => Some(ReflectionLevel::Full),
            "NATIVE_ONLY" => Some(ReflectionLevel::NativeOnly),
            _ => None,
        }
    }
}

/// Level requested by the class's `@ReflectionSupport`, if present
pub fn reflection_support(class: &ClassSymbol) -> Option<ReflectionLevel> {
    find_annotation(&class.annotations, REFLECTION_SUPPORT_ANNOTATION)
        .and_then(|a| a.value("value"))
        .and_then(AnnotationValue::as_enum_constant)
        .and_then(ReflectionLevel::from_constant)
}

/// Whether generated output for `class` carries reflection metadata
pub fn emits_metadata(class: &ClassSymbol, strip_reflection: bool) -> bool {
    match reflection_support(class) {
        Some(ReflectionLevel::Full) => true,
        Some(ReflectionLevel::NativeOnly) => false,
        None => !strip_reflection,
    }
}
