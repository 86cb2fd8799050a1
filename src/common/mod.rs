//! Program model shared across the injector
//!
//! This module contains the structural type descriptors, the JVM descriptor
//! decoder and the arena-backed symbol environment the front end hands to the
//! injector and the downstream passes.

pub mod builder;
pub mod descriptor;
pub mod env;
pub mod symbols;
pub mod types;

// Re-export commonly used items for convenience
pub use builder::{ClassBuilder, FieldBuilder, MethodBuilder};
pub use descriptor::{DescriptorError, MethodDescriptor};
pub use env::{CompilationUnit, SymbolEnvironment};
pub use symbols::{
    AnnotatedType, AnnotationMirror, AnnotationValue, ClassId, ClassKind, ClassSymbol, FieldSymbol, MethodKind,
    MethodSymbol, Modifier, ParamSymbol, UnitId,
};
pub use types::{ElementType, PrimitiveType, RetentionPolicy, TargetKind, TypeRef};
