//! References to runtime-retained annotation types
//!
//! Generated code instantiates every runtime-visible annotation it describes,
//! so it needs the annotation type's header and its `create_` function.

use super::naming::objc_class_name;
use crate::common::symbols::{AnnotationMirror, ClassSymbol};
use crate::common::types::RetentionPolicy;
use crate::consts::NESTED_CLASS_DELIMITER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAnnotationRef {
    pub type_name: String,
    /// `org/junit/Ignore.h`
    pub include_path: String,
    /// `create_OrgJunitIgnore`
    pub constructor_fn: String,
}

impl RuntimeAnnotationRef {
    pub fn new(type_name: &str) -> Self {
        // nested annotation types are declared in their top-level class's header
        let top_level = type_name.split(NESTED_CLASS_DELIMITER).next().unwrap_or(type_name);
        Self {
            type_name: type_name.to_string(),
            include_path: format!("{}.h", top_level.replace('.', "/")),
            constructor_fn: format!("create_{}", objc_class_name(type_name)),
        }
    }
}

/// Runtime-retained annotation types used by the class or its members, in
/// first-use order without duplicates
pub fn runtime_annotation_refs(class: &ClassSymbol) -> Vec<RuntimeAnnotationRef> {
    let mut all: Vec<&AnnotationMirror> = class.annotations.iter().collect();
    for method in &class.methods {
        all.extend(&method.annotations);
        all.extend(&method.return_type.annotations);
        for param in &method.params {
            all.extend(&param.annotations);
            all.extend(&param.ty.annotations);
        }
    }
    for field in &class.fields {
        all.extend(&field.annotations);
        all.extend(&field.ty.annotations);
    }

    let mut refs: Vec<RuntimeAnnotationRef> = Vec::new();
    for mirror in all {
        if mirror.retention == RetentionPolicy::Runtime && !refs.iter().any(|r| r.type_name == mirror.type_name) {
            refs.push(RuntimeAnnotationRef::new(&mirror.type_name));
        }
    }
    refs
}
