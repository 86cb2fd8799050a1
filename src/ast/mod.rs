//! Index AST - structured form of an external annotation index
//!
//! The parser produces an [`AnnotationIndex`]: a flat list of
//! [`AnnotationIndexEntry`] records keyed by owner class, plus the annotation
//! types the index declares for itself.

pub mod nodes;

pub use nodes::*;

pub use crate::parser::span::Location;
