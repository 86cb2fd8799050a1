//! External annotation injection (jaif)
//!
//! Reads annotation index files and merges their annotations into a program
//! model as if they had been written in source, so later passes cannot tell
//! the difference.
//!
//! ## Architecture
//!
//! - **parser**: Lexical analysis and parsing of index text into an [`AnnotationIndex`](ast::AnnotationIndex)
//! - **ast**: Index entries, element paths and declared annotation types
//! - **common**: Program model - types, descriptors, symbols and the symbol environment
//! - **wash**: Injection pipeline (match → synthesize → enrich) and the [`Injector`](wash::Injector) driver
//! - **codegen**: Downstream passes reading the enriched model (nullability, reflection, naming, runtime)
//! - **bin**: Command-line interface for inspecting and checking index files
//!
//! ## Injection Flow
//!
//! ```text
//! Index text → Parser → AnnotationIndex ─┐
//!                                        ├→ Injector → enriched SymbolEnvironment → codegen passes
//! Front end → SymbolEnvironment ─────────┘
//!                 match → synthesize → enrich (per unit)
//! ```

pub mod ast;
pub mod parser;
pub mod common;
pub mod wash;
pub mod codegen;
pub mod error;
pub mod config;
pub mod consts;

pub use error::{Result, Error};
pub use config::{Config, IndexSource};
pub use wash::{Diagnostic, Injector};

use common::SymbolEnvironment;

/// Load the configured index and enrich every unit of `env`.
///
/// Returns the non-fatal diagnostics collected while parsing and applying
/// the index.
pub fn inject(env: &mut SymbolEnvironment, config: &Config) -> Result<Vec<Diagnostic>> {
    let mut injector = Injector::new(config)?;
    injector.inject_all(env)?;
    Ok(injector.take_diagnostics())
}
