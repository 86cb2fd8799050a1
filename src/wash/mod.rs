//! Injection pipeline - apply an external annotation index to the program model
//!
//! This module runs between the front end's Enter phase and every downstream
//! pass. The stages mirror how the index flows through the injector:
//!
//! - matcher: resolve entries against a class's members by exact signature
//! - synth: resolve annotation types and build annotation mirrors
//! - enrich: swap enriched symbols into the environment, one unit at a time
//!
//! [`Injector`] owns the parsed index for the whole run and drives the stages.

pub mod diagnostic;
pub mod enrich;
pub mod matcher;
pub mod synth;

pub use diagnostic::Diagnostic;
pub use enrich::{EnrichState, Enricher};
pub use matcher::{match_member, MemberRef};
pub use synth::{AnnotationTypeCache, AnnotationTypeDescriptor, ElementSignature, Synthesizer};

use std::sync::Arc;

use crate::ast::AnnotationIndex;
use crate::common::symbols::UnitId;
use crate::common::SymbolEnvironment;
use crate::config::Config;
use crate::error::Result;
use crate::parser::parse_fragments;

/// Loads the index once and enriches compilation units on request
#[derive(Debug)]
pub struct Injector {
    enricher: Enricher,
    diagnostics: Vec<Diagnostic>,
}

impl Injector {
    /// Read and parse every configured annotation source.
    ///
    /// Unreadable sources are fatal; malformed entries are collected as
    /// diagnostics and skipped.
    pub fn new(config: &Config) -> Result<Self> {
        let texts = config.load_sources()?;
        log::info!("INJECT: loading {} annotation index fragment(s)", texts.len());
        let parsed = parse_fragments(texts.iter().map(|(_, text)| text.as_str()));
        if !parsed.diagnostics.is_empty() {
            log::warn!("INJECT: {} malformed index entries skipped", parsed.diagnostics.len());
        }
        let mut injector = Self::from_index(parsed.index);
        injector.diagnostics = parsed.diagnostics;
        Ok(injector)
    }

    pub fn from_index(index: AnnotationIndex) -> Self {
        log::debug!(
            "INJECT: index has {} entries for {} classes",
            index.len(),
            index.owners().count()
        );
        Self { enricher: Enricher::new(Arc::new(index)), diagnostics: Vec::new() }
    }

    pub fn index(&self) -> &AnnotationIndex {
        self.enricher.index()
    }

    pub fn state(&self, unit: UnitId) -> EnrichState {
        self.enricher.state(unit)
    }

    /// Enrich one compilation unit. Must run before any downstream pass
    /// looks at the unit.
    pub fn inject_unit(&mut self, env: &mut SymbolEnvironment, unit: UnitId) -> Result<usize> {
        let result = self.enricher.enrich_unit(env, unit);
        self.diagnostics.extend(self.enricher.take_diagnostics());
        result
    }

    /// Enrich every unit in the environment
    pub fn inject_all(&mut self, env: &mut SymbolEnvironment) -> Result<usize> {
        let units: Vec<UnitId> = env.unit_ids().collect();
        let mut replaced = 0;
        for unit in units {
            replaced += self.inject_unit(env, unit)?;
        }
        log::info!("INJECT: {} classes enriched, {} diagnostics", replaced, self.diagnostics.len());
        Ok(replaced)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
