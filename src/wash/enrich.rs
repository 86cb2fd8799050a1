//! Symbol enrichment - merge synthesized annotations into the program model
//!
//! Each compilation unit moves through [`EnrichState`] once. For every class of
//! the unit the enricher builds a working copy, applies the matching index
//! entries to it and swaps it into the environment slot. Symbols that already
//! live in the environment are never modified in place.

use std::collections::HashMap;
use std::sync::Arc;

use super::matcher::{match_member, MemberRef};
use super::synth::{AnnotationTypeCache, Synthesizer};
use super::Diagnostic;
use crate::ast::{AnnotationIndex, AnnotationIndexEntry, ElementPath};
use crate::common::symbols::{AnnotatedType, AnnotationMirror, ClassSymbol, UnitId};
use crate::common::SymbolEnvironment;
use crate::error::{Error, Result};

/// Per-unit progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichState {
    Unvisited,
    Enriching,
    Enriched,
}

/// Applies one shared index to compilation units
#[derive(Debug)]
pub struct Enricher {
    index: Arc<AnnotationIndex>,
    cache: AnnotationTypeCache,
    states: HashMap<UnitId, EnrichState>,
    diagnostics: Vec<Diagnostic>,
}

impl Enricher {
    pub fn new(index: Arc<AnnotationIndex>) -> Self {
        Self { index, cache: AnnotationTypeCache::new(), states: HashMap::new(), diagnostics: Vec::new() }
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    pub fn cache(&self) -> &AnnotationTypeCache {
        &self.cache
    }

    pub fn state(&self, unit: UnitId) -> EnrichState {
        self.states.get(&unit).copied().unwrap_or(EnrichState::Unvisited)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Enrich every class of `unit`; returns how many classes were replaced.
    ///
    /// A unit that is already enriched is left alone.
    pub fn enrich_unit(&mut self, env: &mut SymbolEnvironment, unit: UnitId) -> Result<usize> {
        if env.unit(unit).is_none() {
            return Err(Error::UnknownUnit(unit.index()));
        }
        match self.state(unit) {
            EnrichState::Enriched => {
                log::trace!("ENRICH: unit #{} already enriched", unit.index());
                return Ok(0);
            }
            EnrichState::Enriching => {
                return Err(Error::internal_error(format!("unit #{} entered twice while enriching", unit.index())));
            }
            EnrichState::Unvisited => {}
        }
        self.states.insert(unit, EnrichState::Enriching);

        let mut replaced = 0;
        for id in env.unit_classes(unit) {
            let original = Arc::clone(env.class(id));
            if let Some(enriched) = self.enrich_class(env, &original) {
                env.replace(id, enriched)?;
                replaced += 1;
            }
        }

        self.states.insert(unit, EnrichState::Enriched);
        log::debug!("ENRICH: unit #{} done, {} classes replaced", unit.index(), replaced);
        Ok(replaced)
    }

    /// Working copy of `class` with its entries applied, or `None` when
    /// nothing changed
    fn enrich_class(&mut self, env: &SymbolEnvironment, class: &ClassSymbol) -> Option<ClassSymbol> {
        let index = Arc::clone(&self.index);
        let mut entries = index.entries_for_owner(&class.binary_name).peekable();
        entries.peek()?;

        let mut synth = Synthesizer::new(env, &index, &mut self.cache, &mut self.diagnostics);
        let mut working = class.clone();
        let mut changed = false;
        for entry in entries {
            let Some(target) = match_member(entry, &working) else {
                log::debug!("ENRICH: dropping unmatched entry {}", entry);
                continue;
            };
            let mirrors: Vec<AnnotationMirror> =
                entry.annotations.iter().map(|a| synth.mirror(a, &entry.package)).collect();
            changed |= apply(&mut working, target, entry, mirrors);
        }
        changed.then_some(working)
    }
}

/// Attach `mirrors` to the element selected by `target` and the entry's path.
/// Returns whether anything was added.
fn apply(
    class: &mut ClassSymbol,
    target: MemberRef,
    entry: &AnnotationIndexEntry,
    mirrors: Vec<AnnotationMirror>,
) -> bool {
    match (target, entry.path) {
        (MemberRef::Class, ElementPath::Declaration) => {
            class.annotations.extend(mirrors);
            true
        }
        (MemberRef::Method(i), path) => {
            let method = &class.methods[i];
            let reference_target = match path {
                ElementPath::ReturnType => method.return_type.ty.is_reference(),
                ElementPath::ParameterType(p) => method.params[p].ty.ty.is_reference(),
                _ => true,
            };
            if !reference_target {
                log::trace!("ENRICH: type annotation on primitive ignored: {}", entry);
                return false;
            }
            let method = Arc::make_mut(&mut class.methods[i]);
            match path {
                ElementPath::Declaration => method.annotations.extend(mirrors),
                ElementPath::ReturnType => add_type_annotations(&mut method.return_type, mirrors),
                ElementPath::Parameter(p) => method.params[p].annotations.extend(mirrors),
                ElementPath::ParameterType(p) => add_type_annotations(&mut method.params[p].ty, mirrors),
                ElementPath::FieldType => return false,
            }
            true
        }
        (MemberRef::Field(i), path) => {
            if path == ElementPath::FieldType && !class.fields[i].ty.ty.is_reference() {
                log::trace!("ENRICH: type annotation on primitive ignored: {}", entry);
                return false;
            }
            let field = Arc::make_mut(&mut class.fields[i]);
            match path {
                ElementPath::Declaration => field.annotations.extend(mirrors),
                ElementPath::FieldType => add_type_annotations(&mut field.ty, mirrors),
                _ => return false,
            }
            true
        }
        (MemberRef::Class, _) => false,
    }
}

fn add_type_annotations(ty: &mut AnnotatedType, mirrors: Vec<AnnotationMirror>) {
    ty.annotations.extend(mirrors);
}
