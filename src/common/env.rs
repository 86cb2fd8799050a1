//! Symbol Environment - arena-backed symbol table for the program model
//!
//! Every class lives in a numbered slot. Traversals go through [`ClassId`]s
//! and the environment, never through stored references, so replacing the
//! symbol in a slot is observed by every later lookup. Nested classes are
//! only reachable through their enclosing class; [`SymbolEnvironment::lookup`]
//! walks `$`-separated binary names down from the top-level class.

use std::collections::HashMap;
use std::sync::Arc;

use super::symbols::{ClassId, ClassKind, ClassSymbol, UnitId};
use crate::consts::NESTED_CLASS_DELIMITER;
use crate::error::{Error, Result};

/// One source file's worth of top-level classes
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub package: String,
    /// Source path if the front end knows it, e.g. `p/Test.java`
    pub path: Option<String>,
    pub classes: Vec<ClassId>,
}

#[derive(Debug, Default, Clone)]
pub struct SymbolEnvironment {
    classes: Vec<Arc<ClassSymbol>>,
    top_level: HashMap<String, ClassId>,
    units: Vec<CompilationUnit>,
}

impl SymbolEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len() as u32).map(UnitId)
    }

    pub fn unit(&self, id: UnitId) -> Option<&CompilationUnit> {
        self.units.get(id.index())
    }

    pub fn class(&self, id: ClassId) -> &Arc<ClassSymbol> {
        &self.classes[id.index()]
    }

    pub fn get(&self, id: ClassId) -> Option<&Arc<ClassSymbol>> {
        self.classes.get(id.index())
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Resolve a binary name such as `p.Test$InnerClass` to a class slot.
    ///
    /// The top-level class is found by name; each `$` segment then selects a
    /// directly nested class by simple name.
    pub fn lookup(&self, binary_name: &str) -> Option<ClassId> {
        let mut segments = binary_name.split(NESTED_CLASS_DELIMITER);
        let top = segments.next()?;
        let mut current = *self.top_level.get(top)?;
        for segment in segments {
            let owner = self.class(current);
            current = *owner.nested.iter().find(|id| self.class(**id).simple_name() == segment)?;
        }
        Some(current)
    }

    pub fn find(&self, binary_name: &str) -> Option<&Arc<ClassSymbol>> {
        self.lookup(binary_name).map(|id| self.class(id))
    }

    pub fn is_annotation_type(&self, binary_name: &str) -> bool {
        self.find(binary_name).map(|c| c.kind == ClassKind::Annotation).unwrap_or(false)
    }

    /// All classes of a unit, top-level first, then their nested classes depth-first
    pub fn unit_classes(&self, unit: UnitId) -> Vec<ClassId> {
        let mut out = Vec::new();
        if let Some(u) = self.unit(unit) {
            for id in &u.classes {
                self.collect_nested(*id, &mut out);
            }
        }
        out
    }

    fn collect_nested(&self, id: ClassId, out: &mut Vec<ClassId>) {
        out.push(id);
        for nested in &self.class(id).nested {
            self.collect_nested(*nested, out);
        }
    }

    /// Superclass names from the direct superclass upwards, as far as the
    /// environment knows them. An unknown supertype is the last entry.
    pub fn superclass_chain(&self, id: ClassId) -> Vec<String> {
        let mut chain = Vec::new();
        let mut next = self.class(id).superclass.clone();
        while let Some(name) = next {
            if chain.contains(&name) {
                break;
            }
            next = self.find(&name).and_then(|c| c.superclass.clone());
            chain.push(name);
        }
        chain
    }

    /// Swap the symbol in a class slot, returning the previous symbol.
    ///
    /// The replacement must describe the same class: same binary name, unit
    /// and structural links. Only annotation data may differ.
    pub fn replace(&mut self, id: ClassId, class: ClassSymbol) -> Result<Arc<ClassSymbol>> {
        let slot = self
            .classes
            .get_mut(id.index())
            .ok_or_else(|| Error::internal_error(format!("no class in slot {}", id.index())))?;
        if slot.binary_name != class.binary_name
            || slot.unit != class.unit
            || slot.enclosing != class.enclosing
            || slot.nested != class.nested
        {
            return Err(Error::internal_error(format!(
                "replacement for '{}' does not describe the same class",
                slot.binary_name
            )));
        }
        Ok(std::mem::replace(slot, Arc::new(class)))
    }

    pub(crate) fn push_unit(&mut self, package: String, path: Option<String>) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(CompilationUnit { package, path, classes: Vec::new() });
        id
    }

    pub(crate) fn reserve_class(&mut self, placeholder: ClassSymbol) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(Arc::new(placeholder));
        id
    }

    pub(crate) fn fill_class(&mut self, id: ClassId, class: ClassSymbol) {
        self.classes[id.index()] = Arc::new(class);
    }

    pub(crate) fn register_top_level(&mut self, unit: UnitId, id: ClassId) {
        let name = self.class(id).binary_name.clone();
        self.top_level.insert(name, id);
        self.units[unit.index()].classes.push(id);
    }
}

impl PartialEq for SymbolEnvironment {
    /// Structural equality, ignoring whether slots share the same allocation
    fn eq(&self, other: &Self) -> bool {
        self.units == other.units
            && self.classes.len() == other.classes.len()
            && self.classes.iter().zip(&other.classes).all(|(a, b)| **a == **b)
    }
}
