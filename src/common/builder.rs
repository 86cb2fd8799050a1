//! Builders for entering compilation units into a [`SymbolEnvironment`].
//!
//! A front end (or a test) describes each top-level class with a
//! [`ClassBuilder`]; [`SymbolEnvironment::add_unit`] assigns class slots,
//! computes binary names and wires enclosing/nested links.

use std::sync::Arc;

use super::env::SymbolEnvironment;
use super::symbols::{
    AnnotatedType, AnnotationMirror, AnnotationValue, ClassId, ClassKind, ClassSymbol, FieldSymbol, MethodKind,
    MethodSymbol, Modifier, ParamSymbol, UnitId,
};
use super::types::TypeRef;
use crate::consts::{CONSTRUCTOR_NAME, NESTED_CLASS_DELIMITER};

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    symbol: MethodSymbol,
}

impl MethodBuilder {
    /// A method returning `void` until [`returns`](Self::returns) says otherwise
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            symbol: MethodSymbol {
                name: name.into(),
                kind: MethodKind::Method,
                modifiers: vec![Modifier::Public],
                params: Vec::new(),
                return_type: AnnotatedType::new(TypeRef::Void),
                annotations: Vec::new(),
                default_value: None,
            },
        }
    }

    pub fn constructor() -> Self {
        let mut b = Self::new(CONSTRUCTOR_NAME);
        b.symbol.kind = MethodKind::Constructor;
        b
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.symbol.return_type = AnnotatedType::new(ty);
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.symbol.params.push(ParamSymbol { name: name.into(), ty: AnnotatedType::new(ty), annotations: Vec::new() });
        self
    }

    /// Parameter carrying source declaration annotations
    pub fn annotated_param(mut self, name: impl Into<String>, ty: TypeRef, annotations: Vec<AnnotationMirror>) -> Self {
        self.symbol.params.push(ParamSymbol { name: name.into(), ty: AnnotatedType::new(ty), annotations });
        self
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.symbol.modifiers = modifiers.to_vec();
        self
    }

    pub fn with_static(mut self) -> Self {
        if !self.symbol.modifiers.contains(&Modifier::Static) {
            self.symbol.modifiers.push(Modifier::Static);
        }
        self
    }

    pub fn annotate(mut self, annotation: AnnotationMirror) -> Self {
        self.symbol.annotations.push(annotation);
        self
    }

    pub fn annotate_return(mut self, annotation: AnnotationMirror) -> Self {
        self.symbol.return_type.annotations.push(annotation);
        self
    }

    pub fn default_value(mut self, value: AnnotationValue) -> Self {
        self.symbol.default_value = Some(value);
        self
    }

    pub fn build(self) -> MethodSymbol {
        self.symbol
    }
}

#[derive(Debug, Clone)]
pub struct FieldBuilder {
    symbol: FieldSymbol,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            symbol: FieldSymbol {
                name: name.into(),
                modifiers: vec![Modifier::Private],
                ty: AnnotatedType::new(ty),
                annotations: Vec::new(),
            },
        }
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.symbol.modifiers = modifiers.to_vec();
        self
    }

    pub fn annotate(mut self, annotation: AnnotationMirror) -> Self {
        self.symbol.annotations.push(annotation);
        self
    }

    pub fn build(self) -> FieldSymbol {
        self.symbol
    }
}

#[derive(Debug, Clone)]
pub struct ClassBuilder {
    simple_name: String,
    kind: ClassKind,
    modifiers: Vec<Modifier>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    annotations: Vec<AnnotationMirror>,
    methods: Vec<MethodSymbol>,
    fields: Vec<FieldSymbol>,
    nested: Vec<ClassBuilder>,
}

impl ClassBuilder {
    fn with_kind(simple_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            simple_name: simple_name.into(),
            kind,
            modifiers: vec![Modifier::Public],
            superclass: match kind {
                ClassKind::Class => Some("java.lang.Object".to_string()),
                ClassKind::Enum => Some("java.lang.Enum".to_string()),
                ClassKind::Interface | ClassKind::Annotation => None,
            },
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn class(simple_name: impl Into<String>) -> Self {
        Self::with_kind(simple_name, ClassKind::Class)
    }

    pub fn interface(simple_name: impl Into<String>) -> Self {
        Self::with_kind(simple_name, ClassKind::Interface)
    }

    pub fn enumeration(simple_name: impl Into<String>) -> Self {
        Self::with_kind(simple_name, ClassKind::Enum)
    }

    pub fn annotation_type(simple_name: impl Into<String>) -> Self {
        Self::with_kind(simple_name, ClassKind::Annotation)
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers = modifiers.to_vec();
        self
    }

    pub fn with_static(mut self) -> Self {
        if !self.modifiers.contains(&Modifier::Static) {
            self.modifiers.push(Modifier::Static);
        }
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn annotate(mut self, annotation: AnnotationMirror) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method.build());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field.build());
        self
    }

    pub fn nested(mut self, class: ClassBuilder) -> Self {
        self.nested.push(class);
        self
    }
}

impl SymbolEnvironment {
    /// Enter one compilation unit and return its id
    pub fn add_unit(&mut self, package: &str, classes: Vec<ClassBuilder>) -> UnitId {
        self.add_unit_at(package, None, classes)
    }

    pub fn add_unit_at(&mut self, package: &str, path: Option<&str>, classes: Vec<ClassBuilder>) -> UnitId {
        let unit = self.push_unit(package.to_string(), path.map(str::to_string));
        for class in classes {
            let binary_name = if package.is_empty() {
                class.simple_name.clone()
            } else {
                format!("{}.{}", package, class.simple_name)
            };
            let id = self.enter_class(unit, binary_name, None, class);
            self.register_top_level(unit, id);
        }
        log::debug!("ENTER: unit #{} package '{}' ({} classes total)", unit.index(), package, self.class_count());
        unit
    }

    fn enter_class(
        &mut self,
        unit: UnitId,
        binary_name: String,
        enclosing: Option<ClassId>,
        class: ClassBuilder,
    ) -> ClassId {
        let mut symbol = ClassSymbol {
            binary_name,
            kind: class.kind,
            modifiers: class.modifiers,
            superclass: class.superclass,
            interfaces: class.interfaces,
            annotations: class.annotations,
            methods: class.methods.into_iter().map(Arc::new).collect(),
            fields: class.fields.into_iter().map(Arc::new).collect(),
            enclosing,
            nested: Vec::new(),
            unit,
        };
        let id = self.reserve_class(symbol.clone());
        for nested in class.nested {
            let nested_name = format!("{}{}{}", symbol.binary_name, NESTED_CLASS_DELIMITER, nested.simple_name);
            let nested_id = self.enter_class(unit, nested_name, Some(id), nested);
            symbol.nested.push(nested_id);
        }
        self.fill_class(id, symbol);
        id
    }
}
