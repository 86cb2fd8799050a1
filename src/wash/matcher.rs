//! Signature matching - resolve an index entry against a class's members
//!
//! Matching is exact: a method entry selects the one member whose name,
//! parameter types and return type equal the decoded descriptor. There is no
//! erasure, no boxing and no fallback to a same-named overload.

use crate::ast::{AnnotationIndexEntry, ElementPath, MemberSignature};
use crate::common::descriptor::MethodDescriptor;
use crate::common::symbols::{ClassSymbol, MethodSymbol};
use crate::consts::CONSTRUCTOR_NAME;

/// The element of a class an entry resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef {
    Class,
    /// Position in [`ClassSymbol::methods`]
    Method(usize),
    /// Position in [`ClassSymbol::fields`]
    Field(usize),
}

/// Resolve `entry` against `class`, which must be the class named by the
/// entry's owner. `None` means the entry does not apply to this program.
pub fn match_member(entry: &AnnotationIndexEntry, class: &ClassSymbol) -> Option<MemberRef> {
    let member = match &entry.member {
        None => {
            return match entry.path {
                ElementPath::Declaration => Some(MemberRef::Class),
                _ => None,
            }
        }
        Some(member) => member,
    };

    match member {
        MemberSignature::Method { name, descriptor } => {
            let index = class.methods.iter().position(|m| method_matches(m, name, descriptor))?;
            let method = &class.methods[index];
            let in_range = match entry.path {
                ElementPath::Declaration | ElementPath::ReturnType => true,
                ElementPath::Parameter(i) | ElementPath::ParameterType(i) => i < method.params.len(),
                ElementPath::FieldType => false,
            };
            in_range.then_some(MemberRef::Method(index))
        }
        MemberSignature::Field { name } => {
            let index = class.fields.iter().position(|f| &f.name == name)?;
            match entry.path {
                ElementPath::Declaration | ElementPath::FieldType => Some(MemberRef::Field(index)),
                _ => None,
            }
        }
    }
}

fn method_matches(method: &MethodSymbol, name: &str, descriptor: &MethodDescriptor) -> bool {
    let name_matches = if name == CONSTRUCTOR_NAME {
        method.is_constructor()
    } else {
        !method.is_constructor() && method.name == name
    };
    name_matches
        && method.params.len() == descriptor.arity()
        && method.parameter_types().eq(descriptor.parameters.iter())
        && method.return_type.ty == descriptor.return_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::common::{ClassBuilder, MethodBuilder, PrimitiveType, SymbolEnvironment, TypeRef};

    fn entry(member: Option<MemberSignature>, path: ElementPath) -> AnnotationIndexEntry {
        AnnotationIndexEntry {
            owner: "p.Test".to_string(),
            package: "p".to_string(),
            member,
            path,
            annotations: Vec::new(),
            location: Location::start(),
        }
    }

    fn method(name: &str, descriptor: &str) -> Option<MemberSignature> {
        Some(MemberSignature::Method {
            name: name.to_string(),
            descriptor: MethodDescriptor::parse(descriptor).expect("valid descriptor"),
        })
    }

    fn test_class() -> SymbolEnvironment {
        let mut env = SymbolEnvironment::new();
        env.add_unit(
            "p",
            vec![ClassBuilder::class("Test")
                .method(MethodBuilder::constructor().param("s", TypeRef::string()))
                .method(
                    MethodBuilder::new("foo")
                        .param("i", TypeRef::Primitive(PrimitiveType::Int))
                        .returns(TypeRef::string()),
                )
                .method(MethodBuilder::new("foo").param("s", TypeRef::string()).returns(TypeRef::string()))],
        );
        env
    }

    #[test]
    fn test_overloads_resolve_exactly() {
        let env = test_class();
        let class = env.find("p.Test").expect("class");
        let by_int = entry(method("foo", "(I)Ljava/lang/String;"), ElementPath::Declaration);
        assert_eq!(match_member(&by_int, class), Some(MemberRef::Method(1)));
        let by_string = entry(method("foo", "(Ljava/lang/String;)Ljava/lang/String;"), ElementPath::Declaration);
        assert_eq!(match_member(&by_string, class), Some(MemberRef::Method(2)));
        // return type is part of the signature
        assert_eq!(match_member(&entry(method("foo", "(I)V"), ElementPath::Declaration), class), None);
        assert_eq!(match_member(&entry(method("foo", "(J)Ljava/lang/String;"), ElementPath::Declaration), class), None);
    }

    #[test]
    fn test_constructor_and_parameter_range() {
        let env = test_class();
        let class = env.find("p.Test").expect("class");
        let first = entry(method("<init>", "(Ljava/lang/String;)V"), ElementPath::Parameter(0));
        assert_eq!(match_member(&first, class), Some(MemberRef::Method(0)));
        let second = entry(method("<init>", "(Ljava/lang/String;)V"), ElementPath::Parameter(1));
        assert_eq!(match_member(&second, class), None);
        assert_eq!(match_member(&entry(None, ElementPath::Declaration), class), Some(MemberRef::Class));
    }
}
