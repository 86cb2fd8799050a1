//! Parser module for annotation index files
//!
//! This module handles lexical analysis and parsing of `.jaif` text into an
//! [`AnnotationIndex`](crate::ast::AnnotationIndex).

pub mod lexer;
pub mod parser;
pub mod error;
pub mod span;

pub use lexer::Lexer;
pub use parser::{ParseOutput, Parser};
pub use error::{ParseError, ParseResult};
pub use span::Location;

/// Parse one index text. Malformed entries are reported, never fatal.
pub fn parse_index(source: &str) -> ParseOutput {
    parser::parse(source)
}

/// Parse several index fragments into one index, in order
pub fn parse_fragments<'a, I>(sources: I) -> ParseOutput
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = ParseOutput::default();
    for source in sources {
        let fragment = parse_index(source);
        out.index.merge(fragment.index);
        out.diagnostics.extend(fragment.diagnostics);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ElementPath, MemberSignature, ParsedValue};
    use crate::wash::Diagnostic;

    #[test]
    fn test_parse_simple_index() {
        let source = r#"
package p:
  class Test:
    method foo(Ljava/lang/String;)Ljava/lang/String:
      return: @p.NonNull
"#;
        // missing ';' after the return type makes the descriptor invalid
        let out = parse_index(source);
        assert_eq!(out.index.len(), 0);
        assert!(matches!(out.diagnostics[0], Diagnostic::MalformedIndexEntry { .. }));

        let fixed = source.replace("String:", "String;:");
        let out = parse_index(&fixed);
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let entry = &out.index.entries()[0];
        assert_eq!(entry.owner, "p.Test");
        assert_eq!(entry.path, ElementPath::ReturnType);
        match &entry.member {
            Some(MemberSignature::Method { name, descriptor }) => {
                assert_eq!(name, "foo");
                assert_eq!(descriptor.arity(), 1);
            }
            other => panic!("unexpected member {other:?}"),
        }
    }

    #[test]
    fn test_parse_declaration_and_values() {
        let source = r#"
package p:
  annotation @Level:
    @java.lang.annotation.Retention(RUNTIME)
    String value
    int[] codes = {1, 2}
  class Test:
    field name:
      @p.Level(value = "x", codes = 3)
"#;
        let out = parse_index(source);
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
        let decl = out.index.declaration("p.Level").expect("declared");
        assert_eq!(decl.elements.len(), 2);
        assert_eq!(decl.elements[1].default, Some(ParsedValue::Array(vec![ParsedValue::Int(1), ParsedValue::Int(2)])));
        let annotation = &out.index.entries()[0].annotations[0];
        assert_eq!(annotation.value("codes"), Some(&ParsedValue::Int(3)));
    }

    #[test]
    fn test_fragments_last_declaration_wins() {
        let a = "package p: annotation @A: int x";
        let b = "package p: annotation @A: String y";
        let out = parse_fragments([a, b]);
        let decl = out.index.declaration("p.A").expect("declared");
        assert_eq!(decl.elements[0].name, "y");
    }
}
