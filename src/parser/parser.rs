//! Recursive-descent parser for the annotation index format.
//!
//! The grammar is LL(1) at the token level. Blocks are opened by keywords
//! (`package`, `annotation`, `class`, `method`, `field`) and indentation only
//! matters to human readers. Keywords that are legal Java identifiers only
//! open a block at a header position; after a `.` or `/`, or as a member name,
//! they are ordinary names. Every error is funnelled through
//! [`Parser::recover`], which records a diagnostic and resynchronizes on the
//! next block keyword, so one bad entry never costs the rest of the file.

use super::error::{ParseError, ParseResult};
use super::lexer::{LexicalToken, Lexer, Token};
use crate::ast::{
    AnnotationIndex, AnnotationIndexEntry, AnnotationTypeDecl, ElementDecl, ElementPath, Location, MemberSignature,
    ParsedAnnotation, ParsedValue,
};
use crate::common::descriptor::MethodDescriptor;
use crate::common::types::{ElementType, PrimitiveType};
use crate::consts::{DEFAULT_ELEMENT_NAME, PARSER_MAX_RECOVERY_SKIP, PARSER_MAX_VALUE_DEPTH};
use crate::wash::Diagnostic;

/// Result of parsing one index text
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub index: AnnotationIndex,
    pub diagnostics: Vec<Diagnostic>,
}

/// Enclosing package/class of the block being parsed
#[derive(Debug, Clone, PartialEq)]
enum Context {
    Missing,
    Valid(String),
    /// The header was malformed; members are skipped without further diagnostics
    Invalid,
}

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<LexicalToken>,
    pos: usize,
    block_start: usize,
    package: Context,
    class: Context,
    index: AnnotationIndex,
    /// Entries of the block being parsed; dropped if the block turns out malformed
    pending: Vec<AnnotationIndexEntry>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Lexer::new(source).tokenize(),
            pos: 0,
            block_start: 0,
            package: Context::Missing,
            class: Context::Missing,
            index: AnnotationIndex::new(),
            pending: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole text
    pub fn parse(mut self) -> ParseOutput {
        while let Some(token) = self.peek() {
            self.block_start = self.pos;
            let package_invalid = self.package == Context::Invalid;
            let result = match token {
                Token::Package => self.parse_package(),
                Token::Annotation | Token::Class if package_invalid => {
                    self.skip_block();
                    Ok(())
                }
                Token::Annotation => self.parse_annotation_decl(),
                Token::Class => self.parse_class(),
                Token::Method | Token::Field => match self.class {
                    Context::Valid(_) if token == Token::Method => self.parse_method(),
                    Context::Valid(_) => self.parse_field(),
                    Context::Invalid => {
                        self.skip_block();
                        Ok(())
                    }
                    Context::Missing => Err(self.unexpected("a 'class' block before members")),
                },
                _ => Err(self.unexpected("'package', 'annotation', 'class', 'method' or 'field'")),
            };
            match result {
                Ok(()) => self.commit(),
                Err(e) => {
                    self.pending.clear();
                    self.recover(e);
                }
            }
        }
        log::debug!(
            "INDEX: parsed {} entries, {} annotation declarations, {} malformed",
            self.index.len(),
            self.index.declarations().len(),
            self.diagnostics.len()
        );
        ParseOutput { index: self.index, diagnostics: self.diagnostics }
    }

    // ----- token helpers -----

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|t| t.token)
    }

    fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).map(|t| t.token)
    }

    fn current(&self) -> Option<&LexicalToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<LexicalToken> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn check(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn end_location(&self) -> Location {
        self.tokens.last().map(|t| t.end()).unwrap_or_else(Location::start)
    }

    fn location(&self) -> Location {
        self.current().map(|t| t.location).unwrap_or_else(|| self.end_location())
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(t) => ParseError::unexpected_token(expected, &t.lexeme, t.location),
            None => ParseError::unexpected_end_of_input(expected, self.end_location()),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> ParseResult<LexicalToken> {
        if self.check(token) {
            self.advance().ok_or_else(|| self.unexpected(expected))
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn previous(&self) -> Option<Token> {
        self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)).map(|t| t.token)
    }

    /// A block keyword in header position, not part of a name or an element assignment
    fn at_block_start(&self) -> bool {
        self.peek().map(|t| t.is_block_start()).unwrap_or(false)
            && !matches!(self.previous(), Some(Token::Dot) | Some(Token::Slash) | Some(Token::At))
            && self.peek_nth(1) != Some(Token::Assign)
    }

    fn name(&mut self, expected: &str) -> ParseResult<String> {
        match self.peek() {
            Some(t) if t.is_name() => self.advance().map(|t| t.lexeme).ok_or_else(|| self.unexpected(expected)),
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Element names may collide with index keywords (`type`, `enum`, ...)
    fn element_name(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(t) if t == Token::Identifier || (t.is_keyword() && !t.is_literal()) => {
                self.advance().map(|t| t.lexeme).ok_or_else(|| self.unexpected("element name"))
            }
            _ => Err(self.unexpected("element name")),
        }
    }

    fn qualified_name(&mut self, expected: &str) -> ParseResult<String> {
        let mut name = self.name(expected)?;
        while self.check(Token::Dot) && self.peek_nth(1).map(|t| t.is_name()).unwrap_or(false) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.name(expected)?);
        }
        Ok(name)
    }

    // ----- recovery -----

    /// Record the error and skip to the next block keyword.
    fn recover(&mut self, error: ParseError) {
        log::debug!("INDEX: malformed entry at {}: {}", error.location(), error);
        self.diagnostics.push(error.into_diagnostic(self.source));
        if self.pos == self.block_start {
            self.pos += 1;
        }
        let mut skipped = 0usize;
        while self.peek().is_some() && !self.at_block_start() && skipped < PARSER_MAX_RECOVERY_SKIP {
            self.pos += 1;
            skipped += 1;
        }
    }

    /// Skip a block whose enclosing header was malformed
    fn skip_block(&mut self) {
        self.pos += 1;
        while self.peek().is_some() && !self.at_block_start() {
            self.pos += 1;
        }
    }

    // ----- blocks -----

    fn parse_package(&mut self) -> ParseResult<()> {
        self.package = Context::Invalid;
        self.class = Context::Missing;
        self.expect(Token::Package, "'package'")?;
        let name = if self.check(Token::Colon) {
            String::new()
        } else {
            self.qualified_name("package name")?
        };
        self.expect(Token::Colon, "':' after package name")?;
        log::trace!("INDEX: package '{}'", name);
        self.package = Context::Valid(name);
        Ok(())
    }

    fn package_name(&self) -> String {
        match &self.package {
            Context::Valid(name) => name.clone(),
            _ => String::new(),
        }
    }

    fn qualify(&self, simple: &str) -> String {
        let package = self.package_name();
        if package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", package, simple)
        }
    }

    fn parse_class(&mut self) -> ParseResult<()> {
        self.class = Context::Invalid;
        let keyword = self.expect(Token::Class, "'class'")?;
        let name = self.name("class name")?;
        self.expect(Token::Colon, "':' after class name")?;
        let owner = self.qualify(&name);
        self.class = Context::Valid(owner.clone());
        let annotations = self.annotations()?;
        self.push_entry(owner, None, ElementPath::Declaration, annotations, keyword.location);
        Ok(())
    }

    fn owner(&self) -> String {
        match &self.class {
            Context::Valid(owner) => owner.clone(),
            _ => String::new(),
        }
    }

    fn parse_method(&mut self) -> ParseResult<()> {
        let keyword = self.expect(Token::Method, "'method'")?;
        let name = match self.peek() {
            Some(Token::SpecialName) => self.advance().map(|t| t.lexeme).ok_or_else(|| self.unexpected("method name"))?,
            _ => self.name("method name")?,
        };
        let descriptor = self.method_descriptor()?;
        self.expect(Token::Colon, "':' after method descriptor")?;

        let owner = self.owner();
        let member = MemberSignature::Method { name, descriptor };
        let annotations = self.annotations()?;
        self.push_entry(owner.clone(), Some(member.clone()), ElementPath::Declaration, annotations, keyword.location);

        loop {
            if self.at_block_start() {
                break;
            }
            match self.peek() {
                Some(Token::Return) => {
                    self.commit();
                    let at = self.location();
                    self.pos += 1;
                    self.expect(Token::Colon, "':' after 'return'")?;
                    let annotations = self.annotations()?;
                    self.push_entry(owner.clone(), Some(member.clone()), ElementPath::ReturnType, annotations, at);
                }
                Some(Token::Parameter) => {
                    self.commit();
                    let at = self.location();
                    self.pos += 1;
                    self.expect(Token::Hash, "'#' before parameter index")?;
                    let index = self.parameter_index()?;
                    self.expect(Token::Colon, "':' after parameter index")?;
                    let annotations = self.annotations()?;
                    let path = ElementPath::Parameter(index);
                    self.push_entry(owner.clone(), Some(member.clone()), path, annotations, at);
                    if let Some(type_annotations) = self.type_block()? {
                        self.push_entry(
                            owner.clone(),
                            Some(member.clone()),
                            ElementPath::ParameterType(index),
                            type_annotations,
                            at,
                        );
                    }
                }
                None => break,
                Some(_) => return Err(self.unexpected("'return', 'parameter', '@' or a new block")),
            }
        }
        Ok(())
    }

    fn parameter_index(&mut self) -> ParseResult<usize> {
        let token = self.expect(Token::DecimalInteger, "parameter index")?;
        token
            .lexeme
            .parse::<usize>()
            .map_err(|e| ParseError::invalid_literal(&token.lexeme, e.to_string(), token.location))
    }

    /// The descriptor is the exact text from `(` up to the block colon
    fn method_descriptor(&mut self) -> ParseResult<MethodDescriptor> {
        let open = self.expect(Token::LParen, "'(' starting method descriptor")?;
        let start = open.location;
        let mut end = open.end();
        while let Some(t) = self.current() {
            if t.token == Token::Colon {
                break;
            }
            if !t.token.is_descriptor_part() || t.location.offset != end.offset {
                return Err(self.unexpected("method descriptor followed by ':'"));
            }
            end = t.end();
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.unexpected("':' after method descriptor"));
        }
        let text = &self.source[start.offset..end.offset];
        MethodDescriptor::parse(text).map_err(|source| ParseError::InvalidDescriptor { source, location: start })
    }

    fn parse_field(&mut self) -> ParseResult<()> {
        let keyword = self.expect(Token::Field, "'field'")?;
        let name = self.name("field name")?;
        self.expect(Token::Colon, "':' after field name")?;
        let owner = self.owner();
        let member = MemberSignature::Field { name };
        let annotations = self.annotations()?;
        self.push_entry(owner.clone(), Some(member.clone()), ElementPath::Declaration, annotations, keyword.location);
        if let Some(type_annotations) = self.type_block()? {
            self.push_entry(owner, Some(member), ElementPath::FieldType, type_annotations, keyword.location);
        }
        if self.peek().is_some() && !self.at_block_start() {
            return Err(self.unexpected("'type', '@' or a new block"));
        }
        Ok(())
    }

    /// Optional `type: @A ...` sub-block
    fn type_block(&mut self) -> ParseResult<Option<Vec<ParsedAnnotation>>> {
        if !self.eat(Token::Type) {
            return Ok(None);
        }
        self.commit();
        self.expect(Token::Colon, "':' after 'type'")?;
        Ok(Some(self.annotations()?))
    }

    fn push_entry(
        &mut self,
        owner: String,
        member: Option<MemberSignature>,
        path: ElementPath,
        annotations: Vec<ParsedAnnotation>,
        location: Location,
    ) {
        if annotations.is_empty() {
            return;
        }
        self.pending.push(AnnotationIndexEntry {
            owner,
            package: self.package_name(),
            member,
            path,
            annotations,
            location,
        });
    }

    /// Keep the entries parsed so far; they no longer depend on what follows
    fn commit(&mut self) {
        for entry in self.pending.drain(..) {
            self.index.push_entry(entry);
        }
    }

    fn parse_annotation_decl(&mut self) -> ParseResult<()> {
        let keyword = self.expect(Token::Annotation, "'annotation'")?;
        self.expect(Token::At, "'@' before annotation name")?;
        let name = self.name("annotation name")?;
        self.expect(Token::Colon, "':' after annotation name")?;
        let annotations = self.annotations()?;
        let mut elements = Vec::new();
        while self.peek().is_some() && !self.at_block_start() {
            elements.push(self.element_decl()?);
        }
        let decl = AnnotationTypeDecl { name: self.qualify(&name), annotations, elements, location: keyword.location };
        log::trace!("INDEX: annotation type '{}' with {} elements", decl.name, decl.elements.len());
        self.index.declare(decl);
        Ok(())
    }

    fn element_decl(&mut self) -> ParseResult<ElementDecl> {
        let ty = self.element_type()?;
        let name = self.element_name()?;
        let default = if self.eat(Token::Assign) { Some(self.value(0)?) } else { None };
        Ok(ElementDecl { name, ty, default })
    }

    fn element_type(&mut self) -> ParseResult<ElementType> {
        let mut ty = match self.peek() {
            Some(Token::Enum) => {
                self.pos += 1;
                ElementType::Enum(self.qualified_name("enum type name")?)
            }
            Some(Token::AnnotationField) => {
                self.pos += 1;
                ElementType::Annotation(self.qualified_name("annotation type name")?)
            }
            Some(Token::Identifier) => {
                let location = self.location();
                let name = self.qualified_name("element type")?;
                match name.as_str() {
                    "String" | "java.lang.String" => ElementType::String,
                    "Class" | "java.lang.Class" => ElementType::Class,
                    other => match PrimitiveType::from_keyword(other) {
                        Some(p) => ElementType::Primitive(p),
                        None => {
                            return Err(ParseError::unexpected_token(
                                "primitive, String, Class, 'enum' or 'annotation-field' element type",
                                other,
                                location,
                            ))
                        }
                    },
                }
            }
            _ => return Err(self.unexpected("annotation element type")),
        };
        while self.check(Token::LBracket) {
            self.pos += 1;
            self.expect(Token::RBracket, "']'")?;
            ty = ElementType::Array(Box::new(ty));
        }
        Ok(ty)
    }

    // ----- annotations and values -----

    fn annotations(&mut self) -> ParseResult<Vec<ParsedAnnotation>> {
        let mut out = Vec::new();
        while self.check(Token::At) {
            out.push(self.annotation(0)?);
        }
        Ok(out)
    }

    fn annotation(&mut self, depth: usize) -> ParseResult<ParsedAnnotation> {
        let at = self.expect(Token::At, "'@'")?;
        let type_name = self.qualified_name("annotation type name")?;
        let mut annotation = ParsedAnnotation::new(type_name, at.location);
        if !self.eat(Token::LParen) {
            return Ok(annotation);
        }
        if self.eat(Token::RParen) {
            return Ok(annotation);
        }
        let named = self.peek().map(|t| t == Token::Identifier || t.is_keyword()).unwrap_or(false)
            && self.peek_nth(1) == Some(Token::Assign);
        if named {
            loop {
                let name = self.element_name()?;
                self.expect(Token::Assign, "'=' after element name")?;
                let value = self.value(depth + 1)?;
                annotation.values.push((name, value));
                if !self.eat(Token::Comma) {
                    break;
                }
            }
        } else {
            let value = self.value(depth + 1)?;
            annotation.values.push((DEFAULT_ELEMENT_NAME.to_string(), value));
        }
        self.expect(Token::RParen, "')' closing annotation arguments")?;
        Ok(annotation)
    }

    fn value(&mut self, depth: usize) -> ParseResult<ParsedValue> {
        if depth > PARSER_MAX_VALUE_DEPTH {
            return Err(ParseError::TooDeep { location: self.location() });
        }
        let token = match self.current() {
            Some(t) => t.clone(),
            None => return Err(self.unexpected("annotation value")),
        };
        match token.token {
            Token::True => {
                self.pos += 1;
                Ok(ParsedValue::Bool(true))
            }
            Token::False => {
                self.pos += 1;
                Ok(ParsedValue::Bool(false))
            }
            Token::StringLiteral => {
                self.pos += 1;
                let inner = &token.lexeme[1..token.lexeme.len() - 1];
                let text =
                    unescape(inner).map_err(|m| ParseError::invalid_literal(&token.lexeme, m, token.location))?;
                Ok(ParsedValue::Str(text))
            }
            Token::CharLiteral => {
                self.pos += 1;
                let inner = &token.lexeme[1..token.lexeme.len() - 1];
                let text =
                    unescape(inner).map_err(|m| ParseError::invalid_literal(&token.lexeme, m, token.location))?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(ParsedValue::Char(c)),
                    _ => Err(ParseError::invalid_literal(
                        &token.lexeme,
                        "expected a single character",
                        token.location,
                    )),
                }
            }
            Token::DecimalInteger | Token::HexInteger => {
                self.pos += 1;
                parse_integer(&token.lexeme)
                    .map(ParsedValue::Int)
                    .ok_or_else(|| ParseError::invalid_literal(&token.lexeme, "integer out of range", token.location))
            }
            Token::FloatLiteral => {
                self.pos += 1;
                let digits = token.lexeme.trim_end_matches(|c| matches!(c, 'f' | 'F' | 'd' | 'D'));
                digits
                    .parse::<f64>()
                    .map(ParsedValue::Float)
                    .map_err(|e| ParseError::invalid_literal(&token.lexeme, e.to_string(), token.location))
            }
            Token::LBrace => {
                self.pos += 1;
                let mut values = Vec::new();
                if !self.eat(Token::RBrace) {
                    loop {
                        values.push(self.value(depth + 1)?);
                        if !self.eat(Token::Comma) {
                            break;
                        }
                    }
                    self.expect(Token::RBrace, "'}' closing array value")?;
                }
                Ok(ParsedValue::Array(values))
            }
            Token::At => Ok(ParsedValue::Annotation(self.annotation(depth + 1)?)),
            t if t.is_name() => {
                let name = self.qualified_name("annotation value")?;
                if self.check(Token::Dot) && self.peek_nth(1) == Some(Token::Class) {
                    self.pos += 2;
                    Ok(ParsedValue::ClassLiteral(name))
                } else {
                    Ok(ParsedValue::Name(name))
                }
            }
            _ => Err(self.unexpected("annotation value")),
        }
    }
}

fn parse_integer(lexeme: &str) -> Option<i64> {
    let (negative, body) = match lexeme.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, lexeme),
    };
    let body = body.trim_end_matches(|c| c == 'l' || c == 'L');
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<i128>().ok()?
    };
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// Resolve Java escape sequences in a string or char literal body
fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('0') => out.push('\0'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16).map_err(|_| format!("bad unicode escape '\\u{}'", hex))?;
                out.push(char::from_u32(code).ok_or_else(|| format!("invalid code point {:#x}", code))?);
            }
            Some(other) => return Err(format!("unknown escape '\\{}'", other)),
            None => return Err("dangling '\\'".to_string()),
        }
    }
    Ok(out)
}

/// Parse a single index text
pub fn parse(source: &str) -> ParseOutput {
    Parser::new(source).parse()
}
