// JVMS 4.3 descriptors – strict decoder for field and method descriptors

use std::fmt;

use super::types::{PrimitiveType, TypeRef};
use crate::consts::DESCRIPTOR_MAX_ARRAY_DIMS;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("empty descriptor")]
    Empty,
    #[error("expected '{expected}' at offset {offset} in descriptor '{descriptor}'")]
    Expected { expected: char, offset: usize, descriptor: String },
    #[error("invalid type code '{code}' at offset {offset} in descriptor '{descriptor}'")]
    InvalidTypeCode { code: char, offset: usize, descriptor: String },
    #[error("unterminated class name in descriptor '{0}'")]
    UnterminatedClassName(String),
    #[error("empty class name in descriptor '{0}'")]
    EmptyClassName(String),
    #[error("too many array dimensions in descriptor '{0}'")]
    TooManyDimensions(String),
    #[error("void is only allowed as a return type in descriptor '{0}'")]
    MisplacedVoid(String),
    #[error("trailing characters after descriptor '{0}'")]
    Trailing(String),
}

/// Decoded method descriptor: parameter types and return type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl MethodDescriptor {
    pub fn new(parameters: Vec<TypeRef>, return_type: TypeRef) -> Self {
        Self { parameters, return_type }
    }

    /// Decode `(Ljava/lang/String;I)V`
    pub fn parse(s: &str) -> Result<Self, DescriptorError> {
        if s.is_empty() {
            return Err(DescriptorError::Empty);
        }
        let mut p = Parser::new(s);
        p.expect('(')?;
        let mut parameters = Vec::new();
        while p.peek() != Some(')') {
            if p.eof() {
                return Err(p.expected(')'));
            }
            parameters.push(p.parse_field_type()?);
        }
        p.expect(')')?;
        let return_type = if p.consume('V') { TypeRef::Void } else { p.parse_field_type()? };
        if !p.eof() {
            return Err(DescriptorError::Trailing(s.to_string()));
        }
        Ok(Self { parameters, return_type })
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("(");
        for p in &self.parameters {
            p.write_descriptor(&mut out);
        }
        out.push(')');
        self.return_type.write_descriptor(&mut out);
        f.write_str(&out)
    }
}

/// Decode a single field descriptor such as `[Ljava/lang/Object;`
pub fn parse_field_descriptor(s: &str) -> Result<TypeRef, DescriptorError> {
    if s.is_empty() {
        return Err(DescriptorError::Empty);
    }
    let mut p = Parser::new(s);
    let ty = p.parse_field_type()?;
    if !p.eof() {
        return Err(DescriptorError::Trailing(s.to_string()));
    }
    Ok(ty)
}

// Parser implementation
struct Parser<'a> {
    src: &'a str,
    chars: std::str::CharIndices<'a>,
    look: Option<(usize, char)>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let mut chars = src.char_indices();
        let look = chars.next();
        Self { src, chars, look }
    }
    fn peek(&self) -> Option<char> { self.look.map(|(_, c)| c) }
    fn offset(&self) -> usize { self.look.map(|(i, _)| i).unwrap_or(self.src.len()) }
    fn next(&mut self) -> Option<char> { let cur = self.look; self.look = self.chars.next(); cur.map(|(_, c)| c) }
    fn consume(&mut self, c: char) -> bool { if self.peek() == Some(c) { self.next(); true } else { false } }
    fn eof(&self) -> bool { self.look.is_none() }

    fn expected(&self, c: char) -> DescriptorError {
        DescriptorError::Expected { expected: c, offset: self.offset(), descriptor: self.src.to_string() }
    }

    fn expect(&mut self, c: char) -> Result<(), DescriptorError> {
        if self.consume(c) { Ok(()) } else { Err(self.expected(c)) }
    }

    fn parse_field_type(&mut self) -> Result<TypeRef, DescriptorError> {
        let mut dims = 0usize;
        while self.consume('[') {
            dims += 1;
            if dims > DESCRIPTOR_MAX_ARRAY_DIMS {
                return Err(DescriptorError::TooManyDimensions(self.src.to_string()));
            }
        }
        let offset = self.offset();
        let mut ty = match self.next() {
            Some('L') => self.parse_class_name()?,
            Some('V') => return Err(DescriptorError::MisplacedVoid(self.src.to_string())),
            Some(c) => match PrimitiveType::from_descriptor_char(c) {
                Some(p) => TypeRef::Primitive(p),
                None => {
                    return Err(DescriptorError::InvalidTypeCode { code: c, offset, descriptor: self.src.to_string() })
                }
            },
            None => return Err(DescriptorError::UnterminatedClassName(self.src.to_string())),
        };
        for _ in 0..dims {
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_class_name(&mut self) -> Result<TypeRef, DescriptorError> {
        let mut name = String::new();
        loop {
            match self.next() {
                Some(';') => break,
                // JVMS internal names use '/' between packages; binary names use '.'
                Some('/') => name.push('.'),
                Some(c) if c == '.' || c == '[' || c == '(' || c == ')' || c.is_whitespace() => {
                    return Err(DescriptorError::UnterminatedClassName(self.src.to_string()))
                }
                Some(c) => name.push(c),
                None => return Err(DescriptorError::UnterminatedClassName(self.src.to_string())),
            }
        }
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..") {
            return Err(DescriptorError::EmptyClassName(self.src.to_string()));
        }
        Ok(TypeRef::Class(name))
    }
}
