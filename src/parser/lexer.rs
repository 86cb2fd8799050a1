use logos::Logos;
use crate::ast::Location;

/// Token types for the annotation index format
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("class")]
    Class,
    #[token("annotation")]
    Annotation,
    #[token("annotation-field")]
    AnnotationField,
    #[token("method")]
    Method,
    #[token("field")]
    Field,
    #[token("return")]
    Return,
    #[token("parameter")]
    Parameter,
    #[token("type")]
    Type,
    #[token("enum")]
    Enum,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Separators
    #[token(":")]
    Colon,
    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("=")]
    Assign,
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    // Only meaningful inside method descriptors
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,

    // Literals
    #[regex(r#""([^"\\]|\\u[0-9a-fA-F]{4}|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\]|\\u[0-9a-fA-F]{4}|\\.)'")]
    CharLiteral,
    #[regex(r"-?0[xX][0-9a-fA-F]+[lL]?", priority = 3)]
    HexInteger,
    #[regex(r"-?[0-9]+[lL]?", priority = 3)]
    DecimalInteger,
    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?", priority = 3)]
    FloatLiteral,

    // Identifiers; `$` is legal and separates nested classes in binary names
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", priority = 3)]
    Identifier,
    // Reserved method names in descriptors
    #[regex(r"<(cl)?init>")]
    SpecialName,

    // Comments and whitespace
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r]+", priority = 2)]
    Whitespace,
    #[token("\u{FEFF}")]
    Bom,

    // Any other single character; reported by the parser as a malformed entry
    #[regex(r"[^ \t\n\r]", priority = 1)]
    Unknown,
}

impl Token {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self,
            Token::Package | Token::Class | Token::Annotation | Token::AnnotationField |
            Token::Method | Token::Field | Token::Return | Token::Parameter |
            Token::Type | Token::Enum | Token::True | Token::False
        )
    }

    /// Keywords that open a block the parser can resynchronize on
    pub fn is_block_start(&self) -> bool {
        matches!(self,
            Token::Package | Token::Class | Token::Annotation | Token::Method | Token::Field
        )
    }

    /// Tokens that spell a Java identifier. `annotation`, `method`, `field`,
    /// `parameter` and `type` are only keywords at block headers.
    pub fn is_name(&self) -> bool {
        matches!(self,
            Token::Identifier | Token::Annotation | Token::Method |
            Token::Field | Token::Parameter | Token::Type
        )
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self,
            Token::StringLiteral | Token::CharLiteral |
            Token::HexInteger | Token::DecimalInteger | Token::FloatLiteral |
            Token::True | Token::False
        )
    }

    /// Tokens that may appear inside a method descriptor
    pub fn is_descriptor_part(&self) -> bool {
        self.is_name() || matches!(self,
            Token::Semicolon | Token::Slash | Token::LBracket | Token::LParen | Token::RParen
        )
    }

    fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Bom | Token::LineComment | Token::BlockComment)
    }
}

/// Token plus the text it was lexed from
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn is(&self, token: &Token) -> bool {
        self.token == *token
    }

    /// Location just past the end of this token
    pub fn end(&self) -> Location {
        let mut end = self.location;
        end.advance_str(&self.lexeme);
        end
    }
}

/// Lexer for annotation index text
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    location: Location,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { lexer: Token::lexer(source), location: Location::start() }
    }

    /// Get the next token, trivia included
    pub fn next_token(&mut self) -> Option<LexicalToken> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = self.location;
        self.location.advance_str(&lexeme);
        // The catch-all Unknown token makes every character lexable
        let token = token.unwrap_or(Token::Unknown);
        Some(LexicalToken { token, lexeme, location })
    }

    /// Get all significant tokens from the source
    pub fn tokenize(mut self) -> Vec<LexicalToken> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            if !token.token.is_trivia() {
                tokens.push(token);
            }
        }
        tokens
    }
}
