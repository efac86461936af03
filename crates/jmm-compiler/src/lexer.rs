//! Lexer for J-- source text.
//!
//! Produces span-based tokens; text is sliced from source only when needed.
//! Trivia (whitespace, newlines, comments) is consumed here and never reaches
//! the parser; each surviving token carries the 1-based line it starts on.

use logos::Logos;

/// All token kinds. Keywords are defined before `Ident` so they take
/// precedence; multi-character operators before their single-character
/// prefixes. `Eof` is a parser-side sentinel and is never produced by Logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("boolean")]
    KwBoolean,

    #[token("int")]
    KwInt,

    #[token("void")]
    KwVoid,

    #[token("if")]
    KwIf,

    #[token("else")]
    KwElse,

    #[token("while")]
    KwWhile,

    #[token("break")]
    KwBreak,

    #[token("return")]
    KwReturn,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    Le,

    #[token(">=")]
    Ge,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("!")]
    Bang,

    #[token("=")]
    Eq,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[regex(r"[a-zA-Z][a-zA-Z0-9]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    /// Double-quoted string literal, quotes included. Passed through to the
    /// assembler verbatim.
    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    BlockComment,

    /// End-of-input sentinel used by the parser.
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// Token: kind + byte span + the 1-based line the token starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: u32,
    pub end: u32,
    pub line: u32,
}

/// First unrecognized character in the input. Lexical errors are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: u32,
    pub text: String,
}

/// Tokenizes source into a vector of tokens with trivia removed.
///
/// Line numbers are assigned by counting newlines as the lexer advances, so
/// multi-line block comments keep the count accurate.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut line: u32 = 1;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = &source[span.clone()];
        match result {
            Ok(kind) => {
                if !kind.is_trivia() {
                    tokens.push(Token {
                        kind,
                        start: span.start as u32,
                        end: span.end as u32,
                        line,
                    });
                }
                line += text.matches('\n').count() as u32;
            }
            Err(()) => {
                return Err(LexError {
                    line,
                    text: text.to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[token.start as usize..token.end as usize]
}
