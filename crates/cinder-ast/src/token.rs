// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::intern::Key;
use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub value: TokenValue,
    /// Synthesized by terminator insertion rather than read from the source.
    pub implied: bool,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span, value: TokenValue) -> Self {
        Self { kind, span, value, implied: false }
    }

    /// An implied terminator of `kind` at `span`.
    pub const fn implied(kind: TokenKind, span: Span) -> Self {
        Self { kind, span, value: TokenValue::None, implied: true }
    }

    pub fn key(&self) -> Option<Key> {
        match self.value {
            TokenValue::Key(key) => Some(key),
            _ => None,
        }
    }
}

/// Literal payload carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue {
    None,
    /// Interned text of a name or string literal.
    Key(Key),
    /// Integer value, or the code point of a char literal.
    Int(u64),
}

/// The kind of token.
///
/// Fieldless so that the parser can index its rule tables by
/// `kind as usize`. `Invalid` must stay last (see [`TokenKind::COUNT`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Literals
    Name,
    Integer,
    Char,
    String,

    // Keywords
    Def,
    If,
    Else,
    Loop,
    Break,
    Continue,
    Return,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Bang,
    Eq,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Arrow,      // ->
    Dot,
    DotDot,     // ..
    ColonColon, // ::

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Semi,
    Comma,

    // Special
    Newline,
    Eof,
    Invalid,
}

impl TokenKind {
    /// Number of token kinds; size of the parser's rule tables.
    pub const COUNT: usize = TokenKind::Invalid as usize + 1;

    /// True if a token of this kind can end a value, so that a following
    /// newline, `}` or end of input implies a terminator.
    pub const fn ends_value(self) -> bool {
        matches!(
            self,
            TokenKind::Name
                | TokenKind::Integer
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Return
        )
    }

    pub const fn is_closing(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }

    /// The closing delimiter matching an opening one.
    pub const fn closer(self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            // Literals
            TokenKind::Name => "a name",
            TokenKind::Integer => "a number",
            TokenKind::Char => "a character",
            TokenKind::String => "a string",

            // Keywords
            TokenKind::Def => "'def'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Loop => "'loop'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Return => "'return'",

            // Operators
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Caret => "'^'",
            TokenKind::Bang => "'!'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::PipePipe => "'||'",
            TokenKind::Arrow => "'->'",
            TokenKind::Dot => "'.'",
            TokenKind::DotDot => "'..'",
            TokenKind::ColonColon => "'::'",

            // Delimiters
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",

            // Special
            TokenKind::Newline => "end of line",
            TokenKind::Eof => "end of file",
            TokenKind::Invalid => "an invalid character",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_covers_every_kind() {
        assert_eq!(TokenKind::COUNT, TokenKind::Invalid as usize + 1);
        assert!((TokenKind::Eof as usize) < TokenKind::COUNT);
    }

    #[test]
    fn value_enders() {
        assert!(TokenKind::Name.ends_value());
        assert!(TokenKind::RBrace.ends_value());
        assert!(!TokenKind::Plus.ends_value());
        assert!(!TokenKind::LBrace.ends_value());
        assert!(!TokenKind::Semi.ends_value());
    }
}
