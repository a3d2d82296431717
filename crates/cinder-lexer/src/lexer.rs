// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.
//!
//! Logos recognizes raw tokens; this module decodes literal values,
//! rewrites keywords and decides where implied terminators go. Each scan
//! starts a fresh logos lexer at the cursor, so the result of a scan
//! depends only on the cursor, the terminator passed in and the string
//! table. The parser relies on that to peek and to back up.

use logos::Logos;

use cinder_ast::token::{Token, TokenKind, TokenValue};
use cinder_ast::{SourceFile, Span, StringTable};

use crate::keywords::KeywordTable;

/// Raw token type for logos - values are decoded in a second pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")]
enum RawToken {
    // === Operators (longest match wins) ===
    #[token("->")]
    Arrow,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("::")]
    ColonColon,
    #[token("..")]
    DotDot,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

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
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*")]
    Integer,

    #[regex(r"'([^'\\\n]|\\[^\n])'")]
    Char,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    // Keywords are names until looked up in the keyword table
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Name,
}

impl RawToken {
    /// Kind of a punctuation token. Literals and newlines are decoded
    /// separately and map to `None`.
    fn punctuation(self) -> Option<TokenKind> {
        Some(match self {
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::DotDot => TokenKind::DotDot,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Dot => TokenKind::Dot,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Newline
            | RawToken::LineComment
            | RawToken::Integer
            | RawToken::Char
            | RawToken::String
            | RawToken::Name => return None,
        })
    }
}

/// Lexer position between two tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Byte offset into the file text.
    pub offset: u32,
    /// Kind of the last token returned, implied or not.
    pub prev: TokenKind,
}

impl Cursor {
    pub const START: Cursor = Cursor { offset: 0, prev: TokenKind::Newline };
}

/// The lexer for one Cinder source file.
pub struct Lexer<'a> {
    text: &'a str,
    /// Global offset of `text[0]`.
    base: u32,
    keywords: &'a KeywordTable,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, base: u32, keywords: &'a KeywordTable) -> Self {
        Self { text, base, keywords }
    }

    pub fn for_file(file: &'a SourceFile, keywords: &'a KeywordTable) -> Self {
        Self::new(&file.text, file.global_offset, keywords)
    }

    /// Global offset of the first byte of the text.
    pub fn start(&self) -> u32 {
        self.base
    }

    /// Global offset one past the last byte of the text.
    pub fn end(&self) -> u32 {
        self.base + self.text.len() as u32
    }

    /// Scan the token at `cursor`.
    ///
    /// `terminator` is the top of the parser's terminator stack. When it is
    /// a real terminator and the previous token can end a value, a newline,
    /// `}` or end of input yields an implied token of that kind instead.
    /// `Newline` or `None` disables insertion and newlines are skipped.
    pub fn scan(
        &self,
        cursor: Cursor,
        terminator: Option<TokenKind>,
        strings: &mut StringTable,
    ) -> (Token, Cursor) {
        let implied = terminator
            .filter(|&t| t != TokenKind::Newline && cursor.prev.ends_value());
        let mut pos = (cursor.offset as usize).min(self.text.len());

        loop {
            let mut raw = RawToken::lexer(&self.text[pos..]);
            let Some(result) = raw.next() else {
                let at = self.text.len() as u32;
                return match implied {
                    Some(kind) => (
                        Token::implied(kind, self.span(at, at)),
                        Cursor { offset: at, prev: kind },
                    ),
                    None => (
                        Token::new(TokenKind::Eof, self.span(at, at), TokenValue::None),
                        Cursor { offset: at, prev: TokenKind::Eof },
                    ),
                };
            };

            let range = raw.span();
            let start = pos + range.start;
            let end = pos + range.end;
            let slice = raw.slice();

            if let (Some(kind), Ok(RawToken::RBrace)) = (implied, result) {
                return (
                    Token::implied(kind, self.span(start as u32, start as u32)),
                    Cursor { offset: start as u32, prev: kind },
                );
            }

            let (kind, value) = match result {
                Ok(RawToken::Newline) => {
                    if let Some(kind) = implied {
                        return (
                            Token::implied(kind, self.span(start as u32, start as u32)),
                            Cursor { offset: end as u32, prev: kind },
                        );
                    }
                    pos = end;
                    continue;
                }
                Ok(RawToken::Integer) => (TokenKind::Integer, TokenValue::Int(decode_integer(slice))),
                Ok(RawToken::Char) => match decode_char(slice) {
                    Some(c) => (TokenKind::Char, TokenValue::Int(c as u64)),
                    None => return self.invalid(start),
                },
                Ok(RawToken::String) => match decode_string(slice) {
                    Some(s) => (TokenKind::String, TokenValue::Key(strings.intern(&s))),
                    None => return self.invalid(start),
                },
                Ok(RawToken::Name) => {
                    let key = strings.intern(slice);
                    match self.keywords.lookup(key) {
                        Some(keyword) => (keyword, TokenValue::None),
                        None => (TokenKind::Name, TokenValue::Key(key)),
                    }
                }
                Ok(other) => match other.punctuation() {
                    Some(kind) => (kind, TokenValue::None),
                    None => return self.invalid(start),
                },
                Err(()) => return self.invalid(start),
            };

            return (
                Token::new(kind, self.span(start as u32, end as u32), value),
                Cursor { offset: end as u32, prev: kind },
            );
        }
    }

    /// Scan the whole text with a fixed terminator, through `Eof`.
    pub fn tokenize(&self, terminator: Option<TokenKind>, strings: &mut StringTable) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = Cursor::START;
        loop {
            let (token, next) = self.scan(cursor, terminator, strings);
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                break;
            }
            cursor = next;
        }
        tracing::debug!(tokens = tokens.len(), "tokenized");
        tokens
    }

    /// A one-character `Invalid` token at local offset `start`.
    fn invalid(&self, start: usize) -> (Token, Cursor) {
        let width = self.text[start..].chars().next().map_or(1, char::len_utf8);
        let end = (start + width) as u32;
        (
            Token::new(TokenKind::Invalid, self.span(start as u32, end), TokenValue::None),
            Cursor { offset: end, prev: TokenKind::Invalid },
        )
    }

    fn span(&self, start: u32, end: u32) -> Span {
        Span::from_range(self.base + start, self.base + end)
    }
}

/// Decimal digits with `_` separators. Overflow wraps.
fn decode_integer(slice: &str) -> u64 {
    slice
        .bytes()
        .filter(|&b| b != b'_')
        .fold(0u64, |acc, b| acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0')))
}

fn decode_char(slice: &str) -> Option<char> {
    let inner = &slice[1..slice.len() - 1];
    let mut chars = inner.chars();
    let c = match chars.next()? {
        '\\' => decode_escape(chars.next()?)?,
        c => c,
    };
    chars.next().is_none().then_some(c)
}

fn decode_string(slice: &str) -> Option<String> {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(decode_escape(chars.next()?)?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn decode_escape(c: char) -> Option<char> {
    Some(match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        '\\' => '\\',
        '\'' => '\'',
        '"' => '"',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_with(source: &str, terminator: Option<TokenKind>) -> (Vec<Token>, StringTable) {
        let mut strings = StringTable::new();
        let keywords = KeywordTable::new(&mut strings);
        let tokens = Lexer::new(source, 0, &keywords).tokenize(terminator, &mut strings);
        (tokens, strings)
    }

    fn kinds(source: &str, terminator: Option<TokenKind>) -> Vec<TokenKind> {
        lex_with(source, terminator).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn operators_take_longest_match() {
        use TokenKind::*;
        assert_eq!(
            kinds("-> <= >= == != :: .. && || - < > = : .", None),
            vec![
                Arrow, LtEq, GtEq, EqEq, BangEq, ColonColon, DotDot, AmpAmp, PipePipe, Minus, Lt, Gt,
                Eq, Colon, Dot, Eof
            ]
        );
    }

    #[test]
    fn keywords_are_rewritten() {
        use TokenKind::*;
        let (tokens, strings) = lex_with("def defx if loop", None);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Def, Name, If, Loop, Eof]);
        assert_eq!(strings.lookup(tokens[1].key().unwrap()), "defx");
    }

    #[test]
    fn integers_skip_underscores() {
        let (tokens, _) = lex_with("1_000 42", None);
        assert_eq!(tokens[0].value, TokenValue::Int(1000));
        assert_eq!(tokens[0].span, Span::new(0, 5));
        assert_eq!(tokens[1].value, TokenValue::Int(42));
    }

    #[test]
    fn char_and_string_escapes() {
        let (tokens, strings) = lex_with(r#"'a' '\n' "tab\there \"q\"""#, None);
        assert_eq!(tokens[0].value, TokenValue::Int('a' as u64));
        assert_eq!(tokens[1].value, TokenValue::Int('\n' as u64));
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(strings.lookup(tokens[2].key().unwrap()), "tab\there \"q\"");
    }

    #[test]
    fn bad_input_is_one_char_invalid() {
        let (tokens, _) = lex_with("a $ b", None);
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[1].span, Span::new(2, 1));
        assert_eq!(tokens[2].kind, TokenKind::Name);

        let (tokens, _) = lex_with(r"'\q'", None);
        assert_eq!(tokens[0].kind, TokenKind::Invalid);
        assert_eq!(tokens[0].span.length, 1);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("a // note\r\n\tb", None), vec![Name, Name, Eof]);
    }

    #[test]
    fn eof_repeats_forever() {
        let mut strings = StringTable::new();
        let keywords = KeywordTable::new(&mut strings);
        let lexer = Lexer::new("x", 10, &keywords);
        let (_, cursor) = lexer.scan(Cursor::START, None, &mut strings);
        let (eof, cursor) = lexer.scan(cursor, None, &mut strings);
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span, Span::new(11, 0));
        let (again, _) = lexer.scan(cursor, None, &mut strings);
        assert_eq!(again.kind, TokenKind::Eof);
        assert_eq!(again.span, Span::new(11, 0));
    }

    #[test]
    fn newline_after_value_implies_terminator() {
        use TokenKind::*;
        let (tokens, _) = lex_with("a = 1\nb\n", Some(Semi));
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Name, Eq, Integer, Semi, Name, Semi, Eof]);
        assert!(tokens[3].implied);
        assert_eq!(tokens[3].span, Span::new(5, 0));
    }

    #[test]
    fn newline_after_operator_is_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("a +\nb", Some(Semi)), vec![Name, Plus, Name, Semi, Eof]);
    }

    #[test]
    fn closing_brace_is_not_consumed() {
        use TokenKind::*;
        let (tokens, _) = lex_with("{ x }", Some(Semi));
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![LBrace, Name, Semi, RBrace, Semi, Eof]);
        assert!(tokens[2].implied);
        assert_eq!(tokens[3].span, Span::new(4, 1));
    }

    #[test]
    fn explicit_terminator_suppresses_insertion() {
        use TokenKind::*;
        assert_eq!(kinds("x;\n", Some(Semi)), vec![Name, Semi, Eof]);
    }

    #[test]
    fn newline_terminator_never_synthesizes() {
        use TokenKind::*;
        assert_eq!(kinds("(a\n,b\n)", Some(Newline)), vec![LParen, Name, Comma, Name, RParen, Eof]);
    }

    #[test]
    fn keyword_statements_end_values() {
        use TokenKind::*;
        assert_eq!(kinds("break\nreturn\n", Some(Semi)), vec![Break, Semi, Return, Semi, Eof]);
        assert_eq!(kinds("if\nx", Some(Semi)), vec![If, Name, Semi, Eof]);
    }

    #[test]
    fn spans_are_global() {
        let mut strings = StringTable::new();
        let keywords = KeywordTable::new(&mut strings);
        let tokens = Lexer::new("ab cd", 100, &keywords).tokenize(None, &mut strings);
        assert_eq!(tokens[1].span, Span::new(103, 2));
    }
}
