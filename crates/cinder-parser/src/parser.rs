// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser: token navigation, statements, blocks and recovery.
//!
//! Expressions live in `expr.rs` and sequences in `sequence.rs`; all three
//! extend the same [`Parser`].

use tracing::{debug, trace, warn};

use cinder_ast::token::{Token, TokenKind};
use cinder_ast::{Ast, NodeId, NodeKind, Span, StringTable};
use cinder_diagnostics::{Checkpoint, Code, Reporter};
use cinder_lexer::{Cursor, Lexer};

use crate::rules::{Grammar, Precedence};

/// Parser limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Errors recorded before the module parse stops.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_errors: 20 }
    }
}

/// Everything needed to resume parsing from an earlier token.
pub(crate) struct Snapshot {
    before: Cursor,
    token: Token,
    after: Cursor,
    prev_end: u32,
    terminators: usize,
    checkpoint: Checkpoint,
    errors: usize,
    last_error: Option<u32>,
}

/// The parser for one Cinder source file.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    pub(crate) ast: &'a mut Ast,
    pub(crate) strings: &'a mut StringTable,
    reporter: &'a mut Reporter,
    options: ParseOptions,
    /// Cursor the current token was scanned from.
    before: Cursor,
    pub(crate) token: Token,
    /// Cursor just past the current token.
    after: Cursor,
    /// End of the last consumed token.
    pub(crate) prev_end: u32,
    /// Pending statement terminators; the top is passed to every scan.
    terminators: Vec<TokenKind>,
    errors: usize,
    /// Start of the last reported error, to avoid piling errors on one spot.
    last_error: Option<u32>,
}

impl<'a> Parser<'a> {
    pub fn new(
        lexer: Lexer<'a>,
        ast: &'a mut Ast,
        strings: &'a mut StringTable,
        reporter: &'a mut Reporter,
        options: ParseOptions,
    ) -> Self {
        let terminators = vec![TokenKind::Semi];
        let (token, after) = lexer.scan(Cursor::START, Some(TokenKind::Semi), strings);
        let prev_end = token.span.start;
        Self {
            lexer,
            ast,
            strings,
            reporter,
            options,
            before: Cursor::START,
            token,
            after,
            prev_end,
            terminators,
            errors: 0,
            last_error: None,
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    pub(crate) fn kind(&self) -> TokenKind {
        self.token.kind
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token and return it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.token;
        self.prev_end = self.prev_end.max(token.span.end());
        let (next, after) = self.lexer.scan(self.after, self.terminator(), self.strings);
        self.before = self.after;
        self.token = next;
        self.after = after;
        token
    }

    /// The token after the current one, without consuming anything.
    pub(crate) fn peek(&mut self) -> Token {
        self.lexer.scan(self.after, self.terminator(), self.strings).0
    }

    pub(crate) fn terminator(&self) -> Option<TokenKind> {
        self.terminators.last().copied()
    }

    /// Push a terminator. Applies from the next scan on, so push before
    /// consuming the opening token.
    pub(crate) fn push_terminator(&mut self, kind: TokenKind) {
        self.terminators.push(kind);
    }

    /// Pop a terminator. Pop before consuming the closing token.
    pub(crate) fn pop_terminator(&mut self) {
        self.terminators.pop();
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: u32) -> Span {
        Span::from_range(start, self.prev_end.max(start))
    }

    // =========================================================================
    // Speculation
    // =========================================================================

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            before: self.before,
            token: self.token,
            after: self.after,
            prev_end: self.prev_end,
            terminators: self.terminators.len(),
            checkpoint: self.reporter.checkpoint(),
            errors: self.errors,
            last_error: self.last_error,
        }
    }

    /// Return to `snapshot`, dropping diagnostics reported since. Nodes
    /// built since must be freed by the caller.
    pub(crate) fn rollback(&mut self, snapshot: Snapshot) {
        self.before = snapshot.before;
        self.token = snapshot.token;
        self.after = snapshot.after;
        self.prev_end = snapshot.prev_end;
        self.terminators.truncate(snapshot.terminators);
        self.reporter.rollback(snapshot.checkpoint);
        self.errors = snapshot.errors;
        self.last_error = snapshot.last_error;
    }

    // =========================================================================
    // Errors
    // =========================================================================

    pub(crate) fn at_limit(&self) -> bool {
        self.errors >= self.options.max_errors
    }

    /// Record an error unless the limit is reached or another error was
    /// already reported at the same position.
    pub(crate) fn error(&mut self, code: Code, span: Span, message: String, hint: Option<&str>) {
        if self.at_limit() || self.last_error == Some(span.start) {
            return;
        }
        self.errors += 1;
        self.last_error = Some(span.start);
        let diagnostic = self.reporter.report(code, span, message);
        diagnostic.help = hint.map(String::from);
    }

    pub(crate) fn warning(&mut self, code: Code, span: Span, message: String) {
        self.reporter.report(code, span, message);
    }

    /// Report that `expected` was wanted where the current token stands.
    pub(crate) fn expected(&mut self, code: Code, expected: &str) {
        let found = self.describe_current();
        let hint = crate::hints::for_expected(expected, self.token.kind);
        self.error(code, self.token.span, format!("expected {}, found {}", expected, found), hint);
    }

    fn describe_current(&self) -> &'static str {
        if self.token.implied {
            "end of line"
        } else {
            self.token.kind.display_name()
        }
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    /// Skip tokens until `stop` holds at bracket depth zero or input ends.
    /// Returns the span of the skipped tokens, if any.
    pub(crate) fn skip_until(&mut self, stop: impl Fn(&Token) -> bool) -> Option<Span> {
        let mut skipped: Option<Span> = None;
        let mut depth = 0usize;
        while !self.at_end() {
            if depth == 0 && stop(&self.token) {
                break;
            }
            match self.kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            let token = self.advance();
            skipped = Some(skipped.map_or(token.span, |s| s.merge(token.span)));
        }
        if let Some(span) = skipped {
            trace!(start = span.start, length = span.length, "skipped tokens");
        }
        skipped
    }

    /// Wrap a partial node and the skipped source into an `Invalid` node.
    pub(crate) fn invalid(&mut self, partial: NodeId, skipped: Option<Span>) -> NodeId {
        let base = skipped.unwrap_or_else(|| {
            if partial.is_marker() {
                Span::new(self.prev_end, 0)
            } else {
                self.ast.span(partial)
            }
        });
        let span = self.ast.cover(base, &[partial]);
        self.ast.many(NodeKind::Invalid, span, &[partial])
    }

    // =========================================================================
    // Module and Blocks
    // =========================================================================

    /// Parse the whole file into a `Module` node.
    pub fn parse_module(&mut self) -> NodeId {
        debug!("parsing module");
        let mut seq = self.ast.sequence();

        while !self.at_end() {
            if self.at_limit() {
                warn!(limit = self.options.max_errors, "too many errors, stopping");
                self.warning(
                    Code::TooManyErrors,
                    self.token.span,
                    format!("stopped after {} errors", self.options.max_errors),
                );
                break;
            }
            if self.check(TokenKind::RBrace) {
                self.expected(Code::TokenCannotStartExpression, "a statement");
                self.advance();
                continue;
            }
            let before = self.before;
            if let Some(stmt) = self.statement() {
                self.ast.push(&mut seq, stmt);
            }
            if self.before == before && !self.at_end() {
                self.advance();
            }
        }

        let span = Span::from_range(self.lexer.start(), self.lexer.end());
        let module = self.ast.finish(seq, NodeKind::Module, span);
        debug!(
            statements = self.ast.children(module).len(),
            errors = self.errors,
            nodes = self.ast.live_count(),
            "parsed module"
        );
        module
    }

    /// `{ statement* }`
    pub(crate) fn block(&mut self) -> NodeId {
        let start = self.token.span.start;
        self.push_terminator(TokenKind::Semi);
        self.advance();

        let mut seq = self.ast.sequence();
        while !self.check(TokenKind::RBrace) && !self.at_end() && !self.at_limit() {
            let before = self.before;
            if let Some(stmt) = self.statement() {
                self.ast.push(&mut seq, stmt);
            }
            if self.before == before && !self.check(TokenKind::RBrace) && !self.at_end() {
                self.advance();
            }
        }

        self.pop_terminator();
        if self.check(TokenKind::RBrace) {
            self.advance();
        } else if self.at_end() {
            self.expected(Code::UnexpectedEndOfInput, "'}'");
        }
        let span = self.span_from(start);
        self.ast.finish(seq, NodeKind::Block, span)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse one statement. Returns `None` for empty statements and for
    /// statements that were reported and discarded.
    pub(crate) fn statement(&mut self) -> Option<NodeId> {
        if self.check(TokenKind::Name) && self.peek().kind == TokenKind::Colon {
            let stmt = self.variable();
            return Some(self.end_statement(stmt));
        }
        match self.kind() {
            TokenKind::Semi => {
                let semi = self.advance();
                if !semi.implied {
                    self.warning(
                        Code::RedundantEmptyStatement,
                        semi.span,
                        "empty statement".to_string(),
                    );
                }
                None
            }
            TokenKind::If | TokenKind::Loop | TokenKind::LBrace => {
                let stmt = match self.kind() {
                    TokenKind::If => self.if_statement(),
                    TokenKind::Loop => self.loop_statement(),
                    _ => self.block(),
                };
                if self.check(TokenKind::Semi) {
                    let semi = self.advance();
                    if !semi.implied {
                        self.warning(
                            Code::RedundantEmptyStatement,
                            semi.span,
                            "redundant ';' after a block statement".to_string(),
                        );
                    }
                }
                Some(stmt)
            }
            TokenKind::Else => {
                let span = self.advance().span;
                self.error(
                    Code::UnboundElse,
                    span,
                    "'else' without a matching 'if'".to_string(),
                    Some("'else' must directly follow the body of an 'if'"),
                );
                let dangling = self.branch();
                self.ast.free(dangling);
                None
            }
            TokenKind::Def => {
                let stmt = self.definition();
                Some(self.end_statement(stmt))
            }
            _ => {
                let stmt = self.expression(Grammar::Value, Precedence::Assignment);
                Some(self.end_statement(stmt))
            }
        }
    }

    /// Expect the active terminator after `stmt`. `}`, `else` and end of
    /// input also end a statement but are left for the caller.
    fn end_statement(&mut self, stmt: NodeId) -> NodeId {
        let terminator = self.terminator().unwrap_or(TokenKind::Semi);
        match self.kind() {
            kind if kind == terminator => {
                self.advance();
                stmt
            }
            TokenKind::RBrace | TokenKind::Else | TokenKind::Eof => stmt,
            _ => {
                self.expected(Code::TokenExpectMismatch, terminator.display_name());
                let skipped = self.skip_until(|t| {
                    t.kind == terminator || t.kind == TokenKind::RBrace
                });
                let wrapped = self.invalid(stmt, skipped);
                if self.check(terminator) {
                    self.advance();
                }
                wrapped
            }
        }
    }

    fn ends_statement(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Else | TokenKind::Eof
        )
    }

    /// Body of `if`, `else` or `loop`. An implied `;` before a `{` on the
    /// next line is skipped.
    fn branch(&mut self) -> NodeId {
        if self.check(TokenKind::RBrace) || self.at_end() {
            self.expected(Code::TokenCannotStartExpression, "a statement");
            return NodeId::INVALID;
        }
        if self.check(TokenKind::Semi) {
            if self.token.implied && self.peek().kind == TokenKind::LBrace {
                self.advance();
            } else {
                self.expected(Code::TokenExpectMismatch, "a statement body");
                self.advance();
                return NodeId::INVALID;
            }
        }
        self.statement().unwrap_or(NodeId::NONE)
    }

    /// `if cond stmt (else stmt)?`
    fn if_statement(&mut self) -> NodeId {
        let start = self.advance().span.start;
        let condition = self.expression(Grammar::Value, Precedence::Assignment);
        let body = self.branch();

        if self.check(TokenKind::Semi) && self.token.implied && self.peek().kind == TokenKind::Else {
            self.advance();
        }
        let otherwise = if self.check(TokenKind::Else) {
            self.advance();
            self.branch()
        } else {
            NodeId::NONE
        };

        let span = self.span_from(start);
        self.ast.many(NodeKind::If, span, &[condition, body, otherwise])
    }

    /// `loop stmt`
    fn loop_statement(&mut self) -> NodeId {
        let start = self.advance().span.start;
        let body = self.branch();
        let span = self.span_from(start);
        self.ast.unary(NodeKind::Loop, span, body)
    }

    /// `def name (: type)? (= value)?`
    fn definition(&mut self) -> NodeId {
        let start = self.advance().span.start;
        let name = self.identifier();

        let explicit_type = self.check(TokenKind::Colon);
        let ty = if explicit_type {
            self.advance();
            if self.ends_statement() {
                NodeId::INFERRED
            } else {
                self.optional_type()
            }
        } else {
            NodeId::INFERRED
        };
        let value = if self.check(TokenKind::Eq) {
            self.advance();
            self.expression(Grammar::Value, Precedence::Assignment)
        } else {
            NodeId::NONE
        };

        if ty == NodeId::INFERRED && value == NodeId::NONE {
            let span = self.span_from(start);
            self.error(
                Code::DefinitionMissingType,
                span,
                "definition has neither a type nor a value".to_string(),
                Some("add a type with ': type' or a value with '= value'"),
            );
        }

        let span = self.span_from(start);
        self.ast.many(NodeKind::Definition, span, &[name, ty, value])
    }

    /// `name : type? (= value)?` in statement position.
    fn variable(&mut self) -> NodeId {
        let start = self.token.span.start;
        let name = self.identifier();
        self.advance(); // ':'
        let ty = self.optional_type();
        let value = if self.check(TokenKind::Eq) {
            self.advance();
            self.expression(Grammar::Value, Precedence::Assignment)
        } else {
            NodeId::NONE
        };
        let span = self.span_from(start);
        self.ast.many(NodeKind::Variable, span, &[name, ty, value])
    }

    /// The type after a `:`; a directly following `=` leaves it inferred.
    pub(crate) fn optional_type(&mut self) -> NodeId {
        if self.check(TokenKind::Eq) {
            NodeId::INFERRED
        } else {
            self.expression(Grammar::Type, Precedence::Assignment)
        }
    }

    /// A declared or selected name.
    pub(crate) fn identifier(&mut self) -> NodeId {
        match self.token.key() {
            Some(key) if self.check(TokenKind::Name) => {
                let span = self.advance().span;
                self.ast.named(NodeKind::Identifier, span, key)
            }
            _ => {
                self.expected(Code::TokenExpectMismatch, "a name");
                NodeId::INVALID
            }
        }
    }
}
