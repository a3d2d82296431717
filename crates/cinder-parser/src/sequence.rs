// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parenthesized and bracketed sequences, their members, and functions.

use tracing::trace;

use cinder_ast::token::TokenKind;
use cinder_ast::{NodeId, NodeKind};
use cinder_diagnostics::Code;

use crate::parser::Parser;
use crate::rules::{Grammar, Precedence};

/// Where a sequence appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SequenceUse {
    /// A sequence literal: may start a function or unwrap to its member.
    Literal,
    /// Call arguments or indices: always a list.
    Arguments,
}

impl<'a> Parser<'a> {
    /// Parse `( members )` or `[ members ]` starting at the opening token.
    pub(crate) fn sequence(&mut self, grammar: Grammar, usage: SequenceUse) -> NodeId {
        let open = self.token;
        let close = open.kind.closer().unwrap_or(TokenKind::RParen);
        self.push_terminator(TokenKind::Newline);
        self.advance();

        let mut seq = self.ast.sequence();
        let mut bare = false;
        let mut trailing_comma = false;

        while !self.check(close) && !self.at_end() && !self.at_limit() {
            let (member, is_bare) = self.member(grammar);
            let member = if self.check(TokenKind::Comma) || self.check(close) || self.at_end() {
                member
            } else {
                self.expected(Code::SequenceMissingSeparator, "','");
                let skipped = self.skip_until(|t| {
                    matches!(
                        t.kind,
                        TokenKind::Comma
                            | TokenKind::RParen
                            | TokenKind::RBracket
                            | TokenKind::RBrace
                            | TokenKind::Semi
                    )
                });
                self.invalid(member, skipped)
            };
            bare = seq.is_empty() && is_bare && self.ast.kind(member) != NodeKind::Invalid;
            self.ast.push(&mut seq, member);

            trailing_comma = self.check(TokenKind::Comma);
            if !trailing_comma {
                break;
            }
            self.advance();
        }

        self.pop_terminator();
        if self.check(close) {
            self.advance();
        } else if !self.at_limit() {
            let code = if self.at_end() {
                Code::UnexpectedEndOfInput
            } else {
                Code::MissingClosingDelimiter
            };
            self.expected(code, close.display_name());
        }
        let span = self.span_from(open.span.start);

        if usage == SequenceUse::Literal {
            if self.check(TokenKind::Arrow) {
                let params = self.ast.finish(seq, grammar.sequence_kind(), span);
                return self.function(params, open.span.start);
            }
            if open.kind == TokenKind::LParen && seq.len() == 1 && bare && !trailing_comma {
                return self.ast.unwrap_single(seq);
            }
        }
        self.ast.finish(seq, grammar.sequence_kind(), span)
    }

    /// One sequence member. The flag is true for a bare expression, the
    /// only member form a parenthesized sequence unwraps to.
    fn member(&mut self, grammar: Grammar) -> (NodeId, bool) {
        let start = self.token.span.start;

        if self.check(TokenKind::Name) {
            match self.peek().kind {
                TokenKind::Colon => {
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
                    return (self.ast.many(NodeKind::Variable, span, &[name, ty, value]), false);
                }
                TokenKind::Eq => {
                    let name = self.identifier();
                    self.advance(); // '='
                    let value = self.expression(Grammar::Value, Precedence::Assignment);
                    let span = self.span_from(start);
                    let node = self.ast.many(NodeKind::Definition, span, &[name, NodeId::INFERRED, value]);
                    return (node, false);
                }
                _ => {}
            }
        }

        let value = self.expression(grammar, Precedence::Assignment);
        if self.check(TokenKind::DotDot) {
            self.advance();
            let count = self.expression(grammar, Precedence::Assignment);
            let span = self.span_from(start);
            return (self.ast.binary(NodeKind::Repeat, span, value, count), false);
        }
        (value, true)
    }

    /// `params -> rhs`, with the cursor on `->`.
    ///
    /// The right side is first read as a value. If a `{` follows, it was
    /// the result type of a function with a block body: the value is
    /// dropped and the right side is read again as a type.
    fn function(&mut self, params: NodeId, start: u32) -> NodeId {
        self.advance(); // '->'
        let snapshot = self.snapshot();
        let body = self.expression(Grammar::Value, Precedence::Assignment);

        if !self.check(TokenKind::LBrace) {
            let span = self.span_from(start);
            return self.ast.many(NodeKind::Function, span, &[params, NodeId::INFERRED, body]);
        }

        trace!("function result is a type, re-parsing");
        self.ast.free(body);
        self.rollback(snapshot);

        let result = self.expression(Grammar::Type, Precedence::Assignment);
        let body = if self.check(TokenKind::LBrace) {
            self.block()
        } else {
            self.expected(Code::TokenExpectMismatch, "'{'");
            NodeId::INVALID
        };
        let span = self.span_from(start);
        self.ast.many(NodeKind::Function, span, &[params, result, body])
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{parse_expr, parse_expr_with_errors, reachable};
    use crate::parse_source;

    #[test]
    fn single_paren_member_unwraps() {
        assert_eq!(parse_expr("(x)"), "(Name x)");
        assert_eq!(parse_expr("(x,)"), "(List (Name x))");
        assert_eq!(parse_expr("[x]"), "(List (Name x))");
        assert_eq!(parse_expr("()"), "(List)");
    }

    #[test]
    fn named_members_do_not_unwrap() {
        assert_eq!(parse_expr("(a = 1)"), "(List (Definition (Identifier a) Inferred (Integer 1)))");
        assert_eq!(
            parse_expr("(a = 1, b: int)"),
            "(List (Definition (Identifier a) Inferred (Integer 1)) (Variable (Identifier b) (Name int) None))"
        );
    }

    #[test]
    fn repeat_member() {
        assert_eq!(parse_expr("[0 .. 4]"), "(List (Repeat (Integer 0) (Integer 4)))");
    }

    #[test]
    fn newlines_inside_sequences_are_insignificant() {
        assert_eq!(parse_expr("(\n  1,\n  2\n)"), "(List (Integer 1) (Integer 2))");
    }

    #[test]
    fn missing_separator_recovers_at_comma() {
        let parsed = parse_source("test.cn", "(1 2, 3)");
        let errors: Vec<_> = parsed.reporter.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(errors, vec!["E0102"]);

        let list = parsed.statements()[0];
        let members = parsed.ast.children(list);
        assert_eq!(members.len(), 2);
        assert_eq!(parsed.sexpr(members[0]), "(Invalid (Integer 1))");
        assert_eq!(parsed.sexpr(members[1]), "(Integer 3)");
        // The invalid member covers the skipped `2`
        assert_eq!(parsed.ast.span(members[0]).length, 3);
    }

    #[test]
    fn unclosed_sequence_at_end_of_input() {
        let (tree, errors) = parse_expr_with_errors("(a, b");
        assert_eq!(tree, "(List (Name a) (Name b))");
        assert_eq!(errors, vec!["E0104"]);
    }

    #[test]
    fn function_with_inferred_result() {
        assert_eq!(
            parse_expr("(x) -> x + 1"),
            "(Function (List (Name x)) Inferred (Add (Name x) (Integer 1)))"
        );
    }

    #[test]
    fn function_with_result_type_and_block() {
        assert_eq!(
            parse_expr("(x: int) -> int { x }"),
            "(Function (List (Variable (Identifier x) (Name int) None)) (Name int) (Block (Name x)))"
        );
    }

    #[test]
    fn function_rollback_frees_tentative_nodes() {
        let parsed = parse_source("test.cn", "(a: int, b: int) -> pair(a, b) { a }");
        assert!(parsed.reporter.is_empty(), "{:?}", parsed.reporter.diagnostics());
        assert_eq!(parsed.ast.live_count(), reachable(&parsed.ast, parsed.root));
    }

    #[test]
    fn type_sequences_build_type_lists() {
        let parsed = parse_source("test.cn", "def p : [int .. 4] = q");
        let def = parsed.statements()[0];
        let ty = parsed.ast.children(def)[1];
        assert_eq!(parsed.sexpr(ty), "(TypeList (Repeat (Name int) (Integer 4)))");
    }
}
