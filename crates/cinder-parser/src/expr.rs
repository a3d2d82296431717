// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pratt parsing for the value and type grammars.

use cinder_ast::token::{TokenKind, TokenValue};
use cinder_ast::{NodeId, NodeKind};
use cinder_diagnostics::Code;

use crate::parser::Parser;
use crate::rules::{Grammar, InfixForm, InfixRule, Precedence, PrefixForm};
use crate::sequence::SequenceUse;

impl<'a> Parser<'a> {
    /// Parse an expression of `grammar` whose infix operators all bind at
    /// least as tightly as `min`.
    pub(crate) fn expression(&mut self, grammar: Grammar, min: Precedence) -> NodeId {
        let start = self.token.span.start;
        let mut left = self.prefix(grammar);

        while let Some(rule) = grammar.infix(self.kind()) {
            if rule.precedence < min {
                break;
            }
            left = self.infix(grammar, rule, start, left);
        }

        left
    }

    /// True if the current token can start an expression of `grammar`.
    pub(crate) fn starts_expression(&self, grammar: Grammar) -> bool {
        !self.token.implied && grammar.prefix(self.kind()).is_some()
    }

    fn prefix(&mut self, grammar: Grammar) -> NodeId {
        let token = self.token;
        let Some(form) = grammar.prefix(token.kind).filter(|_| !token.implied) else {
            return self.cannot_start(grammar);
        };

        match form {
            PrefixForm::Literal(kind) => {
                self.advance();
                let value = match token.value {
                    TokenValue::Int(value) => value,
                    _ => 0,
                };
                self.ast.scalar(kind, token.span, value)
            }
            PrefixForm::Named(kind) => {
                self.advance();
                match token.key() {
                    Some(key) => self.ast.named(kind, token.span, key),
                    None => NodeId::INVALID,
                }
            }
            PrefixForm::Sequence => self.sequence(grammar, SequenceUse::Literal),
            PrefixForm::Block => self.block(),
            PrefixForm::Unary(kind) => {
                self.advance();
                let operand = self.expression(grammar, Precedence::Power);
                let span = self.span_from(token.span.start);
                self.ast.unary(kind, span, operand)
            }
            PrefixForm::Leaf(kind) => {
                self.advance();
                self.ast.leaf(kind, token.span)
            }
            PrefixForm::Return => {
                self.advance();
                let value = if self.starts_expression(Grammar::Value) {
                    self.expression(Grammar::Value, Precedence::Assignment)
                } else {
                    NodeId::NONE
                };
                let span = self.span_from(token.span.start);
                self.ast.unary(NodeKind::Return, span, value)
            }
        }
    }

    fn infix(&mut self, grammar: Grammar, rule: InfixRule, start: u32, left: NodeId) -> NodeId {
        let (kind, right) = match rule.form {
            InfixForm::Binary(kind) => {
                self.advance();
                (kind, self.expression(grammar, rule.operand_precedence()))
            }
            InfixForm::Call => (NodeKind::Call, self.sequence(grammar, SequenceUse::Arguments)),
            InfixForm::Index => (NodeKind::Index, self.sequence(grammar, SequenceUse::Arguments)),
            InfixForm::Member(kind) => {
                self.advance();
                (kind, self.identifier())
            }
        };
        let span = self.span_from(start);
        self.ast.binary(kind, span, left, right)
    }

    /// Report a token with no prefix rule. The token is consumed unless it
    /// may close or end an enclosing construct.
    fn cannot_start(&mut self, grammar: Grammar) -> NodeId {
        self.expected(Code::TokenCannotStartExpression, grammar.noun());
        let enclosing = matches!(
            self.kind(),
            TokenKind::Eof
                | TokenKind::Semi
                | TokenKind::Comma
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Else
        );
        if !enclosing {
            self.advance();
        }
        NodeId::INVALID
    }
}
