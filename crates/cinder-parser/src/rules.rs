// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pratt rule tables for the value and type grammars.
//!
//! Each grammar has a prefix table and an infix table indexed by
//! `TokenKind as usize`. The tables are built at compile time; a `None`
//! entry means the token cannot appear in that position.

use cinder_ast::token::TokenKind;
use cinder_ast::NodeKind;

/// Binding strength, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Assignment,
    Logic,
    Equality,
    Compare,
    Sum,
    Product,
    Power,
    Call,
    Primary,
}

impl Precedence {
    pub const fn next(self) -> Precedence {
        match self {
            Precedence::Assignment => Precedence::Logic,
            Precedence::Logic => Precedence::Equality,
            Precedence::Equality => Precedence::Compare,
            Precedence::Compare => Precedence::Sum,
            Precedence::Sum => Precedence::Product,
            Precedence::Product => Precedence::Power,
            Precedence::Power => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// What a prefix token starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixForm {
    /// Integer or char literal; the token value becomes the scalar.
    Literal(NodeKind),
    /// Name or string; the interned key becomes the scalar.
    Named(NodeKind),
    /// `(` or `[` sequence, possibly a function.
    Sequence,
    Block,
    Unary(NodeKind),
    /// `break`, `continue`
    Leaf(NodeKind),
    Return,
}

/// What an infix token does with the expression on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixForm {
    Binary(NodeKind),
    /// `(` arguments
    Call,
    /// `[` indices
    Index,
    /// `.` or `::` followed by an identifier.
    Member(NodeKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfixRule {
    pub precedence: Precedence,
    pub assoc: Assoc,
    pub form: InfixForm,
}

impl InfixRule {
    /// Minimum precedence for the right operand.
    pub const fn operand_precedence(&self) -> Precedence {
        match self.assoc {
            Assoc::Left => self.precedence.next(),
            Assoc::Right => self.precedence,
        }
    }
}

type PrefixTable = [Option<PrefixForm>; TokenKind::COUNT];
type InfixTable = [Option<InfixRule>; TokenKind::COUNT];

const fn left(precedence: Precedence, form: InfixForm) -> Option<InfixRule> {
    Some(InfixRule { precedence, assoc: Assoc::Left, form })
}

const fn right(precedence: Precedence, form: InfixForm) -> Option<InfixRule> {
    Some(InfixRule { precedence, assoc: Assoc::Right, form })
}

const fn value_prefix() -> PrefixTable {
    use PrefixForm::*;
    let mut t: PrefixTable = [None; TokenKind::COUNT];
    t[TokenKind::Integer as usize] = Some(Literal(NodeKind::Integer));
    t[TokenKind::Char as usize] = Some(Literal(NodeKind::Char));
    t[TokenKind::String as usize] = Some(Named(NodeKind::String));
    t[TokenKind::Name as usize] = Some(Named(NodeKind::Name));
    t[TokenKind::LParen as usize] = Some(Sequence);
    t[TokenKind::LBracket as usize] = Some(Sequence);
    t[TokenKind::LBrace as usize] = Some(Block);
    t[TokenKind::Minus as usize] = Some(Unary(NodeKind::Negate));
    t[TokenKind::Bang as usize] = Some(Unary(NodeKind::Not));
    t[TokenKind::Break as usize] = Some(Leaf(NodeKind::Break));
    t[TokenKind::Continue as usize] = Some(Leaf(NodeKind::Continue));
    t[TokenKind::Return as usize] = Some(Return);
    t
}

const fn value_infix() -> InfixTable {
    use InfixForm::*;
    use Precedence as P;
    let mut t: InfixTable = [None; TokenKind::COUNT];
    t[TokenKind::Eq as usize] = right(P::Assignment, Binary(NodeKind::Assign));
    t[TokenKind::PipePipe as usize] = left(P::Logic, Binary(NodeKind::Or));
    t[TokenKind::AmpAmp as usize] = left(P::Logic, Binary(NodeKind::And));
    t[TokenKind::EqEq as usize] = left(P::Equality, Binary(NodeKind::Equal));
    t[TokenKind::BangEq as usize] = left(P::Equality, Binary(NodeKind::NotEqual));
    t[TokenKind::Lt as usize] = left(P::Compare, Binary(NodeKind::Less));
    t[TokenKind::LtEq as usize] = left(P::Compare, Binary(NodeKind::LessEqual));
    t[TokenKind::Gt as usize] = left(P::Compare, Binary(NodeKind::Greater));
    t[TokenKind::GtEq as usize] = left(P::Compare, Binary(NodeKind::GreaterEqual));
    t[TokenKind::Plus as usize] = left(P::Sum, Binary(NodeKind::Add));
    t[TokenKind::Minus as usize] = left(P::Sum, Binary(NodeKind::Subtract));
    t[TokenKind::Star as usize] = left(P::Product, Binary(NodeKind::Multiply));
    t[TokenKind::Slash as usize] = left(P::Product, Binary(NodeKind::Divide));
    t[TokenKind::Percent as usize] = left(P::Product, Binary(NodeKind::Modulo));
    t[TokenKind::Caret as usize] = right(P::Power, Binary(NodeKind::Power));
    t[TokenKind::LParen as usize] = left(P::Call, Call);
    t[TokenKind::LBracket as usize] = left(P::Call, Index);
    t[TokenKind::Dot as usize] = left(P::Call, Member(NodeKind::Field));
    t[TokenKind::ColonColon as usize] = left(P::Call, Member(NodeKind::Path));
    t
}

const fn type_prefix() -> PrefixTable {
    use PrefixForm::*;
    let mut t: PrefixTable = [None; TokenKind::COUNT];
    t[TokenKind::Name as usize] = Some(Named(NodeKind::Name));
    t[TokenKind::Integer as usize] = Some(Literal(NodeKind::Integer));
    t[TokenKind::LParen as usize] = Some(Sequence);
    t[TokenKind::LBracket as usize] = Some(Sequence);
    t
}

const fn type_infix() -> InfixTable {
    use InfixForm::*;
    let mut t: InfixTable = [None; TokenKind::COUNT];
    t[TokenKind::Dot as usize] = left(Precedence::Call, Member(NodeKind::Field));
    t[TokenKind::ColonColon as usize] = left(Precedence::Call, Member(NodeKind::Path));
    t[TokenKind::LParen as usize] = left(Precedence::Call, Call);
    t
}

static VALUE_PREFIX: PrefixTable = value_prefix();
static VALUE_INFIX: InfixTable = value_infix();
static TYPE_PREFIX: PrefixTable = type_prefix();
static TYPE_INFIX: InfixTable = type_infix();

/// The two expression grammars sharing one token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Value,
    Type,
}

impl Grammar {
    pub fn prefix(self, kind: TokenKind) -> Option<PrefixForm> {
        match self {
            Grammar::Value => VALUE_PREFIX[kind as usize],
            Grammar::Type => TYPE_PREFIX[kind as usize],
        }
    }

    pub fn infix(self, kind: TokenKind) -> Option<InfixRule> {
        match self {
            Grammar::Value => VALUE_INFIX[kind as usize],
            Grammar::Type => TYPE_INFIX[kind as usize],
        }
    }

    /// Kind of the sequence node this grammar builds.
    pub fn sequence_kind(self) -> NodeKind {
        match self {
            Grammar::Value => NodeKind::List,
            Grammar::Type => NodeKind::TypeList,
        }
    }

    /// What the grammar parses, for "expected ..." messages.
    pub fn noun(self) -> &'static str {
        match self {
            Grammar::Value => "an expression",
            Grammar::Type => "a type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(Precedence::Assignment < Precedence::Logic);
        assert!(Precedence::Product < Precedence::Power);
        assert_eq!(Precedence::Primary.next(), Precedence::Primary);
    }

    #[test]
    fn power_and_assignment_are_right_associative() {
        let power = Grammar::Value.infix(TokenKind::Caret).unwrap();
        assert_eq!(power.operand_precedence(), Precedence::Power);
        let assign = Grammar::Value.infix(TokenKind::Eq).unwrap();
        assert_eq!(assign.operand_precedence(), Precedence::Assignment);
        let add = Grammar::Value.infix(TokenKind::Plus).unwrap();
        assert_eq!(add.operand_precedence(), Precedence::Product);
    }

    #[test]
    fn grammars_differ() {
        assert!(Grammar::Value.prefix(TokenKind::Minus).is_some());
        assert!(Grammar::Type.prefix(TokenKind::Minus).is_none());
        assert!(Grammar::Type.infix(TokenKind::Plus).is_none());
        assert!(Grammar::Value.prefix(TokenKind::Semi).is_none());
        assert!(Grammar::Value.infix(TokenKind::LBrace).is_none());
    }
}
