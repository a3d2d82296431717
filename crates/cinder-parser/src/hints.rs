// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use cinder_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on what was found.
pub fn for_expected(expected: &str, found: TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Statement terminator
        ("';'", TokenKind::Name | TokenKind::Integer | TokenKind::Char | TokenKind::String) => {
            Some("put each statement on its own line or separate them with ';'")
        }
        ("';'", TokenKind::Colon) => Some("bind a variable with 'name: type = value'"),
        ("';'", _) => Some("end statements with a newline or ';'"),

        // Sequences
        ("','", _) => Some("separate members with commas"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("')'" | "']'", TokenKind::Semi) => Some("a ';' cannot appear inside a list"),
        ("'}'", _) => Some("every '{' needs a matching '}'"),

        // Expressions
        ("an expression", TokenKind::Eq) => Some("put the value after '='"),
        ("an expression", TokenKind::Semi | TokenKind::Eof) => Some("statement is incomplete"),
        ("an expression", TokenKind::Def) => Some("'def' starts a statement, not a value"),
        ("an expression", TokenKind::If | TokenKind::Loop) => {
            Some("'if' and 'loop' are statements; wrap them in a block to use them as a value")
        }
        ("an expression", _) => Some("try a value, a name, or a parenthesized list"),

        // Types
        ("a type", TokenKind::Minus) => Some("types cannot be negated"),
        ("a type", _) => Some("try a type name like 'int', or a list type like '[int .. 4]'"),

        // Names
        ("a name", TokenKind::Integer) => Some("names can't start with a number"),
        ("a name", TokenKind::Def | TokenKind::If | TokenKind::Else | TokenKind::Loop) => {
            Some("keywords cannot be used as names")
        }
        ("a name", _) => Some("names start with a letter or '_'"),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_depend_on_found_token() {
        assert_eq!(for_expected("a name", TokenKind::Integer), Some("names can't start with a number"));
        assert_eq!(for_expected("')'", TokenKind::Eof), Some("add ')' to close the parenthesis"));
        assert_eq!(for_expected("')'", TokenKind::Name), None);
    }
}
