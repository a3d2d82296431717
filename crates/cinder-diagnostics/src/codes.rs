// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Diagnostic code registry.
//!
//! Every diagnostic the front end can emit has a fixed code, a title and a
//! severity. Used by `cinder explain <code>` and for error display.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Severity;

/// Category for grouping codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Syntax,
    Resolution,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Syntax => write!(f, "Syntax"),
            Category::Resolution => write!(f, "Resolution"),
        }
    }
}

/// A diagnostic code like `E0100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Code {
    TokenExpectMismatch,
    TokenCannotStartExpression,
    SequenceMissingSeparator,
    MissingClosingDelimiter,
    UnexpectedEndOfInput,
    DefinitionMissingType,
    UnboundElse,
    InvalidCharacter,
    UnresolvedName,
    RedundantEmptyStatement,
    TooManyErrors,
}

impl Code {
    pub const ALL: [Code; 11] = [
        Code::TokenExpectMismatch,
        Code::TokenCannotStartExpression,
        Code::SequenceMissingSeparator,
        Code::MissingClosingDelimiter,
        Code::UnexpectedEndOfInput,
        Code::DefinitionMissingType,
        Code::UnboundElse,
        Code::InvalidCharacter,
        Code::UnresolvedName,
        Code::RedundantEmptyStatement,
        Code::TooManyErrors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Code::TokenExpectMismatch => "E0100",
            Code::TokenCannotStartExpression => "E0101",
            Code::SequenceMissingSeparator => "E0102",
            Code::MissingClosingDelimiter => "E0103",
            Code::UnexpectedEndOfInput => "E0104",
            Code::DefinitionMissingType => "E0105",
            Code::UnboundElse => "E0106",
            Code::InvalidCharacter => "E0107",
            Code::UnresolvedName => "E0200",
            Code::RedundantEmptyStatement => "W0100",
            Code::TooManyErrors => "W0101",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Code::TokenExpectMismatch => "unexpected token",
            Code::TokenCannotStartExpression => "token cannot start an expression",
            Code::SequenceMissingSeparator => "missing separator in sequence",
            Code::MissingClosingDelimiter => "missing closing delimiter",
            Code::UnexpectedEndOfInput => "unexpected end of input",
            Code::DefinitionMissingType => "definition needs a type or a value",
            Code::UnboundElse => "`else` without a matching `if`",
            Code::InvalidCharacter => "unrecognized character",
            Code::UnresolvedName => "cannot find name in scope",
            Code::RedundantEmptyStatement => "redundant empty statement",
            Code::TooManyErrors => "too many errors",
        }
    }

    /// Longer explanation shown by `cinder explain`.
    pub fn explanation(self) -> &'static str {
        match self {
            Code::TokenExpectMismatch => {
                "The parser expected a specific token, such as a statement terminator or a \
                 closing delimiter, and found something else. Tokens up to the next statement \
                 boundary are skipped."
            }
            Code::TokenCannotStartExpression => {
                "An expression was expected, but the token found here can only appear between \
                 or after operands, e.g. a stray operator or closing delimiter."
            }
            Code::SequenceMissingSeparator => {
                "Members of a parenthesized or bracketed sequence must be separated by commas: \
                 `(a, b)` rather than `(a b)`."
            }
            Code::MissingClosingDelimiter => {
                "A sequence or block was opened but its closing delimiter never appeared."
            }
            Code::UnexpectedEndOfInput => {
                "The file ended while a construct was still open."
            }
            Code::DefinitionMissingType => {
                "A `def` must give a type, a value, or both: `def x: int`, `def x = 1` or \
                 `def x: int = 1`. Write `def x : = value` to ask for inference explicitly."
            }
            Code::UnboundElse => {
                "An `else` branch must directly follow the body of an `if`."
            }
            Code::InvalidCharacter => {
                "The lexer found a character that starts no token, such as `$`, or a malformed \
                 character literal. It becomes a one-character invalid token."
            }
            Code::UnresolvedName => {
                "The name is not declared in this scope or any enclosing scope."
            }
            Code::RedundantEmptyStatement => {
                "`if`, `loop` and block statements end at their closing brace, so a `;` after \
                 them is an empty statement."
            }
            Code::TooManyErrors => {
                "Parsing stopped after reaching the error limit. Fix the reported errors and \
                 run again."
            }
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Code::RedundantEmptyStatement | Code::TooManyErrors => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Code::UnresolvedName => Category::Resolution,
            _ => Category::Syntax,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagnostic code `{0}`")]
pub struct UnknownCode(pub String);

impl FromStr for Code {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Code::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| UnknownCode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut seen: Vec<&str> = Code::ALL.iter().map(|c| c.as_str()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), Code::ALL.len());
    }

    #[test]
    fn warnings_use_w_prefix() {
        for code in Code::ALL {
            let is_warning = code.severity() == Severity::Warning;
            assert_eq!(code.as_str().starts_with('W'), is_warning, "{}", code);
        }
    }

    #[test]
    fn parse_code() {
        assert_eq!("e0102".parse::<Code>(), Ok(Code::SequenceMissingSeparator));
        assert_eq!("W0101".parse::<Code>(), Ok(Code::TooManyErrors));
        assert_eq!("E0107".parse::<Code>(), Ok(Code::InvalidCharacter));
        assert!("E9999".parse::<Code>().is_err());
    }
}
