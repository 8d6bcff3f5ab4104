use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedIdent,
    ExpectedFunctionName,
    UnexpectedEof,
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    MissingClosing {
        opening: Token,
        expected: Vec<String>,
    },
    DuplicateParameter {
        name: String,
    },
    NestedFunction,
    ReturnOutsideFunction,
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier", vec![]),
            ParseErrorType::ExpectedFunctionName => (
                "Expected function name",
                vec!["Function names are written as `§name`".to_string()]
            ),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = token.describe();

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::MissingClosing { opening, expected } => {
                let messages = vec![format!(
                    "The block opened by `{}` is never closed, expected {}",
                    opening.as_literal(),
                    expected.join(" or ")
                )];

                ("Unclosed block", messages)
            },
            ParseErrorType::DuplicateParameter { name } => (
                "Duplicate parameter",
                vec![format!("Parameter `{name}` is declared more than once")]
            ),
            ParseErrorType::NestedFunction => (
                "Functions can only be defined at the top level",
                vec![]
            ),
            ParseErrorType::ReturnOutsideFunction => (
                "`⎋` outside of a function",
                vec![]
            ),
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}
