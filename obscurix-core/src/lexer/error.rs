use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    MissingDigitAfterPeriod,
    MultipleFloatingPoints,
    NumberTooLarge,
    MissingStringEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unrecognized glyph", vec![format!("`{tok}` (U+{:04X}) is not part of the language", tok as u32)])
            },
            LexicalErrorType::MissingDigitAfterPeriod => {
                ("Missing digits after the decimal point", vec![])
            },
            LexicalErrorType::MultipleFloatingPoints => {
                ("Found several decimal points in a number", vec![])
            },
            LexicalErrorType::NumberTooLarge => {
                ("Number does not fit into a 64-bit integer", vec![])
            },
            LexicalErrorType::MissingStringEnd => {
                ("Unterminated string", vec!["Strings must be closed with `\"` on the same line".to_string()])
            }
        }
    }
}
