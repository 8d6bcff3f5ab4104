use log::debug;

use crate::{lexer::prelude::{LexResult, LexicalError, Lexer, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Parsed, Program, Expression, Module, Statement};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,
    pub lex_errors: Vec<LexicalError>,
    /// Set while the body of a function definition is parsed.
    pub in_function: bool,

    last_end: u32,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],
            lex_errors: vec![],
            in_function: false,

            last_end: 0,
            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        loop {
            match self.tokens.next() {
                Some(Ok((start, Token::Comment, end))) => {
                    self.comments.push(SrcSpan { start, end })
                },
                Some(Err(err)) => {
                    self.lex_errors.push(err);

                    break;
                },
                Some(Ok(tok)) => {
                    next = Some(tok);

                    break;
                },
                None => {
                    break;
                }
            }
        }

        if let Some((_, _, end)) = &t {
            self.last_end = *end;
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn skip_newline(&mut self) {
        while let Some((_, Token::Newline, _)) = self.current_token {
            self.step();
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        match &self.current_token {
            Some((_, token, _)) => Precedence::from(token),
            None => Precedence::Lowest
        }
    }

    pub fn current_is(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, tok, _)) if tok == token)
    }

    pub fn next_is(&self, token: &Token) -> bool {
        matches!(&self.next_token, Some((_, tok, _)) if tok == token)
    }

    /// True at `Eof` or once the token stream has dried up.
    pub fn at_end(&self) -> bool {
        matches!(self.current_token, None | Some((_, Token::Eof, _)))
    }

    /// An atom that belongs to a parameter or argument list: a literal or an
    /// identifier that does not start the next assignment.
    pub fn current_is_list_atom(&self) -> bool {
        match &self.current_token {
            Some((_, Token::Ident(_), _)) => !self.next_is(&Token::Assign),
            Some((_, token, _)) => token.is_atom(),
            None => false
        }
    }

    pub fn eof_span(&self) -> SrcSpan {
        match &self.current_token {
            Some((start, _, end)) => SrcSpan { start: *start, end: *end },
            None => SrcSpan { start: self.last_end, end: self.last_end }
        }
    }

    pub fn parse(&mut self) -> Result<Parsed, ParseError> {
        let program = Program::parse(self, None);

        if let Some(error) = self.lex_errors.first() {
            let location = error.location;

            return parse_error(
                ParseErrorType::LexError {
                    error: *error
                },
                SrcSpan { start: location.start, end: location.end }
            );
        }

        let program = program?;

        debug!(
            target: "obscurix::parser",
            "parsed {} top-level statements, {} comments",
            program.statements.len(),
            self.comments.len()
        );

        let module = Module { program };

        Ok(Parsed {
            module,
            comments: std::mem::take(&mut self.comments)
        })
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                let (start, tok, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: tok,
                        expected: vec![format!("`{}`", token.as_literal())],
                    },
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                self.eof_span()
            )
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, _, end) = t.clone();
                self.current_token = Some(t);

                parse_error(
                    ParseErrorType::ExpectedIdent,
                    SrcSpan { start, end }
                )
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                self.eof_span()
            )
        }
    }

    /// Parses statements until one of `terminators` is the current token.
    /// The terminator itself is left in place for the caller.
    pub fn parse_block(
        &mut self,
        opening: (Token, SrcSpan),
        terminators: &[Token]
    ) -> Result<Vec<Statement>, ParseError> {
        let mut statements = vec![];

        loop {
            self.skip_newline();

            let at_terminator = matches!(
                &self.current_token,
                Some((_, token, _)) if terminators.contains(token)
            );

            if at_terminator {
                break;
            }

            if self.at_end() {
                let (token, span) = opening;

                return parse_error(
                    ParseErrorType::MissingClosing {
                        opening: token,
                        expected: terminators.iter()
                            .map(|token| format!("`{}`", token.as_literal()))
                            .collect()
                    },
                    span
                )
            }

            statements.push(Statement::parse(self, None)?);
        }

        Ok(statements)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Compare,
    Sum,
}

pub fn parse_module(src: &str) -> Result<Parsed, ParseError> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);
    let parsed = parser.parse()?;

    Ok(parsed)
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Parsed, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);
    let parsed = parser.parse()?;

    Ok(parsed)
}

impl From<&Token> for Precedence {
    fn from(value: &Token) -> Self {
        match value {
            Token::LessThan | Token::Equal => Self::Compare,
            Token::Plus | Token::Minus => Self::Sum,
            _ => Self::Lowest,
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}
