use std::{collections::HashSet, fmt::Display};

use log::debug;

use crate::{
    lexer::prelude::{float_literal, LexResult, Token},
    parser::prelude::{parse_error, InfixParse, Parse, ParseError, ParseErrorType, Parser, Precedence},
    utils::prelude::SrcSpan
};

#[derive(Debug)]
pub struct Parsed {
    pub module: Module,
    pub comments: Vec<SrcSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub program: Program
}

// program -> { <statement> }
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut statements = vec![];

        parser.skip_newline();
        let start = parser.eof_span().start;

        while !parser.at_end() {
            let statement = match &parser.current_token {
                Some((start, token, end)) if token.is_block_end() => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec!["a statement".to_string()]
                    },
                    SrcSpan { start: *start, end: *end }
                ),
                _ => Statement::parse(parser, None)?
            };

            statements.push(statement);
            parser.skip_newline();
        }

        let end = parser.eof_span().end;

        Ok(Self {
            statements,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let statements = self.statements.iter()
            .map(|statement| format!("{}", statement))
            .collect::<Vec<String>>();

        write!(f, "{}", statements.join("\n"))
    }
}

fn indented(statements: &[Statement]) -> String {
    statements.iter()
        .flat_map(|statement| statement.to_string()
            .lines()
            .map(|line| format!("    {line}\n"))
            .collect::<Vec<String>>()
        )
        .collect()
}

// statement -> <function_def> | <assign> | <if> | <try> | <throw> | <return> | <print> | <call>
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    FunctionDef(FunctionDef),
    Assign(Assign),
    If(If),
    Try(Try),
    Throw(Throw),
    Return(Return),
    Print(Print),
    Expression(Expression),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        parser.skip_newline();

        let res = match &parser.current_token {
            Some((start, token, end)) => match token {
                Token::FuncStart if parser.in_function => return parse_error(
                    ParseErrorType::NestedFunction,
                    SrcSpan { start: *start, end: *end }
                ),
                Token::FuncStart => Self::FunctionDef(FunctionDef::parse(parser, None)?),
                Token::Ident(_) if parser.next_is(&Token::Assign) => Self::Assign(Assign::parse(parser, None)?),
                Token::Ident(_) | Token::Call => Self::Expression(Expression::Call(Call::parse(parser, None)?)),
                Token::IfStart => Self::If(If::parse(parser, None)?),
                Token::TryStart => Self::Try(Try::parse(parser, None)?),
                Token::Throw => Self::Throw(Throw::parse(parser, None)?),
                Token::Return => Self::Return(Return::parse(parser, None)?),
                Token::Print => Self::Print(Print::parse(parser, None)?),
                Token::Eof => return parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: *start, end: *end }
                ),
                _ => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec!["a statement".to_string()]
                    },
                    SrcSpan { start: *start, end: *end }
                )
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                parser.eof_span()
            )
        };

        debug!(target: "obscurix::parser", "statement at {}: {}", res.location(), res.kind());

        Ok(res)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FunctionDef(def) => write!(f, "{def}"),
            Self::Assign(assign) => write!(f, "{assign}"),
            Self::If(if_) => write!(f, "{if_}"),
            Self::Try(try_) => write!(f, "{try_}"),
            Self::Throw(throw) => write!(f, "{throw}"),
            Self::Return(return_) => write!(f, "{return_}"),
            Self::Print(print) => write!(f, "{print}"),
            Self::Expression(expression) => write!(f, "{expression}"),
        }
    }
}

impl Statement {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::FunctionDef(def) => def.location,
            Self::Assign(assign) => assign.location,
            Self::If(if_) => if_.location,
            Self::Try(try_) => try_.location,
            Self::Throw(throw) => throw.location,
            Self::Return(return_) => return_.location,
            Self::Print(print) => print.location,
            Self::Expression(expression) => expression.location(),
        }
    }

    /// Statement blocks nested directly inside this one. Function bodies
    /// are not included.
    pub fn blocks(&self) -> Vec<&[Statement]> {
        match self {
            Self::If(if_) => std::iter::once(if_.resolution.as_slice())
                .chain(if_.alternative.as_deref())
                .collect(),
            Self::Try(try_) => std::iter::once(try_.body.as_slice())
                .chain(try_.catch.as_ref().map(|catch| catch.body.as_slice()))
                .chain(try_.finally.as_deref())
                .collect(),
            Self::FunctionDef(_)
            | Self::Assign(_)
            | Self::Throw(_)
            | Self::Return(_)
            | Self::Print(_)
            | Self::Expression(_) => vec![]
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::FunctionDef(_) => "function definition",
            Self::Assign(_) => "assignment",
            Self::If(_) => "if",
            Self::Try(_) => "try",
            Self::Throw(_) => "throw",
            Self::Return(_) => "return",
            Self::Print(_) => "print",
            Self::Expression(_) => "call",
        }
    }
}

// function_def -> ⥀ § <identifier> { <identifier> } { <statement> } ⥁
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: Vec<Statement>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionDef {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, open_end) = parser.expect_one(Token::FuncStart)?;

        if let Err(err) = parser.expect_one(Token::Call) {
            return parse_error(ParseErrorType::ExpectedFunctionName, err.span);
        }

        let name = match parser.expect_ident() {
            Ok(ident) => Identifier::from(ident),
            Err(err) => return parse_error(ParseErrorType::ExpectedFunctionName, err.span)
        };

        let mut parameters: Vec<Identifier> = vec![];
        let mut seen = HashSet::new();

        while parser.current_is_list_atom() {
            let param = Identifier::from(parser.expect_ident()?);

            if !seen.insert(param.value.clone()) {
                return parse_error(
                    ParseErrorType::DuplicateParameter { name: param.value },
                    param.location
                );
            }

            parameters.push(param);
        }

        let was_in_function = std::mem::replace(&mut parser.in_function, true);
        let body = parser.parse_block(
            (Token::FuncStart, SrcSpan { start, end: open_end }),
            &[Token::FuncEnd]
        );
        parser.in_function = was_in_function;

        let body = body?;
        let (_, end) = parser.expect_one(Token::FuncEnd)?;

        Ok(Self {
            name,
            parameters,
            body,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for FunctionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "⥀ §{}", self.name)?;

        for param in &self.parameters {
            write!(f, " {param}")?;
        }

        write!(f, "\n{}⥁", indented(&self.body))
    }
}

// assign -> <identifier> ≔ <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub identifier: Identifier,
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Assign {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let ident = parser.expect_ident()?;
        let start = ident.0;

        parser.expect_one(Token::Assign)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            identifier: ident.into(),
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ≔ {}", self.identifier, self.value)
    }
}

// if -> ↜ [?] <expression> ⇒ { <statement> } [⇏ { <statement> }] ↯
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub resolution: Vec<Statement>,
    pub alternative: Option<Vec<Statement>>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for If {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, open_end) = parser.expect_one(Token::IfStart)?;
        let opening = (Token::IfStart, SrcSpan { start, end: open_end });

        if parser.current_is(&Token::IfCond) {
            parser.step();
        }

        let condition = Expression::parse(parser, None)?;

        parser.skip_newline();
        parser.expect_one(Token::Then)?;

        let resolution = parser.parse_block(opening.clone(), &[Token::Else, Token::IfEnd])?;

        let alternative = if parser.current_is(&Token::Else) {
            parser.step();

            Some(parser.parse_block(opening, &[Token::IfEnd])?)
        } else {
            None
        };

        let (_, end) = parser.expect_one(Token::IfEnd)?;

        Ok(Self {
            condition,
            resolution,
            alternative,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for If {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "↜ ? {} ⇒\n{}", self.condition, indented(&self.resolution))?;

        if let Some(alternative) = &self.alternative {
            write!(f, "⇏\n{}", indented(alternative))?;
        }

        write!(f, "↯")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub variable: Option<Identifier>,
    pub body: Vec<Statement>,
}

// try -> ⛌ { <statement> } [⎁ [<identifier>] { <statement> }] [⎎ { <statement> }] ⍰
#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub body: Vec<Statement>,
    pub catch: Option<CatchClause>,
    pub finally: Option<Vec<Statement>>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Try {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, open_end) = parser.expect_one(Token::TryStart)?;
        let opening = (Token::TryStart, SrcSpan { start, end: open_end });

        let body = parser.parse_block(
            opening.clone(),
            &[Token::Catch, Token::Finally, Token::TryEnd]
        )?;

        let catch = if parser.current_is(&Token::Catch) {
            parser.step();

            // the variable has to share the line with ⎁
            let variable = if parser.current_is_list_atom()
                && matches!(parser.current_token, Some((_, Token::Ident(_), _)))
            {
                Some(Identifier::from(parser.expect_ident()?))
            } else {
                None
            };

            let body = parser.parse_block(opening.clone(), &[Token::Finally, Token::TryEnd])?;

            Some(CatchClause { variable, body })
        } else {
            None
        };

        let finally = if parser.current_is(&Token::Finally) {
            parser.step();

            Some(parser.parse_block(opening, &[Token::TryEnd])?)
        } else {
            None
        };

        let (_, end) = parser.expect_one(Token::TryEnd)?;

        Ok(Self {
            body,
            catch,
            finally,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Try {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "⛌\n{}", indented(&self.body))?;

        if let Some(catch) = &self.catch {
            match &catch.variable {
                Some(variable) => write!(f, "⎁ {variable}\n")?,
                None => write!(f, "⎁\n")?
            }

            write!(f, "{}", indented(&catch.body))?;
        }

        if let Some(finally) = &self.finally {
            write!(f, "⎎\n{}", indented(finally))?;
        }

        write!(f, "⍰")
    }
}

// throw -> λ! <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Throw {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Throw {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Throw)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Throw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "λ! {}", self.value)
    }
}

// return -> ⎋ [<expression>]
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Return {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, mut end) = parser.expect_one(Token::Return)?;

        if !parser.in_function {
            return parse_error(
                ParseErrorType::ReturnOutsideFunction,
                SrcSpan { start, end }
            );
        }

        let value = match &parser.current_token {
            None | Some((_, Token::Newline | Token::Eof, _)) => None,
            Some((_, token, _)) if token.is_block_end() => None,
            Some(_) => {
                let value = Expression::parse(parser, None)?;
                end = value.location().end;

                Some(value)
            }
        };

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "⎋ {value}"),
            None => write!(f, "⎋")
        }
    }
}

// print -> * <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub value: Expression,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Print {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::Print)?;

        let value = Expression::parse(parser, None)?;
        let end = value.location().end;

        Ok(Self {
            value,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Print {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "* {}", self.value)
    }
}

// expression -> <identifier> | <primitive> | <call> | <infix>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Primitive(Primitive),
    Infix(Infix),
    Call(Call),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut expr = match &parser.current_token {
            Some((start, token, end)) => match token {
                Token::Ident(_) => {
                    let (start, ident, end) = parser.expect_ident()?;

                    Self::Identifier(Identifier::from((start, ident, end)))
                },
                Token::Int(_)
                | Token::Float(_)
                | Token::Str(_) => Self::Primitive(Primitive::parse(parser, None)?),
                Token::Call => Self::Call(Call::parse(parser, None)?),
                _ => return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token: token.clone(),
                        expected: vec!["an Identifier, a Number, a String or `§`".to_string()]
                    },
                    SrcSpan { start: *start, end: *end }
                )
            },
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                parser.eof_span()
            )
        };

        while precedence.unwrap_or(Precedence::Lowest) < parser.current_precedence() {
            expr = Self::Infix(Infix::parse(parser, expr, precedence)?);
        }

        Ok(expr)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Infix(infix) => write!(f, "{infix}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Identifier(ident) => ident.location,
            Self::Primitive(primitive) => primitive.location(),
            Self::Infix(infix) => infix.location,
            Self::Call(call) => call.location,
        }
    }
}

// identifier -> <letter> { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<(u32, String, u32)> for Identifier {
    fn from(value: (u32, String, u32)) -> Self {
        Identifier {
            value: value.1,
            location: SrcSpan { start: value.0, end: value.2 }
        }
    }
}

// call -> [§] <identifier> { <primitive> | <identifier> }
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub function: Identifier,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let prefix = if parser.current_is(&Token::Call) {
            Some(parser.expect_one(Token::Call)?)
        } else {
            None
        };

        let function = match parser.expect_ident() {
            Ok(ident) => Identifier::from(ident),
            Err(err) => return parse_error(ParseErrorType::ExpectedFunctionName, err.span)
        };

        let start = prefix.map_or(function.location.start, |(start, _)| start);
        let mut end = function.location.end;
        let mut arguments = vec![];

        while parser.current_is_list_atom() {
            let argument = match &parser.current_token {
                Some((_, Token::Ident(_), _)) => Expression::Identifier(parser.expect_ident()?.into()),
                _ => Expression::Primitive(Primitive::parse(parser, None)?)
            };

            end = argument.location().end;
            arguments.push(argument);
        }

        Ok(Self {
            function,
            arguments,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "§{}", self.function)?;

        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    LessThan,
    Equal,
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        Some(match token {
            Token::Plus => Self::Add,
            Token::Minus => Self::Subtract,
            Token::LessThan => Self::LessThan,
            Token::Equal => Self::Equal,
            _ => return None
        })
    }

    pub fn as_token(&self) -> Token {
        match self {
            Self::Add => Token::Plus,
            Self::Subtract => Token::Minus,
            Self::LessThan => Token::LessThan,
            Self::Equal => Token::Equal,
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_token().as_literal())
    }
}

// infix -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Infix {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();

        let SrcSpan { start, .. } = left.location();

        let operator = match parser.current_token.as_ref()
            .and_then(|(_, token, _)| BinaryOperator::from_token(token))
        {
            Some(operator) => {
                parser.step();
                operator
            },
            None => {
                let span = parser.eof_span();
                let token = parser.current_token.as_ref()
                    .map_or(Token::Eof, |(_, token, _)| token.clone());

                return parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["an operator".to_string()]
                    },
                    span
                )
            }
        };

        let right = Expression::parse(parser, Some(precedence))?;

        let SrcSpan { end, .. } = right.location();

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

// primitive -> <int> | <float> | <string>
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int {
        value: i64,
        location: SrcSpan
    },
    Float {
        value: f64,
        location: SrcSpan
    },
    Str {
        value: String,
        location: SrcSpan
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Primitive {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        match parser.next_token() {
            Some((start, token, end)) => match token {
                Token::Int(value) => Ok(Self::Int {
                    value,
                    location: SrcSpan { start, end }
                }),
                Token::Float(value) => Ok(Self::Float {
                    value,
                    location: SrcSpan { start, end }
                }),
                Token::Str(value) => Ok(Self::Str {
                    value,
                    location: SrcSpan { start, end }
                }),
                token => parse_error(
                    ParseErrorType::UnexpectedToken {
                        token,
                        expected: vec!["a Number or a String".to_string()]
                    },
                    SrcSpan { start, end }
                ),
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                parser.eof_span()
            ),
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{}", float_literal(*value)),
            Self::Str { value, .. } => write!(f, "\"{value}\"")
        }
    }
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. } |
            Self::Float { location, .. } |
            Self::Str { location, .. } => *location
        }
    }
}
