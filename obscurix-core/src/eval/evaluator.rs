use std::{collections::HashMap, io::Write};

use log::{debug, warn};

use crate::{
    environment::prelude::{Environment, Fault, Scope, Value},
    parser::prelude::{
        BinaryOperator, Call, Expression, FunctionDef, If, Infix, Primitive, Program,
        Statement, Try
    },
    utils::prelude::SrcSpan
};

use super::error::EvalError;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
/// Highest call depth the host stack is known to hold.
pub const MAX_CALL_DEPTH_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

impl EvalConfig {
    /// Builds a config, lowering `max_call_depth` to `MAX_CALL_DEPTH_LIMIT`.
    pub fn new(max_call_depth: usize) -> Self {
        if max_call_depth > MAX_CALL_DEPTH_LIMIT {
            warn!(
                target: "obscurix::eval",
                "maximum call depth {max_call_depth} lowered to {MAX_CALL_DEPTH_LIMIT}"
            );
        }

        Self { max_call_depth: max_call_depth.min(MAX_CALL_DEPTH_LIMIT) }
    }
}

/// A thrown value together with the statement or expression that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct Thrown {
    pub value: Value,
    pub location: SrcSpan,
}

/// Outcome of running a statement or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Normal,
    Return(Value),
    Thrown(Thrown),
}

/// Why expression evaluation stopped early.
#[derive(Debug)]
enum Unwind {
    Thrown(Thrown),
    Fatal(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(value: EvalError) -> Self {
        Unwind::Fatal(value)
    }
}

fn fault(kind: Fault, text: impl std::fmt::Display, location: SrcSpan) -> Unwind {
    Unwind::Thrown(Thrown {
        value: Value::fault(kind, text),
        location
    })
}

macro_rules! value_or_signal {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(Unwind::Thrown(thrown)) => return Ok(Signal::Thrown(thrown)),
            Err(Unwind::Fatal(err)) => return Err(err),
        }
    };
}

pub struct Evaluator<'a, W: Write> {
    output: W,
    config: EvalConfig,
    environment: Environment,
    functions: HashMap<&'a str, &'a FunctionDef>,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: W, config: EvalConfig) -> Self {
        Self {
            output,
            config: EvalConfig::new(config.max_call_depth),
            environment: Environment::new(),
            functions: HashMap::new(),
        }
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Registers every function outside of function bodies, including those
    /// inside `↜` and `⛌` blocks, so calls may precede definitions.
    /// A later definition of the same name replaces the earlier one.
    pub fn hoist(&mut self, program: &'a Program) {
        self.hoist_block(&program.statements);
    }

    fn hoist_block(&mut self, statements: &'a [Statement]) {
        for statement in statements {
            if let Statement::FunctionDef(def) = statement {
                debug!(
                    target: "obscurix::eval",
                    "define §{} with {} parameter(s)",
                    def.name.value,
                    def.parameters.len()
                );

                self.functions.insert(def.name.value.as_str(), def);
            }

            for block in statement.blocks() {
                self.hoist_block(block);
            }
        }
    }

    pub fn run(&mut self, program: &'a Program) -> Result<(), EvalError> {
        self.hoist(program);

        match self.exec_block(&program.statements)? {
            Signal::Thrown(Thrown { value, location }) => {
                debug!(target: "obscurix::eval", "uncaught {value:?} at {location}");

                Err(EvalError::Uncaught { value, location })
            },
            Signal::Normal | Signal::Return(_) => {
                self.output.flush()?;

                Ok(())
            }
        }
    }

    pub fn exec_block(&mut self, statements: &[Statement]) -> Result<Signal, EvalError> {
        for statement in statements {
            match self.exec_statement(statement)? {
                Signal::Normal => {},
                signal => return Ok(signal)
            }
        }

        Ok(Signal::Normal)
    }

    pub fn exec_statement(&mut self, statement: &Statement) -> Result<Signal, EvalError> {
        debug!(target: "obscurix::eval", "{} at {}", statement.kind(), statement.location());

        match statement {
            Statement::FunctionDef(_) => Ok(Signal::Normal),
            Statement::Assign(assign) => {
                let value = value_or_signal!(self.eval_expression(&assign.value));

                self.environment.set(assign.identifier.value.clone(), value);

                Ok(Signal::Normal)
            },
            Statement::If(if_) => self.exec_if(if_),
            Statement::Try(try_) => self.exec_try(try_),
            Statement::Throw(throw) => {
                let value = value_or_signal!(self.eval_expression(&throw.value));

                Ok(Signal::Thrown(Thrown {
                    value: value.into_error(),
                    location: throw.location
                }))
            },
            Statement::Return(return_) => {
                let value = match &return_.value {
                    Some(value) => value_or_signal!(self.eval_expression(value)),
                    None => Value::Unit
                };

                Ok(Signal::Return(value))
            },
            Statement::Print(print) => {
                let value = value_or_signal!(self.eval_expression(&print.value));

                writeln!(self.output, "{value}")?;

                Ok(Signal::Normal)
            },
            Statement::Expression(expression) => {
                value_or_signal!(self.eval_expression(expression));

                Ok(Signal::Normal)
            }
        }
    }

    fn exec_if(&mut self, if_: &If) -> Result<Signal, EvalError> {
        let condition = value_or_signal!(self.eval_expression(&if_.condition));

        let holds = match condition {
            Value::Boolean(value) => value,
            Value::Integer(value) => value != 0,
            Value::Float(value) => value != 0.0,
            other => return Ok(Signal::Thrown(Thrown {
                value: Value::fault(
                    Fault::Type,
                    format!("condition must be a Boolean or a Number, got {}", other._type())
                ),
                location: if_.condition.location()
            }))
        };

        match (holds, &if_.alternative) {
            (true, _) => self.exec_block(&if_.resolution),
            (false, Some(alternative)) => self.exec_block(alternative),
            (false, None) => Ok(Signal::Normal)
        }
    }

    fn exec_try(&mut self, try_: &Try) -> Result<Signal, EvalError> {
        let body = self.exec_block(&try_.body)?;

        let outcome = match (body, &try_.catch) {
            (Signal::Thrown(thrown), Some(catch)) => {
                debug!(target: "obscurix::eval", "caught {:?} at {}", thrown.value, thrown.location);

                self.environment.push_layer();

                if let Some(variable) = &catch.variable {
                    self.environment.define(variable.value.clone(), thrown.value);
                }

                let outcome = self.exec_block(&catch.body);
                self.environment.pop_layer();

                outcome?
            },
            (signal, _) => signal
        };

        if let Some(finally) = &try_.finally {
            match self.exec_block(finally)? {
                Signal::Normal => {},
                masking => return Ok(masking)
            }
        }

        Ok(outcome)
    }

    fn eval_expression(&mut self, expression: &Expression) -> Result<Value, Unwind> {
        match expression {
            Expression::Identifier(ident) => match self.environment.get(&ident.value) {
                Some(value) => Ok(value.clone()),
                None => Err(fault(
                    Fault::Name,
                    format!("undefined variable {}", ident.value),
                    ident.location
                ))
            },
            Expression::Primitive(primitive) => Ok(match primitive {
                Primitive::Int { value, .. } => Value::Integer(*value),
                Primitive::Float { value, .. } => Value::Float(*value),
                Primitive::Str { value, .. } => Value::String(value.clone()),
            }),
            Expression::Infix(infix) => self.eval_infix(infix),
            Expression::Call(call) => self.eval_call(call),
        }
    }

    fn eval_infix(&mut self, infix: &Infix) -> Result<Value, Unwind> {
        let left = self.eval_expression(&infix.left)?;
        let right = self.eval_expression(&infix.right)?;

        binary(infix.operator, left, right)
            .map_err(|(kind, text)| fault(kind, text, infix.location))
    }

    fn eval_call(&mut self, call: &Call) -> Result<Value, Unwind> {
        let name = call.function.value.as_str();

        let function = match self.functions.get(name).copied() {
            Some(function) => function,
            None => return Err(fault(
                Fault::Name,
                format!("undefined function §{name}"),
                call.location
            ))
        };

        if call.arguments.len() != function.parameters.len() {
            return Err(fault(
                Fault::Arity,
                format!(
                    "§{name} expects {} argument(s), got {}",
                    function.parameters.len(),
                    call.arguments.len()
                ),
                call.location
            ));
        }

        let mut arguments = Vec::with_capacity(call.arguments.len());

        for argument in &call.arguments {
            arguments.push(self.eval_expression(argument)?);
        }

        if self.environment.depth() >= self.config.max_call_depth {
            return Err(fault(
                Fault::StackOverflow,
                format!("maximum call depth of {} exceeded in §{name}", self.config.max_call_depth),
                call.location
            ));
        }

        let scope: Scope = function.parameters.iter()
            .map(|param| param.value.clone())
            .zip(arguments)
            .collect();

        debug!(target: "obscurix::eval", "call §{name} {scope:?}");

        self.environment.push_frame(scope);
        let signal = self.exec_block(&function.body);
        self.environment.pop_frame();

        match signal? {
            Signal::Normal => Ok(Value::Unit),
            Signal::Return(value) => Ok(value),
            Signal::Thrown(thrown) => Err(Unwind::Thrown(thrown))
        }
    }
}

fn type_mismatch(operator: BinaryOperator, left: &Value, right: &Value) -> (Fault, String) {
    (
        Fault::Type,
        format!("cannot apply {operator} to {} and {}", left._type(), right._type())
    )
}

/// Applies a binary operator; errors carry the fault kind and its message.
pub fn binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, (Fault, String)> {
    match operator {
        BinaryOperator::Add | BinaryOperator::Subtract => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => {
                let result = match operator {
                    BinaryOperator::Add => a.checked_add(*b),
                    _ => a.checked_sub(*b)
                };

                match result {
                    Some(value) => Ok(Value::Integer(value)),
                    None => Err((
                        Fault::Arithmetic,
                        format!("integer overflow in {a} {operator} {b}")
                    ))
                }
            },
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Float(match operator {
                    BinaryOperator::Add => a + b,
                    _ => a - b
                })),
                _ => Err(type_mismatch(operator, &left, &right))
            }
        },
        BinaryOperator::LessThan => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::from(a < b)),
            (Value::String(a), Value::String(b)) => Ok(Value::from(a < b)),
            _ => match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::from(a < b)),
                _ => Err(type_mismatch(operator, &left, &right))
            }
        },
        BinaryOperator::Equal => match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::from(a == b)),
            _ if left.is_number() && right.is_number() => {
                Ok(Value::from(left.as_f64() == right.as_f64()))
            },
            _ if left._type() == right._type() => {
                Ok(Value::from(left == right))
            },
            _ => Err(type_mismatch(operator, &left, &right))
        }
    }
}
