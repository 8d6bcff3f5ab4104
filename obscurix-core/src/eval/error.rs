use thiserror::Error;

use crate::{environment::prelude::{Fault, Value}, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("uncaught error: {value}")]
    Uncaught {
        value: Value,
        location: SrcSpan
    },
    #[error("failed to write program output")]
    Io {
        err: std::io::ErrorKind
    }
}

impl From<std::io::Error> for EvalError {
    fn from(value: std::io::Error) -> Self {
        EvalError::Io { err: value.kind() }
    }
}

impl EvalError {
    /// Kind of a host fault that escaped. Values thrown with `λ!` have none.
    pub fn fault(&self) -> Option<Fault> {
        match self {
            EvalError::Uncaught { value: Value::Error { kind, .. }, .. } if *kind != Fault::Thrown => Some(*kind),
            _ => None
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self {
            EvalError::Uncaught { value, .. } => {
                let label = match value {
                    Value::Error { kind: Fault::Thrown, .. } => "Thrown here",
                    Value::Error { kind: Fault::Name, .. } => "Name error",
                    Value::Error { kind: Fault::Arity, .. } => "Arity error",
                    Value::Error { kind: Fault::Type, .. } => "Type error",
                    Value::Error { kind: Fault::Arithmetic, .. } => "Arithmetic error",
                    Value::Error { kind: Fault::StackOverflow, .. } => "Stack overflow",
                    _ => "Thrown here"
                };

                (label, vec![format!("{value}")])
            },
            EvalError::Io { err } => ("Output failed", vec![format!("{err}")])
        }
    }
}
