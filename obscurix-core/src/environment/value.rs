use std::fmt::Display;

pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);

/// Where an error value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Thrown,
    Name,
    Arity,
    Type,
    Arithmetic,
    StackOverflow,
}

impl Fault {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Thrown => "Error",
            Self::Name => "NameError",
            Self::Arity => "ArityError",
            Self::Type => "TypeError",
            Self::Arithmetic => "ArithmeticError",
            Self::StackOverflow => "StackOverflowError",
        }
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Error {
        kind: Fault,
        value: Box<Value>
    },
    Unit,
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Error { value, .. } => write!(f, "{value}"),
            Value::Unit => Ok(())
        }
    }
}

impl Value {
    /// A host fault carrying a `"<Kind>Error: <text>"` message.
    pub fn fault(kind: Fault, text: impl Display) -> Self {
        Value::Error {
            kind,
            value: Box::new(Value::String(format!("{}: {text}", kind.prefix())))
        }
    }

    /// Wraps a thrown payload, leaving existing errors untouched.
    pub fn into_error(self) -> Self {
        match self {
            error @ Value::Error { .. } => error,
            value => Value::Error {
                kind: Fault::Thrown,
                value: Box::new(value)
            }
        }
    }

    pub fn _type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::String(_) => ValueType::String,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Error { .. } => ValueType::Error,
            Self::Unit => ValueType::Unit
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value { TRUE } else { FALSE }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    Error,
    Unit
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "Integer"),
            Self::Float => write!(f, "Float"),
            Self::String => write!(f, "String"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Error => write!(f, "Error"),
            Self::Unit => write!(f, "Unit"),
        }
    }
}
