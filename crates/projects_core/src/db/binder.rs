//! Generic positional parameter binding.
//!
//! # Responsibility
//! - Bind text, integer and fixed-point decimal values to `?N` placeholders.
//! - Bind SQL NULL uniformly for absent values of any declared type.
//!
//! # Invariants
//! - A non-null value is bound only when it matches its declared type.
//! - `bind_all` binds positions `1..=n` and requires `n` to equal the
//!   statement's parameter count.
//! - Decimals are bound as canonical two-digit text so the store sees the
//!   exact value.

use crate::model::decimal::Decimal;
use rusqlite::types::Null;
use rusqlite::Statement;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declared SQL-facing type of a bound attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Decimal,
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// Value carried to the binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
        }
    }
}

/// One declared parameter, ready to be bound at its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub declared: ParamType,
    pub value: ParamValue,
}

impl Binding {
    pub fn new(declared: ParamType, value: ParamValue) -> Self {
        Self { declared, value }
    }

    pub fn text<S: AsRef<str>>(value: Option<S>) -> Self {
        Self::new(
            ParamType::Text,
            value.map_or(ParamValue::Null, |v| ParamValue::Text(v.as_ref().to_string())),
        )
    }

    pub fn integer<I: Into<i64>>(value: Option<I>) -> Self {
        Self::new(
            ParamType::Integer,
            value.map_or(ParamValue::Null, |v| ParamValue::Integer(v.into())),
        )
    }

    pub fn decimal(value: Option<Decimal>) -> Self {
        Self::new(
            ParamType::Decimal,
            value.map_or(ParamValue::Null, ParamValue::Decimal),
        )
    }
}

#[derive(Debug)]
pub enum BindError {
    TypeMismatch {
        position: usize,
        declared: ParamType,
        actual: &'static str,
    },
    ParameterCount {
        expected: usize,
        provided: usize,
    },
    Rejected {
        position: usize,
        source: rusqlite::Error,
    },
}

impl Display for BindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                position,
                declared,
                actual,
            } => write!(
                f,
                "parameter {position} declared as {declared} but got {actual} value"
            ),
            Self::ParameterCount { expected, provided } => write!(
                f,
                "statement expects {expected} parameters, {provided} provided"
            ),
            Self::Rejected { position, source } => {
                write!(f, "store rejected parameter {position}: {source}")
            }
        }
    }
}

impl Error for BindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Binds one value at a 1-based position, dispatching on the declared type.
pub fn bind(
    stmt: &mut Statement<'_>,
    position: usize,
    value: &ParamValue,
    declared: ParamType,
) -> Result<(), BindError> {
    let bound = match (declared, value) {
        (_, ParamValue::Null) => stmt.raw_bind_parameter(position, Null),
        (ParamType::Text, ParamValue::Text(text)) => {
            stmt.raw_bind_parameter(position, text.as_str())
        }
        (ParamType::Integer, ParamValue::Integer(number)) => {
            stmt.raw_bind_parameter(position, *number)
        }
        (ParamType::Decimal, ParamValue::Decimal(decimal)) => {
            stmt.raw_bind_parameter(position, decimal.to_string())
        }
        (declared, other) => {
            return Err(BindError::TypeMismatch {
                position,
                declared,
                actual: other.kind(),
            })
        }
    };

    bound.map_err(|source| BindError::Rejected { position, source })
}

/// Binds every binding in order, starting at position 1.
pub fn bind_all(stmt: &mut Statement<'_>, bindings: &[Binding]) -> Result<(), BindError> {
    let expected = stmt.parameter_count();
    if expected != bindings.len() {
        return Err(BindError::ParameterCount {
            expected,
            provided: bindings.len(),
        });
    }

    for (index, binding) in bindings.iter().enumerate() {
        bind(stmt, index + 1, &binding.value, binding.declared)?;
    }
    Ok(())
}
