//! Generic row extraction by naming convention.
//!
//! # Responsibility
//! - Map result rows onto entity shapes described by an explicit field table.
//! - Coerce SQLite storage classes to the declared attribute types.
//!
//! # Invariants
//! - The column for attribute `fooBar` is always `foo_bar`.
//! - Every failure names the attribute it occurred on.
//! - Extra columns in a row are ignored; missing ones are errors.

use crate::model::decimal::Decimal;
use rusqlite::types::ValueRef;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declared attribute type in an entity field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Decimal,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
        };
        f.write_str(name)
    }
}

/// One attribute of an entity shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// camelCase attribute name.
    pub attribute: &'static str,
    pub kind: FieldType,
    pub nullable: bool,
}

impl Field {
    pub const fn required(attribute: &'static str, kind: FieldType) -> Self {
        Self {
            attribute,
            kind,
            nullable: false,
        }
    }

    pub const fn nullable(attribute: &'static str, kind: FieldType) -> Self {
        Self {
            attribute,
            kind,
            nullable: true,
        }
    }

    pub fn column_name(&self) -> String {
        to_snake_case(self.attribute)
    }
}

/// Entity that can be rebuilt from a result row.
///
/// Implemented once per entity; `extract` does the per-row work.
pub trait RowShape: Sized {
    const FIELDS: &'static [Field];

    fn build(row: &ExtractedRow) -> Result<Self, ExtractionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    MissingColumn {
        attribute: &'static str,
        column: String,
    },
    UnexpectedNull {
        attribute: &'static str,
    },
    Incompatible {
        attribute: &'static str,
        expected: FieldType,
        found: String,
    },
    /// The shape asked for an attribute its field table does not declare.
    UndeclaredAttribute {
        attribute: &'static str,
    },
}

impl ExtractionError {
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::MissingColumn { attribute, .. }
            | Self::UnexpectedNull { attribute }
            | Self::Incompatible { attribute, .. }
            | Self::UndeclaredAttribute { attribute } => attribute,
        }
    }
}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingColumn { attribute, column } => {
                write!(f, "attribute `{attribute}`: column `{column}` not in result")
            }
            Self::UnexpectedNull { attribute } => {
                write!(f, "attribute `{attribute}`: unexpected NULL")
            }
            Self::Incompatible {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "attribute `{attribute}`: cannot read {found} as {expected}"
            ),
            Self::UndeclaredAttribute { attribute } => {
                write!(f, "attribute `{attribute}` is not declared by the row shape")
            }
        }
    }
}

impl Error for ExtractionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Decimal(Decimal),
}

/// Coerced values of one row, keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    cells: Vec<(&'static str, Cell)>,
}

impl ExtractedRow {
    fn cell(&self, attribute: &'static str) -> Result<&Cell, ExtractionError> {
        self.cells
            .iter()
            .find(|(name, _)| *name == attribute)
            .map(|(_, cell)| cell)
            .ok_or(ExtractionError::UndeclaredAttribute { attribute })
    }

    pub fn optional_text(
        &self,
        attribute: &'static str,
    ) -> Result<Option<String>, ExtractionError> {
        match self.cell(attribute)? {
            Cell::Null => Ok(None),
            Cell::Text(value) => Ok(Some(value.clone())),
            other => Err(mismatch(attribute, FieldType::Text, other)),
        }
    }

    pub fn text(&self, attribute: &'static str) -> Result<String, ExtractionError> {
        self.optional_text(attribute)?
            .ok_or(ExtractionError::UnexpectedNull { attribute })
    }

    /// Reads an integer attribute, narrowing it to `T`.
    pub fn optional_integer<T: TryFrom<i64>>(
        &self,
        attribute: &'static str,
    ) -> Result<Option<T>, ExtractionError> {
        match self.cell(attribute)? {
            Cell::Null => Ok(None),
            Cell::Integer(value) => T::try_from(*value).map(Some).map_err(|_| {
                ExtractionError::Incompatible {
                    attribute,
                    expected: FieldType::Integer,
                    found: format!("out-of-range integer {value}"),
                }
            }),
            other => Err(mismatch(attribute, FieldType::Integer, other)),
        }
    }

    pub fn integer<T: TryFrom<i64>>(&self, attribute: &'static str) -> Result<T, ExtractionError> {
        self.optional_integer(attribute)?
            .ok_or(ExtractionError::UnexpectedNull { attribute })
    }

    pub fn optional_decimal(
        &self,
        attribute: &'static str,
    ) -> Result<Option<Decimal>, ExtractionError> {
        match self.cell(attribute)? {
            Cell::Null => Ok(None),
            Cell::Decimal(value) => Ok(Some(*value)),
            other => Err(mismatch(attribute, FieldType::Decimal, other)),
        }
    }

    pub fn decimal(&self, attribute: &'static str) -> Result<Decimal, ExtractionError> {
        self.optional_decimal(attribute)?
            .ok_or(ExtractionError::UnexpectedNull { attribute })
    }
}

fn mismatch(attribute: &'static str, expected: FieldType, found: &Cell) -> ExtractionError {
    let found = match found {
        Cell::Null => "null",
        Cell::Text(_) => "text",
        Cell::Integer(_) => "integer",
        Cell::Decimal(_) => "decimal",
    };
    ExtractionError::Incompatible {
        attribute,
        expected,
        found: found.to_string(),
    }
}

/// Column names for a shape, in field-table order.
pub fn columns_for<S: RowShape>() -> Vec<String> {
    S::FIELDS.iter().map(Field::column_name).collect()
}

/// Rebuilds one `S` from the current row.
pub fn extract<S: RowShape>(row: &Row<'_>) -> Result<S, ExtractionError> {
    let mut cells = Vec::with_capacity(S::FIELDS.len());
    for field in S::FIELDS {
        let column = field.column_name();
        let value = row
            .as_ref()
            .column_index(&column)
            .and_then(|index| row.get_ref(index))
            .map_err(|_| ExtractionError::MissingColumn {
                attribute: field.attribute,
                column: column.clone(),
            })?;
        cells.push((field.attribute, coerce(field, value)?));
    }
    S::build(&ExtractedRow { cells })
}

fn coerce(field: &Field, value: ValueRef<'_>) -> Result<Cell, ExtractionError> {
    let incompatible = |found: String| ExtractionError::Incompatible {
        attribute: field.attribute,
        expected: field.kind,
        found,
    };

    match (field.kind, value) {
        (_, ValueRef::Null) if field.nullable => Ok(Cell::Null),
        (_, ValueRef::Null) => Err(ExtractionError::UnexpectedNull {
            attribute: field.attribute,
        }),
        (FieldType::Text, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .map(|text| Cell::Text(text.to_string()))
            .map_err(|_| incompatible("non-UTF-8 text".to_string())),
        (FieldType::Integer, ValueRef::Integer(number)) => Ok(Cell::Integer(number)),
        (FieldType::Integer, ValueRef::Real(number))
            if number.fract() == 0.0 && number.abs() < i64::MAX as f64 =>
        {
            Ok(Cell::Integer(number as i64))
        }
        (FieldType::Decimal, ValueRef::Integer(number)) => Decimal::from_whole(number)
            .map(Cell::Decimal)
            .ok_or_else(|| incompatible(format!("out-of-range integer {number}"))),
        (FieldType::Decimal, ValueRef::Real(number)) => Decimal::from_f64(number)
            .map(Cell::Decimal)
            .ok_or_else(|| incompatible(format!("real {number}"))),
        (FieldType::Decimal, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse::<Decimal>().ok())
            .map(Cell::Decimal)
            .ok_or_else(|| incompatible(format!("text `{}`", String::from_utf8_lossy(bytes)))),
        (_, other) => Err(incompatible(storage_class(other).to_string())),
    }
}

fn storage_class(value: ValueRef<'_>) -> &'static str {
    match value {
        ValueRef::Null => "null",
        ValueRef::Integer(_) => "integer",
        ValueRef::Real(_) => "real",
        ValueRef::Text(_) => "text",
        ValueRef::Blob(_) => "blob",
    }
}

/// Converts a camelCase attribute name to its snake_case column name.
pub fn to_snake_case(attribute: &str) -> String {
    let mut column = String::with_capacity(attribute.len() + 4);
    for (index, ch) in attribute.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                column.push('_');
            }
            column.push(ch.to_ascii_lowercase());
        } else {
            column.push(ch);
        }
    }
    column
}
