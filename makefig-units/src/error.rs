//! Unit resolution errors

use thiserror::Error;

/// Errors from unit registration and size-expression resolution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// The unit-name portion of an expression is not in the table
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),

    /// The expression is empty or has a number but no unit
    #[error("malformed size expression `{0}`")]
    MalformedExpression(String),

    /// Units must map to a positive, finite inch value
    #[error("unit `{name}` must map to a positive inch value, got {inches}")]
    InvalidUnitValue { name: String, inches: f64 },

    /// Unit names are parsed from whitespace-delimited tokens
    #[error("invalid unit name `{0}`: must be non-empty and contain no whitespace")]
    InvalidUnitName(String),
}
