//! Size-expression parsing - split `"2 tex_letter_width"` into coefficient and unit

use crate::{UnitError, UnitTable};

/// Split a size expression into a numeric coefficient and the unit remainder.
///
/// Greedily consumes the longest leading substring that parses as an `f64`
/// (sign, digits, decimal point, exponent), backtracking a character at a
/// time so that a trailing `e` or `.` belonging to the unit name is given
/// back. A missing coefficient defaults to `1.0`.
///
/// Both the concatenated form (`"3.5in"`) and the space-separated form
/// (`"2 tex_letter_width"`) split correctly: the scan stops at the first
/// character that can no longer be part of a number.
pub fn split_coefficient(expr: &str) -> (f64, &str) {
    let bytes = expr.as_bytes();
    let mut end = 0;
    while end < bytes.len()
        && matches!(bytes[end], b'0'..=b'9' | b'.' | b'+' | b'-' | b'e' | b'E')
    {
        end += 1;
    }
    while end > 0 {
        if let Ok(value) = expr[..end].parse::<f64>() {
            return (value, &expr[end..]);
        }
        end -= 1;
    }
    (1.0, expr)
}

impl UnitTable {
    /// Resolve a size expression to a length in inches.
    ///
    /// The expression is an optional signed real coefficient followed by a
    /// unit name, with or without separating whitespace. A bare number has
    /// no unit and is malformed; an unlisted unit name is an error, never a
    /// silent default. Pure function of the expression and this table.
    pub fn resolve(&self, expression: &str) -> Result<f64, UnitError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(UnitError::MalformedExpression(expression.to_string()));
        }
        let (coefficient, remainder) = split_coefficient(trimmed);
        let name = remainder.trim_start();
        if name.is_empty() {
            return Err(UnitError::MalformedExpression(expression.to_string()));
        }
        let def = self
            .get(name)
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))?;
        Ok(coefficient * def.inches)
    }
}
