//! Operator and operand validation.

use crate::builder::{Operand, OperandShape, Operator};
use crate::error::QueryError;

/// Parse operator text into one of the 13 supported operators.
///
/// Thin wrapper over [`Operator::parse`] for callers validating raw input.
pub fn validate_operator(text: &str) -> Result<Operator, QueryError> {
    Operator::parse(text)
}

/// Check that `operand` has the shape `operator` needs.
///
/// - `IS NULL` / `IS NOT NULL`: anything (the operand is ignored)
/// - `IN` / `NOT IN`: a non-empty list with no `NULL` elements
/// - `BETWEEN` / `NOT BETWEEN`: a range whose bounds are both non-null
/// - everything else: a single non-null value
pub fn validate_operand(operator: Operator, operand: &Operand) -> Result<(), QueryError> {
    let expected = match (operator.shape(), operand) {
        (OperandShape::Absent, _) => return Ok(()),
        (OperandShape::Single, Operand::Single(v)) if !v.is_null() => return Ok(()),
        (OperandShape::List, Operand::List(values))
            if !values.is_empty() && values.iter().all(|v| !v.is_null()) =>
        {
            return Ok(());
        },
        (OperandShape::Range, Operand::Range { min, max }) if !min.is_null() && !max.is_null() => {
            return Ok(());
        },
        (OperandShape::Single, _) => "a non-null value",
        (OperandShape::List, _) => "a non-empty list of non-null values",
        (OperandShape::Range, _) => "a non-null min and max",
    };

    tracing::warn!(%operator, expected, "operand rejected");
    Err(QueryError::MissingValue { operator, expected })
}
