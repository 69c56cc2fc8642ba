use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Maps a relational or equality operator and an ordering to the final
/// boolean.
///
/// This function does not inspect any values itself.
#[must_use]
pub const fn ordering_op_result(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Less => ordering.is_lt(),
        BinaryOperator::Greater => ordering.is_gt(),
        BinaryOperator::LessEqual => ordering.is_le(),
        BinaryOperator::GreaterEqual => ordering.is_ge(),
        BinaryOperator::NotEqual => ordering.is_ne(),
        _ => ordering.is_eq(),
    }
}

/// Orders two values that have a natural order: numbers among themselves and
/// text among itself. A character compared with a string behaves like a
/// one-character string.
fn order(left: &Value, right: &Value, line: usize) -> EvalResult<Option<Ordering>> {
    use Value::{Char, Integer, Real};

    Ok(match (left, right) {
        (Integer(a), Integer(b)) => Some(a.cmp(b)),
        (Integer(_) | Real(_), Integer(_) | Real(_)) => {
            left.as_real(line)?.partial_cmp(&right.as_real(line)?)
        },
        (Char(a), Char(b)) => Some(a.cmp(b)),
        (Value::String(_) | Char(_), Value::String(_) | Char(_)) => {
            Some(left.as_string().cmp(&right.as_string()))
        },
        _ => None,
    })
}

impl Context<'_> {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Numbers compare with each other (an integer against a real compares as
    /// reals), characters and strings compare lexicographically. Booleans and
    /// arrays support only `=` and `<>`, where arrays are equal when their
    /// shapes and all elements are.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Errors
    /// `TypeError` when the operands cannot be compared with `op`.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &Value::Integer(3), &Value::Real(3.5), 1);
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Equal, &Value::Char('a'), &Value::from("a"), 1);
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    ///
    /// assert!(Context::eval_comparison(BinaryOperator::Less, &Value::Boolean(false), &Value::Boolean(true), 1).is_err());
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        if let Some(ordering) = order(left, right, line)? {
            return Ok(Value::Boolean(ordering_op_result(op, ordering)));
        }

        let equality_only = matches!((left, right),
                                     (Value::Boolean(_), Value::Boolean(_))
                                     | (Value::Array(_), Value::Array(_)));
        match op {
            BinaryOperator::Equal if equality_only => Ok(Value::Boolean(left == right)),
            BinaryOperator::NotEqual if equality_only => Ok(Value::Boolean(left != right)),
            _ => Err(RuntimeError::TypeError { details: format!("cannot compare {} and {} with '{op}'",
                                                                left.type_name(),
                                                                right.type_name()),
                                               line }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ast::ScalarType, interpreter::value::array::ArrayValue};

    #[test]
    fn arrays_compare_by_content() {
        let a = Value::Array(ArrayValue::template(ScalarType::Integer, &[2]));
        let mut b = ArrayValue::template(ScalarType::Integer, &[2]);

        assert_eq!(Context::eval_comparison(BinaryOperator::Equal, &a, &Value::Array(b.clone()), 1).unwrap(),
                   Value::Boolean(true));

        b.store(&[1], Value::Integer(4), 1).unwrap();
        assert_eq!(Context::eval_comparison(BinaryOperator::NotEqual, &a, &Value::Array(b), 1).unwrap(),
                   Value::Boolean(true));
    }

    #[test]
    fn mismatched_kinds_are_rejected() {
        assert!(matches!(Context::eval_comparison(BinaryOperator::Equal, &Value::Integer(1), &Value::from("1"), 5),
                         Err(RuntimeError::TypeError { line: 5, .. })));
        assert!(matches!(Context::eval_comparison(BinaryOperator::Equal, &Value::Boolean(true), &Value::Integer(1), 5),
                         Err(RuntimeError::TypeError { .. })));
    }

    #[test]
    fn strings_order_lexicographically() {
        assert_eq!(Context::eval_comparison(BinaryOperator::GreaterEqual, &Value::from("pear"), &Value::from("apple"), 1).unwrap(),
                   Value::Boolean(true));
        assert_eq!(Context::eval_comparison(BinaryOperator::Less, &Value::Char('b'), &Value::Char('a'), 1).unwrap(),
                   Value::Boolean(false));
    }
}
