use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation for integers and reals. Negating the
    ///   smallest integer overflows.
    /// - `Not`: boolean negation. The operand must be a boolean.
    ///
    /// # Parameters
    /// - `op`: Unary operator.
    /// - `value`: Input value.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The computed `Value` wrapped in `EvalResult`.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(5), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-5));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Boolean(false), 1).unwrap();
    /// assert_eq!(v, Value::Boolean(true));
    ///
    /// assert!(Context::eval_unary(UnaryOperator::Not, &Value::Integer(0), 1).is_err());
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => n.checked_neg()
                                      .map(Value::Integer)
                                      .ok_or(RuntimeError::Overflow { line }),
                Value::Real(r) => Ok(Value::Real(-r)),
                _ => Err(RuntimeError::ExpectedNumber { line }),
            },
            UnaryOperator::Not => Ok(Value::Boolean(!value.expect_boolean(line)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn negation_is_checked() {
        assert!(matches!(Context::eval_unary(UnaryOperator::Negate, &Value::Integer(i32::MIN), 3),
                         Err(RuntimeError::Overflow { line: 3 })));
        assert_eq!(Context::eval_unary(UnaryOperator::Negate, &Value::Real(1.5), 1).unwrap(),
                   Value::Real(-1.5));
        assert!(matches!(Context::eval_unary(UnaryOperator::Negate, &Value::from("x"), 1),
                         Err(RuntimeError::ExpectedNumber { .. })));
    }
}
