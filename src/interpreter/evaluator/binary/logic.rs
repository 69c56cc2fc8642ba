use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a logical operation between two boolean values.
    ///
    /// Both operands must already be booleans; nothing is converted.
    /// Supported operators are logical AND and OR.
    ///
    /// # Parameters
    /// - `op`: The logical operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::Boolean(true);
    /// let b = Value::Boolean(false);
    ///
    /// let result = Context::eval_logic(BinaryOperator::Or, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    ///
    /// assert!(Context::eval_logic(BinaryOperator::And, &a, &Value::Integer(1), 1).is_err());
    /// ```
    pub fn eval_logic(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let left = left.expect_boolean(line)?;
        let right = right.expect_boolean(line)?;

        match op {
            BinaryOperator::And => Ok(Value::Boolean(left && right)),
            BinaryOperator::Or => Ok(Value::Boolean(left || right)),
            _ => Err(RuntimeError::TypeError { details: format!("'{op}' is not a logical operator"),
                                               line }),
        }
    }
}
