use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates an arithmetic operation.
    ///
    /// Two integers give an integer; integer division truncates toward zero.
    /// If either operand is a real, both are widened and the result is a
    /// real. `+` also concatenates when both operands are text (strings or
    /// characters, in any combination).
    ///
    /// # Parameters
    /// - `op`: One of `Add`, `Sub`, `Mul` or `Div`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `DivisionByZero` for a zero divisor, integer or real.
    /// - `Overflow` if an integer result leaves the 32-bit range or a real
    ///   result is not finite.
    /// - `TypeError` for any other operand combination.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_arithmetic(BinaryOperator::Div, &Value::Integer(7), &Value::Integer(2), 1);
    /// assert_eq!(result.unwrap(), Value::Integer(3));
    ///
    /// let result = Context::eval_arithmetic(BinaryOperator::Mul, &Value::Real(1.5), &Value::Integer(2), 1);
    /// assert_eq!(result.unwrap(), Value::Real(3.0));
    ///
    /// let result = Context::eval_arithmetic(BinaryOperator::Add, &Value::from("ab"), &Value::Char('c'), 1);
    /// assert_eq!(result.unwrap(), Value::from("abc"));
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};
        use Value::{Char, Integer, Real};

        let invalid = || RuntimeError::TypeError { details: format!("cannot apply '{op}' to {} and {}",
                                                                    left.type_name(),
                                                                    right.type_name()),
                                                   line };

        match (left, right) {
            (Integer(a), Integer(b)) => {
                let result = match op {
                    Add => a.checked_add(*b),
                    Sub => a.checked_sub(*b),
                    Mul => a.checked_mul(*b),
                    Div => {
                        if *b == 0 {
                            return Err(RuntimeError::DivisionByZero { line });
                        }
                        a.checked_div(*b)
                    },
                    _ => return Err(invalid()),
                };
                result.map(Integer).ok_or(RuntimeError::Overflow { line })
            },
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                let a = left.as_real(line)?;
                let b = right.as_real(line)?;
                let result = match op {
                    Add => a + b,
                    Sub => a - b,
                    Mul => a * b,
                    Div => {
                        if b == 0.0 {
                            return Err(RuntimeError::DivisionByZero { line });
                        }
                        a / b
                    },
                    _ => return Err(invalid()),
                };
                if result.is_finite() {
                    Ok(Real(result))
                } else {
                    Err(RuntimeError::Overflow { line })
                }
            },
            (Value::String(_) | Char(_), Value::String(_) | Char(_)) if op == Add => {
                Ok(Value::String(format!("{left}{right}")))
            },
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn integer_arithmetic_is_checked() {
        let max = Value::Integer(i32::MAX);
        let one = Value::Integer(1);

        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Add, &max, &one, 2),
                         Err(RuntimeError::Overflow { line: 2 })));
        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Div, &one, &Value::Integer(0), 4),
                         Err(RuntimeError::DivisionByZero { line: 4 })));
        assert_eq!(Context::eval_arithmetic(BinaryOperator::Div, &Value::Integer(-7), &Value::Integer(2), 1).unwrap(),
                   Value::Integer(-3));
    }

    #[test]
    fn real_division_by_zero_is_an_error() {
        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Div,
                                                  &Value::Real(1.0),
                                                  &Value::Integer(0),
                                                  1),
                         Err(RuntimeError::DivisionByZero { .. })));
        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Mul,
                                                  &Value::Real(f64::MAX),
                                                  &Value::Real(2.0),
                                                  1),
                         Err(RuntimeError::Overflow { .. })));
    }

    #[test]
    fn only_addition_concatenates() {
        assert_eq!(Context::eval_arithmetic(BinaryOperator::Add, &Value::Char('a'), &Value::Char('b'), 1).unwrap(),
                   Value::from("ab"));
        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Sub, &Value::from("a"), &Value::from("b"), 1),
                         Err(RuntimeError::TypeError { .. })));
        assert!(matches!(Context::eval_arithmetic(BinaryOperator::Add, &Value::from("a"), &Value::Integer(1), 1),
                         Err(RuntimeError::TypeError { .. })));
    }
}
