use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to a specialized handler depending
    /// on the operator. Arithmetic operators (including string concatenation
    /// with `+`) go to `eval_arithmetic`, relational and equality operators to
    /// `eval_comparison` and the logical connectives to `eval_logic`.
    ///
    /// Both operands have already been evaluated; there is no short-circuit.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use semtree::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Value::Integer(3);
    /// let right = Value::Integer(4);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right, 1).unwrap();
    /// assert_eq!(result, Value::Integer(7));
    ///
    /// let result = Context::eval_binary(BinaryOperator::Less, &left, &right, 1).unwrap();
    /// assert_eq!(result, Value::Boolean(true));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Sub,
        };

        match op {
            Add | Sub | Mul | Div => Self::eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            And | Or => Self::eval_logic(op, left, right, line),
        }
    }
}
