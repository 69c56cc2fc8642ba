use crate::{
    ast::VariableType,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Reads one console line into a variable, parameter or array slot.
    ///
    /// The text is converted according to the declared type of the addressed
    /// slot, which must be a scalar.
    ///
    /// # Errors
    /// - `TypeError` if the target addresses a whole array.
    /// - `InvalidInput` if the line does not denote a value of that type.
    /// - `Io` if the console cannot be read.
    pub(crate) fn read_input(&mut self, target: &str, indices: &[i32], line: usize) -> EvalResult<()> {
        let VariableType::Scalar(expected) = self.addressed_type(target, indices.len(), line)? else {
            return Err(RuntimeError::TypeError { details: "input needs a scalar target".to_string(),
                                                 line });
        };
        let text = self.console
                       .read_line()
                       .map_err(|source| RuntimeError::Io { source, line })?;
        let value = Value::from_input(&text, expected, line)?;
        self.store(target, indices, value, line)
    }
}
