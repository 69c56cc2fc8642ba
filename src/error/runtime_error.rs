use thiserror::Error;

#[derive(Debug, Error)]
/// Represents all errors that can occur while executing the program tree.
pub enum RuntimeError {
    /// Tried to read or write a variable that has no storage.
    #[error("Error on line {line}: Unknown variable '{name}'.")]
    UnknownVariable {
        /// The name or id of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function or procedure that is not registered.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A boolean value was expected, but not found.
    #[error("Error on line {line}: Expected boolean.")]
    ExpectedBoolean {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric value was expected, but not found.
    #[error("Error on line {line}: Expected number.")]
    ExpectedNumber {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array value was expected, but not found.
    #[error("Error on line {line}: Expected array.")]
    ExpectedArray {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to access an array element outside the allowed bounds.
    #[error("Error on line {line}: Index out of bounds. Array length is {len}, but found index {found}.")]
    IndexOutOfBounds {
        /// The number of elements in the indexed dimension.
        len:   usize,
        /// The index that was actually requested.
        found: i32,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The wrong number of arguments reached the call protocol.
    #[error("Error on line {line}: '{name}' expects {expected} argument(s), but {found} were given.")]
    ArgumentCountMismatch {
        /// The callable name.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Arithmetic operation overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A line read by `input` could not be converted to the target type.
    #[error("Error on line {line}: Cannot read '{input}' as {expected}.")]
    InvalidInput {
        /// The text that was read.
        input:    String,
        /// The declared type of the target.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The console collaborator failed.
    #[error("Error on line {line}: I/O failure: {source}.")]
    Io {
        /// The underlying I/O error.
        source: std::io::Error,
        /// The source line where the error occurred.
        line:   usize,
    },
}
