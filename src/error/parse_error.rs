use thiserror::Error;

use crate::error::TreeError;

#[derive(Debug, Error, Clone, PartialEq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A specific token was required but something else was found.
    #[error("Error on line {line}: Expected {expected}, found {found}.")]
    ExpectedToken {
        /// Description of what the grammar required.
        expected: String,
        /// The token actually encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found extra tokens after the closing `end <module>.`.
    #[error("Error on line {line}: Extra tokens after the end of the module: {token}.")]
    UnexpectedTrailingTokens {
        /// The extra/unexpected token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An identifier could not be resolved in any open scope.
    #[error("Error on line {line}: Identifier '{name}' is not declared.")]
    UnknownIdentifier {
        /// The bare identifier.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call referenced a function or procedure that does not exist.
    #[error("Error on line {line}: Function or procedure '{name}' is not declared.")]
    UnknownFunction {
        /// The name of the callable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted to declare a callable whose name is already taken.
    #[error("Error on line {line}: Function or procedure '{name}' is already defined.")]
    FunctionAlreadyDefined {
        /// The name of the callable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A parameter name appears twice in one parameter list.
    #[error("Error on line {line}: Parameter '{name}' is declared more than once.")]
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call supplied the wrong number of arguments.
    #[error("Error on line {line}: {}", describe_arity(.name, .expected, .found, .missing))]
    ArgumentCountMismatch {
        /// The name of the callable.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// Trailing parameters left without an argument.
        missing:  Vec<String>,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `var` parameter received something other than a plain variable.
    #[error("Error on line {line}: Argument for var parameter '{parameter}' of '{name}' must be a variable.")]
    ExpectedVariableArgument {
        /// The name of the callable.
        name:      String,
        /// The parameter that needs a variable.
        parameter: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Attempted to assign to an `in` parameter.
    #[error("Error on line {line}: Parameter '{name}' is read-only.")]
    ReadOnlyParameter {
        /// The parameter name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A block was closed with the wrong keyword or name.
    #[error("Error on line {line}: Expected 'end {expected}', found 'end {found}'.")]
    MismatchedEnd {
        /// What the open construct requires.
        expected: String,
        /// What was written instead.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// An array dimension was not a positive integer constant.
    #[error("Error on line {line}: Invalid array size: {details}.")]
    InvalidArraySize {
        /// Why the size was rejected.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A `return` appeared outside a function or procedure body.
    #[error("Error on line {line}: 'return' is only allowed inside a function or procedure.")]
    ReturnOutsideCallable {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A function body used `return` without a value.
    #[error("Error on line {line}: Function '{name}' must return a value.")]
    MissingReturnValue {
        /// The function name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A procedure body used `return` with a value.
    #[error("Error on line {line}: Procedure '{name}' cannot return a value.")]
    UnexpectedReturnValue {
        /// The procedure name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A callable was declared anywhere but at module level.
    #[error("Error on line {line}: '{name}' must be declared at module level.")]
    NestedCallable {
        /// The callable name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A block declared the same variable name twice.
    #[error("Error on line {line}: Variable '{name}' is already declared in this block.")]
    VariableAlreadyDeclared {
        /// The variable name.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A literal value was too large to be represented safely.
    #[error("Error on line {line}: Literal is too large.")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The program tree rejected a placement.
    #[error("Error on line {line}: {source}.")]
    Tree {
        /// The structural failure.
        source: TreeError,
        /// The source line where the error occurred.
        line:   usize,
    },
}

/// Builds the arity message, listing every unbound trailing parameter.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn describe_arity(name: &str, expected: &usize, found: &usize, missing: &[String]) -> String {
    if missing.is_empty() {
        format!("'{name}' expects {expected} argument(s), but {found} were given.")
    } else {
        let names = missing.iter()
                           .map(|parameter| format!("'{parameter}'"))
                           .collect::<Vec<_>>()
                           .join(", ");
        format!("'{name}' expects {expected} argument(s), but {found} were given. Missing: {names}.")
    }
}
