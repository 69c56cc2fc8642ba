use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code. Parse errors include syntax mistakes, unresolved identifiers,
/// duplicate callables and call-site arity mismatches. All of them are
/// reported before anything is executed.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while the program tree is
/// executed. Runtime errors include type mismatches, array bounds violations,
/// division by zero, invalid console input and I/O failures.
pub mod runtime_error;
/// Program tree errors.
///
/// Structural failures raised by the tree's placement rules, such as a second
/// module root or an entry block without an open module.
pub mod tree_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use tree_error::TreeError;

/// Any failure that aborts a run.
///
/// A run either fails while the source is parsed or while the resulting tree
/// is executed; there is no partial-result mode.
#[derive(Debug, Error)]
pub enum Error {
    /// The program could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed while executing.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
