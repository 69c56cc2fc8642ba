/// Binary operator evaluation logic.
///
/// Handles arithmetic, string concatenation, comparisons and the logical
/// connectives.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, the statement executor and expression
/// evaluation.
pub mod core;

/// Variable storage.
///
/// Activation frames, `var` aliasing and the lookup of ids at run time.
pub mod storage;

/// Execution of `while` and `if` statements.
pub mod control;

/// The call protocol for user-defined functions and procedures.
///
/// Binds arguments to parameters, runs the body in a fresh activation frame
/// and computes the result.
pub mod function;

/// Execution of `input` statements.
pub mod input;
