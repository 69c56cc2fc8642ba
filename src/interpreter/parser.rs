/// Parser state, token helpers and the program entry point.
///
/// Holds the `Parser` type and `parse_program`, which reads the module
/// header, module-level items, the entry block and the closing
/// `end <name>.`.
pub mod core;

/// Scope stack and identifier resolution.
///
/// Tracks the open blocks, derives block scope ids, links finished statements
/// under their block, and translates bare identifiers into scope-qualified
/// ids.
pub mod scope;

/// Statement parsing.
///
/// Parses block bodies and the simple statements: variable declarations,
/// `let`, `input`, `output` and `return`.
pub mod statement;

/// Control-flow parsing.
///
/// Parses `while` loops and `if` statements with their `elseif` and `else`
/// branches.
pub mod control;

/// Function and procedure parsing.
///
/// Parses callable declarations, `call` statements and argument lists, and
/// binds arguments to parameters.
pub mod callable;

/// Binary operator parsing.
///
/// Implements the precedence levels from `or` down to `*` and `/`.
pub mod binary;

/// Unary operator parsing.
///
/// Parses prefix operators and primary expressions.
pub mod unary;

/// Utility functions for the parser.
pub mod utils;
